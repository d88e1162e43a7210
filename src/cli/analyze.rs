// src/cli/analyze.rs — Gap analysis, action plan and team analysis commands

use std::fmt::{self, Write};

use crate::analysis::{ActionPlan, Analysis, AnalysisService, TeamAnalysis};
use crate::infra::errors::AnalysisError;
use crate::roster::{Employee, EmployeeId, Roster};
use crate::scoring::assess;
use crate::views::Cohort;

fn find(roster: &Roster, id: EmployeeId) -> anyhow::Result<Employee> {
    roster
        .employee(id)
        .ok_or_else(|| anyhow::anyhow!("Employee {id} not found"))
}

/// Viewer-facing wording for service failures.
fn user_facing(e: AnalysisError) -> anyhow::Error {
    anyhow::anyhow!(e.user_message())
}

pub async fn run_analyze(
    roster: &Roster,
    service: &AnalysisService,
    id: EmployeeId,
    json: bool,
) -> anyhow::Result<()> {
    let employee = find(roster, id)?;
    let analysis = service
        .fetch_individual(&employee)
        .await
        .map_err(user_facing)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        let mut text = String::new();
        render_analysis(&mut text, &employee, &analysis)?;
        print!("{text}");
    }
    Ok(())
}

pub async fn run_plan(
    roster: &Roster,
    service: &AnalysisService,
    id: EmployeeId,
    json: bool,
) -> anyhow::Result<()> {
    let employee = find(roster, id)?;
    let plan = service
        .fetch_action_plan(&employee)
        .await
        .map_err(user_facing)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        let mut text = String::new();
        render_plan(&mut text, &employee, &plan)?;
        print!("{text}");
    }
    Ok(())
}

pub async fn run_team(
    roster: &Roster,
    service: &AnalysisService,
    cohort: Cohort,
    json: bool,
) -> anyhow::Result<()> {
    let members = cohort.resolve(roster);
    let Some(team) = service.fetch_team(&members).await.map_err(user_facing)? else {
        println!("No employees match that selection.");
        return Ok(());
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&team)?);
    } else {
        let mut text = String::new();
        render_team(&mut text, &members, &team)?;
        print!("{text}");
    }
    Ok(())
}

fn bullets(out: &mut impl Write, heading: &str, items: &[String]) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(out, "\n{heading}")?;
    for item in items {
        writeln!(out, "  - {item}")?;
    }
    Ok(())
}

pub fn render_analysis(
    out: &mut impl Write,
    employee: &Employee,
    analysis: &Analysis,
) -> fmt::Result {
    let (score, status) = assess(employee);
    writeln!(out, "{}, {} ({score}/100, {status})", employee.name, employee.training)?;
    writeln!(out, "\n{}\n{}", analysis.title, analysis.message)?;
    if let Some(cause) = &analysis.root_cause {
        writeln!(out, "\nRoot cause: {cause}")?;
    }
    let r = &analysis.recommendations;
    bullets(out, "For the manager", &r.manager)?;
    bullets(out, "For the employee", &r.employee)?;
    bullets(out, "For HR", &r.hr)
}

pub fn render_plan(out: &mut impl Write, employee: &Employee, plan: &ActionPlan) -> fmt::Result {
    writeln!(out, "Action plan for {}", employee.name)?;
    writeln!(out, "Goal: {}\n", plan.goal)?;
    for (i, step) in plan.action_steps.iter().enumerate() {
        writeln!(out, "{}. [{}] {}", i + 1, step.status, step.step)?;
        writeln!(
            out,
            "   Owner: {}  Timeline: {}  Resources: {}",
            step.owner, step.timeline, step.resources
        )?;
    }
    Ok(())
}

pub fn render_team(out: &mut impl Write, members: &[Employee], team: &TeamAnalysis) -> fmt::Result {
    let names: Vec<&str> = members.iter().map(|e| e.name.as_str()).collect();
    writeln!(out, "Team analysis: {}", names.join(", "))?;
    for (heading, insights) in [
        ("Common strengths", &team.common_strengths),
        ("Common gaps", &team.common_gaps),
    ] {
        if insights.is_empty() {
            continue;
        }
        writeln!(out, "\n{heading}")?;
        for i in insights {
            writeln!(out, "  - {}: {}", i.perimeter, i.insight)?;
        }
    }
    bullets(out, "Recommendations", &team.team_recommendations)
}
