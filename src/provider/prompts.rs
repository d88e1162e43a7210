// src/provider/prompts.rs — Prompt templates for hosted LLM backends

use minijinja::{context, Environment};
use serde::Serialize;

use crate::analysis::Analysis;
use crate::infra::errors::ProviderError;
use crate::roster::{Employee, Perimeter};
use crate::scoring::Status;

const INDIVIDUAL: &str = r#"You are a Learning & Development consultant reviewing how well an employee has transferred a training program into their daily work.

Employee: {{ name }}
Role: {{ role }}
Training completed: {{ training }}
Overall score: {{ score }}/100
Status: {{ status }}

Perimeter scores (1-5):
{% for p in perimeters %}- {{ p.perimeter }}: {{ p.score }}
{% endfor %}
Questionnaire evidence:
{{ evidence }}

Respond with a JSON object matching the schema.
{% if excelling -%}
Use the title "Benefits & New Scope". Keep the message positive, set rootCause to null, and recommend growth: mentoring others, advanced courses, wider scope, recognition.
{%- else -%}
Use the title "Key Strategies & Real Solutions". Name the challenges plainly. In rootCause, connect the low-scoring perimeters to each other (for example, weak manager support holding back how often the skill is applied). Recommendations for manager, employee and HR must target the low-scoring perimeters directly.
{%- endif %}
"#;

const ACTION_PLAN: &str = r#"You are a Learning & Development coach. Turn the analysis below into a development plan for {{ name }} ({{ role }}), who completed "{{ training }}".

Analysis: {{ title }}
{{ message }}
Root cause: {{ root_cause }}
Manager recommendations: {{ manager | join(", ") }}
Employee recommendations: {{ employee | join(", ") }}
HR recommendations: {{ hr | join(", ") }}

Return a JSON object with one aspirational goal and three to five action steps. Each step names a measurable action, an owner (Employee, Manager or HR), a timeline such as "Within 2 weeks" or "Ongoing", a suggested resource, and the status "Not Started".
"#;

const TEAM: &str = r#"You are a Learning & Development consultant reviewing a team that shares a role and training program.

Role: {{ role }}
Training completed: {{ training }}

Scores per member (1-5):
{{ team }}

Return a JSON object with:
- commonStrengths: perimeters where most members scored 4 or 5, each with a short insight.
- commonGaps: perimeters where most members scored 3 or lower, each with a short insight.
- teamRecommendations: three to five team-level actions (workshops, clearer expectations, better resources) addressing the gaps.
"#;

#[derive(Serialize)]
struct PerimeterScore {
    perimeter: &'static str,
    score: u8,
}

#[derive(Serialize)]
struct MemberScores<'a> {
    name: &'a str,
    scores: Vec<PerimeterScore>,
}

fn scores(employee: &Employee) -> Vec<PerimeterScore> {
    employee
        .proficiency
        .iter()
        .map(|p| PerimeterScore {
            perimeter: p.perimeter.label(),
            score: p.score,
        })
        .collect()
}

fn render(name: &str, source: &str, ctx: minijinja::Value) -> Result<String, ProviderError> {
    let mut env = Environment::new();
    env.add_template(name, source)
        .and_then(|_| env.get_template(name)?.render(ctx))
        .map_err(|e| ProviderError::unavailable("prompts", format!("template '{name}': {e}")))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ProviderError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ProviderError::unavailable("prompts", e.to_string()))
}

pub fn individual_prompt(
    employee: &Employee,
    overall_score: u32,
    status: Status,
) -> Result<String, ProviderError> {
    // Perimeters the employee was not measured on are listed as 0 so the
    // model sees the full core set.
    let perimeters: Vec<PerimeterScore> = Perimeter::ALL
        .iter()
        .filter(|p| !p.is_leadership_track() || employee.record(**p).is_some())
        .map(|p| PerimeterScore {
            perimeter: p.label(),
            score: employee.score_for(*p).unwrap_or(0),
        })
        .collect();

    render(
        "individual",
        INDIVIDUAL,
        context! {
            name => employee.name,
            role => employee.role,
            training => employee.training,
            score => overall_score,
            status => status.label(),
            excelling => status == Status::Excelling,
            perimeters => perimeters,
            evidence => to_json(&employee.proficiency)?,
        },
    )
}

pub fn action_plan_prompt(employee: &Employee, analysis: &Analysis) -> Result<String, ProviderError> {
    render(
        "action_plan",
        ACTION_PLAN,
        context! {
            name => employee.name,
            role => employee.role,
            training => employee.training,
            title => analysis.title,
            message => analysis.message,
            root_cause => analysis.root_cause.as_deref().unwrap_or("N/A"),
            manager => analysis.recommendations.manager,
            employee => analysis.recommendations.employee,
            hr => analysis.recommendations.hr,
        },
    )
}

pub fn team_prompt(employees: &[Employee]) -> Result<String, ProviderError> {
    let Some(first) = employees.first() else {
        return Err(ProviderError::unavailable("prompts", "team prompt needs at least one member"));
    };
    let members: Vec<MemberScores> = employees
        .iter()
        .map(|e| MemberScores {
            name: &e.name,
            scores: scores(e),
        })
        .collect();

    render(
        "team",
        TEAM,
        context! {
            role => first.role,
            training => first.training,
            team => to_json(&members)?,
        },
    )
}
