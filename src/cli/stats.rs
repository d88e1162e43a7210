// src/cli/stats.rs — Cohort statistics display

use std::fmt::{self, Write};

use crate::roster::{Roster, UserId};
use crate::views::{self, CohortStats};

pub fn show_stats(roster: &Roster, manager: Option<UserId>, json: bool) -> anyhow::Result<()> {
    let (title, employees) = match manager {
        Some(id) => {
            let user = roster
                .user(id)
                .ok_or_else(|| anyhow::anyhow!("User {id} not found"))?;
            (format!("Team of {}", user.name), roster.managed_by(user))
        }
        None => ("All employees".to_string(), roster.employees()),
    };
    let stats = views::cohort_stats(&employees);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        let mut text = String::new();
        render_stats(&mut text, &title, &stats)?;
        print!("{text}");
    }
    Ok(())
}

pub fn render_stats(out: &mut impl Write, title: &str, stats: &CohortStats) -> fmt::Result {
    let d = &stats.distribution;
    writeln!(out, "{title} ({} employees)", d.total)?;
    writeln!(
        out,
        "  Excelling {}%   Developing {}%   Needs Support {}%",
        d.pct_excelling, d.pct_developing, d.pct_needs_support
    )?;

    if !stats.perimeter_averages.is_empty() {
        writeln!(out, "\nPerimeter averages")?;
        for p in &stats.perimeter_averages {
            writeln!(
                out,
                "  {:<36} {:.1}  (n={})",
                p.perimeter.label(),
                p.average,
                p.respondents
            )?;
        }
    }

    if !stats.programs.is_empty() {
        writeln!(out, "\nTraining effectiveness (lowest first)")?;
        for p in &stats.programs {
            writeln!(
                out,
                "  {:<36} {:.1}/5  ({} rated)",
                p.program, p.average_rating, p.participants
            )?;
        }
    }

    if !stats.trainers.is_empty() {
        writeln!(out, "\nTrainers (best first)")?;
        for t in &stats.trainers {
            let rating = t
                .average_effectiveness
                .map(|r| format!("{r:.1}/5"))
                .unwrap_or_else(|| "unrated".into());
            writeln!(
                out,
                "  {:<20} {:<8} {} trainees, {} programs",
                t.trainer, rating, t.trainees, t.programs
            )?;
        }
    }

    if !stats.retraining.is_empty() {
        writeln!(out, "\nRetraining candidates")?;
        for e in &stats.retraining {
            writeln!(out, "  #{:<4} {:<20} {}/100", e.id, e.name, e.overall_score)?;
        }
    }
    Ok(())
}
