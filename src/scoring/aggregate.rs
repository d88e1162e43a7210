// src/scoring/aggregate.rs — Cohort statistics over a set of employees
//
// Every function here is pure and re-derived per call. Grouping keeps
// first-appearance order, and all sorts are stable, so ties stay in input
// order.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use super::{classify_status, compute_overall_score, Status, DEVELOPING_FROM};
use crate::roster::{Employee, Perimeter};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDistribution {
    pub total: usize,
    pub pct_excelling: u32,
    pub pct_developing: u32,
    pub pct_needs_support: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramEffectiveness {
    pub program: String,
    pub participants: usize,
    pub average_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerSummary {
    pub trainer: String,
    /// `None` when no trainee has rated the training yet.
    pub average_effectiveness: Option<f64>,
    pub trainees: usize,
    pub programs: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerimeterAverage {
    pub perimeter: Perimeter,
    pub average: f64,
    pub respondents: usize,
}

/// Percentage of the cohort in each tier. Each tier is rounded on its own,
/// so the three values may sum to 99 or 101.
pub fn status_distribution(employees: &[Employee]) -> StatusDistribution {
    let total = employees.len();
    if total == 0 {
        return StatusDistribution::default();
    }

    let (mut excelling, mut developing, mut needs_support) = (0usize, 0usize, 0usize);
    for employee in employees {
        match classify_status(compute_overall_score(employee)) {
            Status::Excelling => excelling += 1,
            Status::Developing => developing += 1,
            Status::NeedsSupport => needs_support += 1,
        }
    }

    StatusDistribution {
        total,
        pct_excelling: percent(excelling, total),
        pct_developing: percent(developing, total),
        pct_needs_support: percent(needs_support, total),
    }
}

fn percent(count: usize, total: usize) -> u32 {
    ((count * 200 + total) / (2 * total)) as u32
}

/// Average effectiveness rating per training program, worst first.
/// Employees without a rating are ignored.
pub fn training_effectiveness_by_program(employees: &[Employee]) -> Vec<ProgramEffectiveness> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, u32, usize)> = Vec::new();

    for employee in employees {
        let Some(rating) = employee.training_effectiveness else {
            continue;
        };
        let slot = *index.entry(employee.training.as_str()).or_insert_with(|| {
            groups.push((employee.training.as_str(), 0, 0));
            groups.len() - 1
        });
        groups[slot].1 += rating as u32;
        groups[slot].2 += 1;
    }

    let mut programs: Vec<ProgramEffectiveness> = groups
        .into_iter()
        .map(|(program, sum, count)| ProgramEffectiveness {
            program: program.to_string(),
            participants: count,
            average_rating: sum as f64 / count as f64,
        })
        .collect();
    programs.sort_by(|a, b| {
        a.average_rating
            .partial_cmp(&b.average_rating)
            .unwrap_or(Ordering::Equal)
    });
    programs
}

/// Employees below the Developing threshold, lowest score first.
pub fn retraining_candidates(employees: &[Employee]) -> Vec<&Employee> {
    let mut candidates: Vec<(&Employee, u32)> = employees
        .iter()
        .map(|e| (e, compute_overall_score(e)))
        .filter(|(_, score)| *score < DEVELOPING_FROM)
        .collect();
    candidates.sort_by_key(|(_, score)| *score);
    candidates.into_iter().map(|(e, _)| e).collect()
}

/// Per-trainer rollup, best average first. Trainers with no rated trainees
/// sort after every rated trainer.
pub fn trainer_analytics(employees: &[Employee]) -> Vec<TrainerSummary> {
    struct Group<'a> {
        trainer: &'a str,
        trainees: usize,
        rating_sum: u32,
        rated: usize,
        programs: Vec<&'a str>,
    }

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for employee in employees {
        let Some(trainer) = employee.trainer_name.as_deref() else {
            continue;
        };
        let slot = *index.entry(trainer).or_insert_with(|| {
            groups.push(Group {
                trainer,
                trainees: 0,
                rating_sum: 0,
                rated: 0,
                programs: Vec::new(),
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.trainees += 1;
        if let Some(rating) = employee.training_effectiveness {
            group.rating_sum += rating as u32;
            group.rated += 1;
        }
        if !group.programs.contains(&employee.training.as_str()) {
            group.programs.push(&employee.training);
        }
    }

    let mut trainers: Vec<TrainerSummary> = groups
        .into_iter()
        .map(|g| TrainerSummary {
            trainer: g.trainer.to_string(),
            average_effectiveness: (g.rated > 0).then(|| g.rating_sum as f64 / g.rated as f64),
            trainees: g.trainees,
            programs: g.programs.len(),
        })
        .collect();
    trainers.sort_by(|a, b| match (a.average_effectiveness, b.average_effectiveness) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    trainers
}

/// Mean score per perimeter across the members that hold it, in display
/// order. Perimeters nobody holds are omitted.
pub fn perimeter_averages(employees: &[Employee]) -> Vec<PerimeterAverage> {
    Perimeter::ALL
        .iter()
        .filter_map(|&perimeter| {
            let scores: Vec<u8> = employees
                .iter()
                .filter_map(|e| e.score_for(perimeter))
                .collect();
            if scores.is_empty() {
                return None;
            }
            let sum: u32 = scores.iter().map(|s| *s as u32).sum();
            Some(PerimeterAverage {
                perimeter,
                average: sum as f64 / scores.len() as f64,
                respondents: scores.len(),
            })
        })
        .collect()
}
