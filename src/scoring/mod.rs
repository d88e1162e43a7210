// src/scoring/mod.rs — Overall score and status tier

pub mod aggregate;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::roster::Employee;

/// Scores strictly above this are Excelling.
pub const EXCELLING_ABOVE: u32 = 80;
/// Scores at or above this (and not Excelling) are Developing.
pub const DEVELOPING_FROM: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Excelling,
    Developing,
    #[serde(rename = "Needs Support")]
    NeedsSupport,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Excelling => "Excelling",
            Status::Developing => "Developing",
            Status::NeedsSupport => "Needs Support",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Mean of all proficiency scores scaled to 0-100, rounded half up.
/// Employees without records score 0.
pub fn compute_overall_score(employee: &Employee) -> u32 {
    let n = employee.proficiency.len() as u32;
    if n == 0 {
        return 0;
    }
    let sum: u32 = employee.proficiency.iter().map(|p| p.score as u32).sum();
    // round(sum * 20 / n) in integers: (40 * sum + n) / 2n
    (sum * 40 + n) / (2 * n)
}

pub fn classify_status(score: u32) -> Status {
    if score > EXCELLING_ABOVE {
        Status::Excelling
    } else if score >= DEVELOPING_FROM {
        Status::Developing
    } else {
        Status::NeedsSupport
    }
}

/// Score and status together, the pair most views need.
pub fn assess(employee: &Employee) -> (u32, Status) {
    let score = compute_overall_score(employee);
    (score, classify_status(score))
}
