// src/analysis/mod.rs — AI-derived analyses, action plans and team reports

pub mod cache;
pub mod debounce;
pub mod service;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::roster::EmployeeId;

pub use cache::{CacheLookup, KeyedCache};
pub use service::{cohort_fingerprint, AnalysisService};

/// Recommendation lists partitioned by audience.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    #[serde(default)]
    pub manager: Vec<String>,
    #[serde(default)]
    pub employee: Vec<String>,
    #[serde(default)]
    pub hr: Vec<String>,
}

/// Gap & strength analysis for one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    #[serde(rename = "analysisTitle")]
    pub title: String,
    pub message: String,
    /// Only present for employees who are not excelling.
    #[serde(default)]
    pub root_cause: Option<String>,
    pub recommendations: Recommendations,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepOwner {
    Employee,
    Manager,
    #[serde(rename = "HR")]
    Hr,
}

impl fmt::Display for StepOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StepOwner::Employee => "Employee",
            StepOwner::Manager => "Manager",
            StepOwner::Hr => "HR",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StepStatus::NotStarted => "Not Started",
            StepStatus::InProgress => "In Progress",
            StepStatus::Completed => "Completed",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionStep {
    pub step: String,
    pub owner: StepOwner,
    pub timeline: String,
    pub resources: String,
    #[serde(default)]
    pub status: StepStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPlan {
    /// Assigned by the service; whatever the provider returned is discarded.
    #[serde(default)]
    pub employee_id: EmployeeId,
    pub goal: String,
    pub action_steps: Vec<ActionStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamInsight {
    pub perimeter: String,
    pub insight: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamAnalysis {
    #[serde(default)]
    pub common_strengths: Vec<TeamInsight>,
    #[serde(default)]
    pub common_gaps: Vec<TeamInsight>,
    #[serde(default)]
    pub team_recommendations: Vec<String>,
}
