// src/infra/errors.rs — Error types for ProficiencyPro

use std::fmt;

use thiserror::Error;

use crate::roster::{EmployeeId, Perimeter, Role, UserId};

/// Configuration problems. A missing credential is detected before any
/// network attempt and is never cached.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API key is not configured. Set the {env_var} environment variable.")]
    MissingCredential { env_var: String },

    #[error("Failed to read config file '{path}': {message}")]
    Unreadable { path: String, message: String },

    #[error("Invalid config file '{path}': {message}")]
    Invalid { path: String, message: String },
}

/// Failures reported by an analysis provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Rate limited by '{provider}'")]
    RateLimited { provider: String },

    #[error("Provider '{provider}' error: {message}")]
    Unavailable { provider: String, message: String },
}

impl ProviderError {
    pub fn unavailable(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unavailable {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ProviderError::RateLimited { .. })
    }
}

/// The three cached analysis namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisKind {
    Individual,
    ActionPlan,
    Team,
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AnalysisKind::Individual => "analysis",
            AnalysisKind::ActionPlan => "action plan",
            AnalysisKind::Team => "team analysis",
        };
        f.write_str(label)
    }
}

/// Errors surfaced to callers of the analysis service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error("Rate limited while generating {kind}")]
    RateLimited { kind: AnalysisKind },

    #[error("Failed to generate {kind}: {source}")]
    Failed {
        kind: AnalysisKind,
        source: ProviderError,
    },

    /// A previous request for the same key failed; the failure is cached.
    #[error("No {kind} available")]
    Unavailable { kind: AnalysisKind },

    #[error("Employee {0} not found")]
    UnknownEmployee(EmployeeId),

    #[error("No action plan has been generated for employee {0}")]
    NoActionPlan(EmployeeId),

    #[error("Action plan for employee {employee_id} has no step {index}")]
    StepOutOfRange { employee_id: EmployeeId, index: usize },
}

impl AnalysisError {
    pub(crate) fn from_provider(kind: AnalysisKind, error: ProviderError) -> Self {
        if error.is_rate_limited() {
            AnalysisError::RateLimited { kind }
        } else {
            AnalysisError::Failed {
                kind,
                source: error,
            }
        }
    }

    /// Message shown to dashboard viewers. Rate limits get their own wording
    /// so the viewer knows waiting helps.
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::Configuration(_) => "API key is not configured.".to_string(),
            AnalysisError::RateLimited { .. } => {
                "You've exceeded your API request limit. Please wait a moment and try again."
                    .to_string()
            }
            AnalysisError::Failed { kind, .. } | AnalysisError::Unavailable { kind } => format!(
                "Failed to generate {kind} from the API. Please check your connection or API key."
            ),
            other => other.to_string(),
        }
    }
}

/// Roster ingestion and mutation failures.
#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Employee {employee_id} has score {score} for '{perimeter}' (expected 1-5)")]
    ScoreOutOfRange {
        employee_id: EmployeeId,
        perimeter: Perimeter,
        score: u8,
    },

    #[error("Employee {employee_id} has more than one record for '{perimeter}'")]
    DuplicatePerimeter {
        employee_id: EmployeeId,
        perimeter: Perimeter,
    },

    #[error("Employee id {0} appears more than once")]
    DuplicateEmployee(EmployeeId),

    #[error("Employee {employee_id} has training effectiveness {rating} (expected 1-5)")]
    RatingOutOfRange { employee_id: EmployeeId, rating: u8 },

    #[error("Question '{question_id}' for employee {employee_id} has rating {rating} (expected 1-5)")]
    AnswerOutOfRange {
        employee_id: EmployeeId,
        question_id: String,
        rating: u8,
    },

    #[error("User {user_id} references unknown employee {employee_id}")]
    UnknownReference { user_id: u32, employee_id: EmployeeId },

    #[error("Employee {0} not found")]
    UnknownEmployee(EmployeeId),

    #[error("Malformed roster: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Role-dispatch failures at the presentation boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("User {0} not found")]
    UnknownUser(UserId),

    #[error("User {0} has the Employee role but no employee record")]
    MissingEmployeeRecord(UserId),

    #[error("{role} viewers may not {action}")]
    Forbidden { role: Role, action: &'static str },
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV output was not valid UTF-8")]
    Encoding,
}
