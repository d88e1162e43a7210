// src/api/types.rs

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::analysis::{CacheLookup, StepStatus, TeamAnalysis};
use crate::infra::errors::{AnalysisError, RosterError, ViewError};
use crate::roster::{EmployeeId, UserId};
use crate::scoring::aggregate::PerimeterAverage;
use crate::views::ScoredEmployee;

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Provider-facing failures carry the dashboard wording, not the raw
/// provider text.
pub fn analysis_error(e: AnalysisError) -> ApiError {
    let status = match &e {
        AnalysisError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
        AnalysisError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        AnalysisError::Failed { .. } | AnalysisError::Unavailable { .. } => StatusCode::BAD_GATEWAY,
        AnalysisError::UnknownEmployee(_)
        | AnalysisError::NoActionPlan(_)
        | AnalysisError::StepOutOfRange { .. } => StatusCode::NOT_FOUND,
    };
    error(status, e.user_message())
}

pub fn view_error(e: ViewError) -> ApiError {
    let status = match &e {
        ViewError::UnknownUser(_) | ViewError::MissingEmployeeRecord(_) => StatusCode::NOT_FOUND,
        ViewError::Forbidden { .. } => StatusCode::FORBIDDEN,
    };
    error(status, e.to_string())
}

pub fn roster_error(e: RosterError) -> ApiError {
    let status = match &e {
        RosterError::UnknownEmployee(_) => StatusCode::NOT_FOUND,
        RosterError::RatingOutOfRange { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error(status, e.to_string())
}

/// `?viewer=ID` on employee routes. Reads without a viewer are unscoped;
/// writes require one.
#[derive(Debug, Default, Deserialize)]
pub struct ViewerQuery {
    pub viewer: Option<UserId>,
}

/// Cached state of one analysis entry.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum LookupResponse<T> {
    Ready { value: T },
    Pending,
    Missing,
    Failed { error: String },
}

impl<T> LookupResponse<T> {
    pub fn from_lookup(lookup: CacheLookup<T>, failure: AnalysisError) -> Self {
        match lookup {
            CacheLookup::Hit(value) => LookupResponse::Ready { value },
            CacheLookup::Pending => LookupResponse::Pending,
            CacheLookup::Miss => LookupResponse::Missing,
            CacheLookup::HitFailure => LookupResponse::Failed {
                error: failure.user_message(),
            },
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LookupResponse<U> {
        match self {
            LookupResponse::Ready { value } => LookupResponse::Ready { value: f(value) },
            LookupResponse::Pending => LookupResponse::Pending,
            LookupResponse::Missing => LookupResponse::Missing,
            LookupResponse::Failed { error } => LookupResponse::Failed { error },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StepStatusRequest {
    pub status: StepStatus,
}

#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub rating: u8,
}

/// Team selection: explicit ids win over a job role.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRequest {
    #[serde(default)]
    pub ids: Option<Vec<EmployeeId>>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamReport {
    pub members: Vec<ScoredEmployee>,
    pub perimeter_averages: Vec<PerimeterAverage>,
    /// `None` for an empty cohort.
    pub analysis: Option<TeamAnalysis>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRequest {
    pub employee_id: EmployeeId,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionAccepted {
    pub employee_id: EmployeeId,
    pub debounce_ms: u64,
}

/// `?manager=ID` restricts statistics to that manager's reports.
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    pub manager: Option<UserId>,
}

/// `?ids=1,2` or `?role=Data Analyst`.
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    pub ids: Option<String>,
    pub role: Option<String>,
}
