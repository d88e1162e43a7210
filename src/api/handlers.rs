// src/api/handlers.rs

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, HeaderName, StatusCode};
use axum::Json;

use crate::analysis::{ActionPlan, Analysis};
use crate::api::{auth, types::*, ApiState};
use crate::export;
use crate::infra::errors::{AnalysisError, AnalysisKind, ViewError};
use crate::roster::{Employee, EmployeeId, UserId};
use crate::scoring::aggregate;
use crate::views::{self, Cohort, CohortStats, Dashboard, ScoredEmployee, Viewer};

type ApiResult<T> = Result<T, ApiError>;

fn viewer(state: &ApiState, id: Option<UserId>) -> ApiResult<Option<Viewer>> {
    let Some(id) = id else {
        return Ok(None);
    };
    let user = state
        .roster
        .user(id)
        .ok_or_else(|| view_error(ViewError::UnknownUser(id)))?;
    Viewer::from_user(user).map(Some).map_err(view_error)
}

fn require_viewer(state: &ApiState, id: Option<UserId>) -> ApiResult<Viewer> {
    viewer(state, id)?.ok_or_else(|| {
        error(
            StatusCode::BAD_REQUEST,
            "This action requires a ?viewer=<user id> parameter",
        )
    })
}

/// The employee, if it exists and `viewer` may see it.
fn employee(state: &ApiState, id: EmployeeId, viewer: Option<&Viewer>) -> ApiResult<Employee> {
    if let Some(v) = viewer {
        v.require(v.can_view(id), "view this employee")
            .map_err(view_error)?;
    }
    state
        .roster
        .employee(id)
        .ok_or_else(|| analysis_error(AnalysisError::UnknownEmployee(id)))
}

fn scoped(viewer: Option<&Viewer>, analysis: Analysis) -> Analysis {
    match viewer {
        Some(v) => v.scope_analysis(&analysis),
        None => analysis,
    }
}

/// GET /api/v1/health — Simple health check.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /api/v1/users/{id}/dashboard — Role-specific dashboard payload.
pub async fn get_dashboard(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<UserId>,
) -> ApiResult<Json<Dashboard>> {
    auth::check_auth(&state, &headers)?;
    views::build_dashboard(&state.roster, id)
        .map(Json)
        .map_err(view_error)
}

/// GET /api/v1/stats — Cohort statistics, optionally for one manager's team.
pub async fn get_stats(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Query(query): Query<StatsQuery>,
) -> ApiResult<Json<CohortStats>> {
    auth::check_auth(&state, &headers)?;
    let employees = match query.manager {
        Some(id) => {
            let user = state
                .roster
                .user(id)
                .ok_or_else(|| view_error(ViewError::UnknownUser(id)))?;
            state.roster.managed_by(user)
        }
        None => state.roster.employees(),
    };
    Ok(Json(views::cohort_stats(&employees)))
}

/// GET /api/v1/employees/{id}/analysis — Cached gap analysis, if any.
pub async fn get_analysis(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<EmployeeId>,
    Query(query): Query<ViewerQuery>,
) -> ApiResult<Json<LookupResponse<Analysis>>> {
    auth::check_auth(&state, &headers)?;
    let viewer = viewer(&state, query.viewer)?;
    employee(&state, id, viewer.as_ref())?;

    let lookup = state.service.lookup_individual(id);
    let failure = AnalysisError::Unavailable {
        kind: AnalysisKind::Individual,
    };
    Ok(Json(
        LookupResponse::from_lookup(lookup, failure).map(|a| scoped(viewer.as_ref(), a)),
    ))
}

/// POST /api/v1/employees/{id}/analysis — Fetch (or join) the gap analysis.
pub async fn create_analysis(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<EmployeeId>,
    Query(query): Query<ViewerQuery>,
) -> ApiResult<Json<Analysis>> {
    auth::check_auth(&state, &headers)?;
    let viewer = viewer(&state, query.viewer)?;
    let employee = employee(&state, id, viewer.as_ref())?;

    let analysis = state
        .service
        .fetch_individual(&employee)
        .await
        .map_err(analysis_error)?;
    Ok(Json(scoped(viewer.as_ref(), analysis)))
}

/// GET /api/v1/employees/{id}/action-plan — Cached plan with step edits.
pub async fn get_action_plan(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<EmployeeId>,
    Query(query): Query<ViewerQuery>,
) -> ApiResult<Json<LookupResponse<ActionPlan>>> {
    auth::check_auth(&state, &headers)?;
    let viewer = viewer(&state, query.viewer)?;
    employee(&state, id, viewer.as_ref())?;

    let lookup = state.service.lookup_action_plan(id);
    let failure = AnalysisError::Unavailable {
        kind: AnalysisKind::ActionPlan,
    };
    Ok(Json(LookupResponse::from_lookup(lookup, failure)))
}

/// POST /api/v1/employees/{id}/action-plan — Generate the action plan.
pub async fn create_action_plan(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<EmployeeId>,
    Query(query): Query<ViewerQuery>,
) -> ApiResult<Json<ActionPlan>> {
    auth::check_auth(&state, &headers)?;
    let viewer = viewer(&state, query.viewer)?;
    if let Some(v) = &viewer {
        v.require(v.can_request_action_plan(), "request action plans")
            .map_err(view_error)?;
    }
    let employee = employee(&state, id, viewer.as_ref())?;

    state
        .service
        .fetch_action_plan(&employee)
        .await
        .map(Json)
        .map_err(analysis_error)
}

/// PATCH /api/v1/employees/{id}/action-plan/steps/{index} — Change a step's status.
pub async fn update_step(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path((id, index)): Path<(EmployeeId, usize)>,
    Query(query): Query<ViewerQuery>,
    Json(body): Json<StepStatusRequest>,
) -> ApiResult<Json<ActionPlan>> {
    auth::check_auth(&state, &headers)?;
    let viewer = require_viewer(&state, query.viewer)?;
    viewer
        .require(viewer.can_edit_steps(), "edit action steps")
        .map_err(view_error)?;
    employee(&state, id, Some(&viewer))?;

    state
        .service
        .update_step_status(id, index, body.status)
        .map(Json)
        .map_err(analysis_error)
}

/// PUT /api/v1/employees/{id}/training-effectiveness — HR rating of the training.
pub async fn rate_training(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<EmployeeId>,
    Query(query): Query<ViewerQuery>,
    Json(body): Json<RatingRequest>,
) -> ApiResult<Json<Employee>> {
    auth::check_auth(&state, &headers)?;
    let viewer = require_viewer(&state, query.viewer)?;
    viewer
        .require(viewer.can_rate_training(), "rate training effectiveness")
        .map_err(view_error)?;

    state
        .roster
        .set_training_effectiveness(id, body.rating)
        .map_err(roster_error)?;
    employee(&state, id, Some(&viewer)).map(Json)
}

/// POST /api/v1/teams/analysis — Team analysis for ids or a job role.
pub async fn team_analysis(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Query(query): Query<ViewerQuery>,
    Json(body): Json<TeamRequest>,
) -> ApiResult<Json<TeamReport>> {
    auth::check_auth(&state, &headers)?;
    let viewer = viewer(&state, query.viewer)?;

    let mut members = Cohort::from_parts(body.ids, body.role).resolve(&state.roster);
    if let Some(v) = &viewer {
        members.retain(|e| v.can_view(e.id));
    }
    let analysis = state
        .service
        .fetch_team(&members)
        .await
        .map_err(analysis_error)?;

    Ok(Json(TeamReport {
        perimeter_averages: aggregate::perimeter_averages(&members),
        members: members.iter().map(ScoredEmployee::from).collect(),
        analysis,
    }))
}

/// POST /api/v1/users/{id}/selection — Debounced selection; prefetches the
/// gap analysis once the viewer stops changing selection.
pub async fn select_employee(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(user_id): Path<UserId>,
    Json(body): Json<SelectionRequest>,
) -> ApiResult<(StatusCode, Json<SelectionAccepted>)> {
    auth::check_auth(&state, &headers)?;
    let viewer = require_viewer(&state, Some(user_id))?;
    let employee = employee(&state, body.employee_id, Some(&viewer))?;

    let stream = state.selections.for_user(user_id);
    stream.select_employee(state.service.clone(), employee);

    Ok((
        StatusCode::ACCEPTED,
        Json(SelectionAccepted {
            employee_id: body.employee_id,
            debounce_ms: stream.delay().as_millis() as u64,
        }),
    ))
}

/// GET /api/v1/export.csv — CSV download for ids, a role, or everyone.
pub async fn export_csv(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Query(query): Query<ExportQuery>,
) -> ApiResult<([(HeaderName, String); 2], String)> {
    auth::check_auth(&state, &headers)?;
    let ids = query
        .ids
        .as_deref()
        .map(views::parse_ids)
        .transpose()
        .map_err(|e| error(StatusCode::BAD_REQUEST, format!("Invalid ids: {e}")))?;

    let cohort = Cohort::from_parts(ids, query.role);
    let members = cohort.resolve(&state.roster);
    let body = export::to_csv_string(&members)
        .map_err(|e| error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let file_name = cohort.export_file_name(&members);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    ))
}
