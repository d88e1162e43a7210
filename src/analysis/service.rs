// src/analysis/service.rs — Analysis service: three cached namespaces over one provider
//
// The configuration check runs on every call, before the cache is touched,
// so a missing credential is never cached. Provider failures are cached per
// key like successes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::cache::{CacheLookup, FetchError, KeyedCache};
use super::{ActionPlan, Analysis, StepStatus, TeamAnalysis};
use crate::infra::errors::{AnalysisError, AnalysisKind, ProviderError};
use crate::provider::AnalysisProvider;
use crate::roster::{Employee, EmployeeId};
use crate::scoring::assess;

type StepEdits = HashMap<(EmployeeId, usize), StepStatus>;

/// Cache key for a cohort: member ids sorted ascending and comma-joined, so
/// member order never causes a miss.
pub fn cohort_fingerprint(employees: &[Employee]) -> String {
    let mut ids: Vec<EmployeeId> = employees.iter().map(|e| e.id).collect();
    ids.sort_unstable();
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

pub struct AnalysisService {
    provider: Arc<dyn AnalysisProvider>,
    individual: KeyedCache<EmployeeId, Analysis>,
    plans: KeyedCache<EmployeeId, ActionPlan>,
    teams: KeyedCache<String, TeamAnalysis>,
    /// Viewer edits to step status, layered over the immutable cached plans.
    step_edits: Mutex<StepEdits>,
}

impl AnalysisService {
    pub fn new(provider: Arc<dyn AnalysisProvider>) -> Self {
        Self {
            provider,
            individual: KeyedCache::new("analysis"),
            plans: KeyedCache::new("action-plan"),
            teams: KeyedCache::new("team-analysis"),
            step_edits: Mutex::new(HashMap::new()),
        }
    }

    pub fn provider_id(&self) -> &'static str {
        self.provider.id()
    }

    fn edits(&self) -> MutexGuard<'_, StepEdits> {
        self.step_edits
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn with_edits(&self, mut plan: ActionPlan) -> ActionPlan {
        let edits = self.edits();
        for (index, step) in plan.action_steps.iter_mut().enumerate() {
            if let Some(status) = edits.get(&(plan.employee_id, index)) {
                step.status = *status;
            }
        }
        plan
    }

    // ─── Individual gap analysis ────────────────────────────────

    pub async fn fetch_individual(&self, employee: &Employee) -> Result<Analysis, AnalysisError> {
        self.provider.ensure_configured()?;

        let provider = Arc::clone(&self.provider);
        let member = employee.clone();
        let (score, status) = assess(employee);
        self.individual
            .fetch(employee.id, move || async move {
                tracing::info!(
                    "Requesting gap analysis for {} ({score}/100, {status}) from {}",
                    member.name,
                    provider.id()
                );
                provider
                    .request_individual_analysis(&member, score, status)
                    .await
            })
            .await
            .map_err(|e| surface(AnalysisKind::Individual, e))
    }

    pub fn lookup_individual(&self, id: EmployeeId) -> CacheLookup<Analysis> {
        self.individual.get(&id)
    }

    // ─── Action plan ────────────────────────────────────────────

    /// Action plans are built from the employee's gap analysis. If none is
    /// cached, the gap analysis is fetched first; when that fails the error
    /// is returned and nothing is recorded for the plan.
    pub async fn fetch_action_plan(&self, employee: &Employee) -> Result<ActionPlan, AnalysisError> {
        self.provider.ensure_configured()?;

        match self.plans.get(&employee.id) {
            CacheLookup::Hit(plan) => return Ok(self.with_edits(plan)),
            CacheLookup::HitFailure => {
                return Err(AnalysisError::Unavailable {
                    kind: AnalysisKind::ActionPlan,
                })
            }
            CacheLookup::Miss | CacheLookup::Pending => {}
        }

        let analysis = self.fetch_individual(employee).await?;
        let provider = Arc::clone(&self.provider);
        let member = employee.clone();
        let plan = self
            .plans
            .fetch(employee.id, move || async move {
                tracing::info!("Requesting action plan for {} from {}", member.name, provider.id());
                let mut plan = provider.request_action_plan(&member, &analysis).await?;
                plan.employee_id = member.id;
                Ok::<_, ProviderError>(plan)
            })
            .await
            .map_err(|e| surface(AnalysisKind::ActionPlan, e))?;
        Ok(self.with_edits(plan))
    }

    pub fn lookup_action_plan(&self, id: EmployeeId) -> CacheLookup<ActionPlan> {
        match self.plans.get(&id) {
            CacheLookup::Hit(plan) => CacheLookup::Hit(self.with_edits(plan)),
            other => other,
        }
    }

    /// Record a viewer's status change for one step of a generated plan.
    pub fn update_step_status(
        &self,
        employee_id: EmployeeId,
        index: usize,
        status: StepStatus,
    ) -> Result<ActionPlan, AnalysisError> {
        let CacheLookup::Hit(plan) = self.plans.get(&employee_id) else {
            return Err(AnalysisError::NoActionPlan(employee_id));
        };
        if index >= plan.action_steps.len() {
            return Err(AnalysisError::StepOutOfRange { employee_id, index });
        }
        self.edits().insert((employee_id, index), status);
        tracing::info!("Action step {index} for employee {employee_id} marked {status}");
        Ok(self.with_edits(plan))
    }

    // ─── Team analysis ──────────────────────────────────────────

    /// `Ok(None)` for an empty cohort; the provider is not called and no
    /// cache entry is made.
    pub async fn fetch_team(&self, employees: &[Employee]) -> Result<Option<TeamAnalysis>, AnalysisError> {
        if employees.is_empty() {
            tracing::debug!("Empty cohort, skipping team analysis");
            return Ok(None);
        }
        self.provider.ensure_configured()?;

        let key = cohort_fingerprint(employees);
        let provider = Arc::clone(&self.provider);
        let members = employees.to_vec();
        self.teams
            .fetch(key, move || async move {
                tracing::info!(
                    "Requesting team analysis for {} members from {}",
                    members.len(),
                    provider.id()
                );
                provider.request_team_analysis(&members).await
            })
            .await
            .map(Some)
            .map_err(|e| surface(AnalysisKind::Team, e))
    }

    pub fn lookup_team(&self, employees: &[Employee]) -> CacheLookup<TeamAnalysis> {
        if employees.is_empty() {
            return CacheLookup::Miss;
        }
        self.teams.get(&cohort_fingerprint(employees))
    }
}

fn surface(kind: AnalysisKind, error: FetchError) -> AnalysisError {
    match error {
        FetchError::Provider(e) => {
            tracing::warn!("Failed to generate {kind}: {e}");
            AnalysisError::from_provider(kind, e)
        }
        FetchError::CachedFailure => {
            tracing::warn!("Returning cached {kind} failure without calling the provider");
            AnalysisError::Unavailable { kind }
        }
    }
}
