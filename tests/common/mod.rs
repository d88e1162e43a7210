// tests/common/mod.rs — Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;

use proficiencypro::analysis::{
    ActionPlan, ActionStep, Analysis, Recommendations, StepOwner, StepStatus, TeamAnalysis,
    TeamInsight,
};
use proficiencypro::infra::errors::{ConfigError, ProviderError};
use proficiencypro::provider::AnalysisProvider;
use proficiencypro::roster::{sample, Employee, Roster};
use proficiencypro::scoring::Status;

/// Counts calls per method. Optionally fails, reports rate limits, or holds
/// every request until `release()` is called.
#[derive(Default)]
pub struct FakeProvider {
    pub individual_calls: AtomicUsize,
    pub plan_calls: AtomicUsize,
    pub team_calls: AtomicUsize,
    pub individual_ids: std::sync::Mutex<Vec<u32>>,
    pub fail: AtomicBool,
    pub rate_limited: AtomicBool,
    pub unconfigured: AtomicBool,
    gate: Option<Arc<Notify>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests block until the returned gate is notified.
    pub fn gated() -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let provider = Self {
            gate: Some(Arc::clone(&gate)),
            ..Self::default()
        };
        (provider, gate)
    }

    pub fn failing() -> Self {
        let provider = Self::default();
        provider.fail.store(true, Ordering::SeqCst);
        provider
    }

    pub fn individual(&self) -> usize {
        self.individual_calls.load(Ordering::SeqCst)
    }

    pub fn plans(&self) -> usize {
        self.plan_calls.load(Ordering::SeqCst)
    }

    pub fn teams(&self) -> usize {
        self.team_calls.load(Ordering::SeqCst)
    }

    async fn wait(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }

    fn outcome<T>(&self, value: T) -> Result<T, ProviderError> {
        if self.rate_limited.load(Ordering::SeqCst) {
            return Err(ProviderError::RateLimited {
                provider: "fake".into(),
            });
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(ProviderError::unavailable("fake", "HTTP 500"));
        }
        Ok(value)
    }
}

#[async_trait]
impl AnalysisProvider for FakeProvider {
    fn id(&self) -> &'static str {
        "fake"
    }

    fn ensure_configured(&self) -> Result<(), ConfigError> {
        if self.unconfigured.load(Ordering::SeqCst) {
            return Err(ConfigError::MissingCredential {
                env_var: "FAKE_API_KEY".into(),
            });
        }
        Ok(())
    }

    async fn request_individual_analysis(
        &self,
        employee: &Employee,
        overall_score: u32,
        status: Status,
    ) -> Result<Analysis, ProviderError> {
        self.individual_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut ids) = self.individual_ids.lock() {
            ids.push(employee.id);
        }
        self.wait().await;
        self.outcome(analysis_for(employee, overall_score, status))
    }

    async fn request_action_plan(
        &self,
        employee: &Employee,
        _analysis: &Analysis,
    ) -> Result<ActionPlan, ProviderError> {
        self.plan_calls.fetch_add(1, Ordering::SeqCst);
        self.wait().await;
        self.outcome(plan_for(employee))
    }

    async fn request_team_analysis(
        &self,
        employees: &[Employee],
    ) -> Result<TeamAnalysis, ProviderError> {
        self.team_calls.fetch_add(1, Ordering::SeqCst);
        self.wait().await;
        self.outcome(TeamAnalysis {
            common_strengths: vec![TeamInsight {
                perimeter: "Perceived Utility & Relevance".into(),
                insight: format!("{} members value the training", employees.len()),
            }],
            common_gaps: Vec::new(),
            team_recommendations: vec!["Share wins in the weekly stand-up".into()],
        })
    }
}

pub fn analysis_for(employee: &Employee, overall_score: u32, status: Status) -> Analysis {
    Analysis {
        title: format!("{} scored {overall_score}", employee.name),
        message: format!("Status: {status}"),
        root_cause: None,
        recommendations: Recommendations {
            manager: vec!["Manager action".into()],
            employee: vec!["Employee action".into()],
            hr: vec!["HR action".into()],
        },
    }
}

pub fn plan_for(employee: &Employee) -> ActionPlan {
    ActionPlan {
        // The service overwrites this.
        employee_id: 0,
        goal: format!("Apply {} weekly", employee.training),
        action_steps: vec![
            ActionStep {
                step: "Agree on a practice project".into(),
                owner: StepOwner::Manager,
                timeline: "Next 2 weeks".into(),
                resources: "Project brief".into(),
                status: StepStatus::NotStarted,
            },
            ActionStep {
                step: "Report progress in 1:1s".into(),
                owner: StepOwner::Employee,
                timeline: "Monthly".into(),
                resources: "1:1 agenda".into(),
                status: StepStatus::NotStarted,
            },
        ],
    }
}

pub fn roster() -> Roster {
    sample::roster().expect("bundled roster is valid")
}

pub fn employee(id: u32) -> Employee {
    roster().employee(id).expect("sample employee")
}
