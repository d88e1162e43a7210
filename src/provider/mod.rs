// src/provider/mod.rs — Analysis provider layer

pub mod gemini;
pub mod offline;
pub mod prompts;

use async_trait::async_trait;
use std::sync::Arc;

use crate::analysis::{ActionPlan, Analysis, TeamAnalysis};
use crate::infra::config::{Backend, ProviderConfig};
use crate::infra::errors::{ConfigError, ProviderError};
use crate::roster::Employee;
use crate::scoring::Status;

/// A service that turns proficiency data into narrative analyses.
///
/// Implementations are not expected to cache or deduplicate; the analysis
/// service does that.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    fn id(&self) -> &'static str;

    /// Checked before every request. A missing credential is reported here,
    /// before any network attempt.
    fn ensure_configured(&self) -> Result<(), ConfigError>;

    async fn request_individual_analysis(
        &self,
        employee: &Employee,
        overall_score: u32,
        status: Status,
    ) -> Result<Analysis, ProviderError>;

    async fn request_action_plan(
        &self,
        employee: &Employee,
        analysis: &Analysis,
    ) -> Result<ActionPlan, ProviderError>;

    /// `employees` is never empty; callers short-circuit empty cohorts.
    async fn request_team_analysis(
        &self,
        employees: &[Employee],
    ) -> Result<TeamAnalysis, ProviderError>;
}

pub fn build_provider(config: &ProviderConfig) -> Result<Arc<dyn AnalysisProvider>, ProviderError> {
    let provider: Arc<dyn AnalysisProvider> = match config.backend {
        Backend::Gemini => Arc::new(gemini::GeminiProvider::new(config)?),
        Backend::Offline => Arc::new(offline::OfflineProvider),
    };
    tracing::debug!("Using analysis provider '{}'", provider.id());
    Ok(provider)
}
