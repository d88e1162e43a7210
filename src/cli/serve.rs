// src/cli/serve.rs — Run the HTTP API

use std::sync::Arc;
use std::time::Duration;

use crate::analysis::AnalysisService;
use crate::api::{self, ApiState};
use crate::infra::config::Config;
use crate::roster::Roster;

pub async fn run_serve(
    config: &Config,
    roster: Arc<Roster>,
    service: Arc<AnalysisService>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let mut api_config = config.api.clone();
    if let Some(port) = port {
        api_config.port = port;
    }
    if api_config.token.is_none() {
        tracing::warn!("API token not set; the server accepts unauthenticated requests");
    }

    let state = ApiState::new(
        roster,
        service,
        Duration::from_millis(config.analysis.debounce_ms),
        api_config.token.clone(),
    );
    println!(
        "Serving on http://127.0.0.1:{} (provider: {})",
        api_config.port,
        state.service.provider_id()
    );
    api::start_server(&api_config, state).await
}
