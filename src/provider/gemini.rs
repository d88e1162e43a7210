// src/provider/gemini.rs — Google Gemini provider (structured JSON output)

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;

use super::{prompts, AnalysisProvider};
use crate::analysis::{ActionPlan, Analysis, TeamAnalysis};
use crate::infra::config::ProviderConfig;
use crate::infra::errors::{ConfigError, ProviderError};
use crate::roster::Employee;
use crate::scoring::Status;

const PROVIDER_ID: &str = "gemini";

pub struct GeminiProvider {
    client: reqwest::Client,
    model: String,
    base_url: String,
    api_key_env: String,
}

impl GeminiProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ProviderError::unavailable(PROVIDER_ID, e.to_string()))?;
        Ok(Self {
            client,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key_env: config.api_key_env.clone(),
        })
    }

    /// Read on every call so a key exported after startup is picked up.
    fn api_key(&self) -> Result<String, ConfigError> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingCredential {
                env_var: self.api_key_env.clone(),
            })
    }

    async fn generate<T: DeserializeOwned>(
        &self,
        prompt: String,
        schema: Value,
    ) -> Result<T, ProviderError> {
        let api_key = self
            .api_key()
            .map_err(|e| ProviderError::unavailable(PROVIDER_ID, e.to_string()))?;
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        tracing::info!("Requesting {} from {}", std::any::type_name::<T>(), self.model);
        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key.as_str())])
            .header("content-type", "application/json")
            .json(&build_request_body(&prompt, schema))
            .send()
            .await
            .map_err(|e| ProviderError::unavailable(PROVIDER_ID, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &error_body));
        }

        let resp: Value = response.json().await.map_err(|e| {
            ProviderError::unavailable(PROVIDER_ID, format!("Failed to parse response: {e}"))
        })?;
        let text = extract_text(&resp).ok_or_else(|| {
            ProviderError::unavailable(PROVIDER_ID, "Response contained no candidate text")
        })?;
        serde_json::from_str(text.trim()).map_err(|e| {
            ProviderError::unavailable(PROVIDER_ID, format!("Malformed JSON from model: {e}"))
        })
    }
}

fn build_request_body(prompt: &str, schema: Value) -> Value {
    json!({
        "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": schema,
        },
    })
}

/// Concatenated text of `candidates[0].content.parts`.
fn extract_text(resp: &Value) -> Option<String> {
    let parts = resp["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    (!text.is_empty()).then_some(text)
}

fn classify_failure(status: reqwest::StatusCode, body: &str) -> ProviderError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS || body.contains("RESOURCE_EXHAUSTED") {
        tracing::warn!("Gemini quota exhausted (HTTP {status})");
        return ProviderError::RateLimited {
            provider: PROVIDER_ID.into(),
        };
    }
    ProviderError::unavailable(PROVIDER_ID, format!("HTTP {status}: {body}"))
}

// ─── Response schemas ───────────────────────────────────────

fn string_array() -> Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" } })
}

fn insight_array() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "perimeter": { "type": "STRING" },
                "insight": { "type": "STRING" },
            },
            "required": ["perimeter", "insight"],
        },
    })
}

fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "analysisTitle": { "type": "STRING" },
            "message": { "type": "STRING" },
            "rootCause": { "type": "STRING", "nullable": true },
            "recommendations": {
                "type": "OBJECT",
                "properties": {
                    "manager": string_array(),
                    "employee": string_array(),
                    "hr": string_array(),
                },
                "required": ["manager", "employee", "hr"],
            },
        },
        "required": ["analysisTitle", "message", "recommendations"],
    })
}

fn action_plan_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "goal": { "type": "STRING" },
            "actionSteps": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "step": { "type": "STRING" },
                        "owner": { "type": "STRING", "enum": ["Employee", "Manager", "HR"] },
                        "timeline": { "type": "STRING" },
                        "resources": { "type": "STRING" },
                        "status": { "type": "STRING", "enum": ["Not Started", "In Progress", "Completed"] },
                    },
                    "required": ["step", "owner", "timeline", "resources", "status"],
                },
            },
        },
        "required": ["goal", "actionSteps"],
    })
}

fn team_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "commonStrengths": insight_array(),
            "commonGaps": insight_array(),
            "teamRecommendations": string_array(),
        },
        "required": ["commonStrengths", "commonGaps", "teamRecommendations"],
    })
}

#[async_trait]
impl AnalysisProvider for GeminiProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn ensure_configured(&self) -> Result<(), ConfigError> {
        self.api_key().map(|_| ())
    }

    async fn request_individual_analysis(
        &self,
        employee: &Employee,
        overall_score: u32,
        status: Status,
    ) -> Result<Analysis, ProviderError> {
        let prompt = prompts::individual_prompt(employee, overall_score, status)?;
        self.generate(prompt, analysis_schema()).await
    }

    async fn request_action_plan(
        &self,
        employee: &Employee,
        analysis: &Analysis,
    ) -> Result<ActionPlan, ProviderError> {
        let prompt = prompts::action_plan_prompt(employee, analysis)?;
        self.generate(prompt, action_plan_schema()).await
    }

    async fn request_team_analysis(
        &self,
        employees: &[Employee],
    ) -> Result<TeamAnalysis, ProviderError> {
        let prompt = prompts::team_prompt(employees)?;
        self.generate(prompt, team_schema()).await
    }
}
