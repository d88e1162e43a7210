// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::infra::errors::ConfigError;
use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub roster: RosterConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Gemini,
    Offline,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub backend: Backend,
    pub model: String,
    /// Name of the environment variable holding the API key. The key itself
    /// never lives in the config file.
    pub api_key_env: String,
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Gemini,
            model: "gemini-2.5-flash".into(),
            api_key_env: "GEMINI_API_KEY".into(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Quiet period before a selection triggers a gap-analysis request.
    pub debounce_ms: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { debounce_ms: 500 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub port: u16,
    /// Bearer token required on every API request when set.
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: 8787,
            token: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// JSON roster file. The bundled sample roster is used when unset.
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load config from the default location, falling back to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = paths::config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Invalid {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_reasonable() {
        let c = Config::default();
        assert_eq!(c.provider.backend, Backend::Gemini);
        assert_eq!(c.provider.model, "gemini-2.5-flash");
        assert_eq!(c.provider.api_key_env, "GEMINI_API_KEY");
        assert_eq!(c.provider.timeout_seconds, 60);
        assert_eq!(c.analysis.debounce_ms, 500);
        assert_eq!(c.api.port, 8787);
        assert!(c.api.token.is_none());
        assert!(c.roster.path.is_none());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.analysis.debounce_ms, 500);
    }

    #[test]
    fn test_parse_partial_section_keeps_defaults() {
        let toml_str = r#"
[provider]
backend = "offline"

[api]
port = 9000
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.provider.backend, Backend::Offline);
        assert_eq!(config.provider.model, "gemini-2.5-flash");
        assert_eq!(config.api.port, 9000);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[provider]
backend = "gemini"
model = "gemini-2.5-pro"
api_key_env = "PP_KEY"
base_url = "http://localhost:9999/v1beta"
timeout_seconds = 5

[analysis]
debounce_ms = 250

[api]
port = 8080
token = "secret"

[roster]
path = "/srv/roster.json"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.provider.model, "gemini-2.5-pro");
        assert_eq!(config.provider.api_key_env, "PP_KEY");
        assert_eq!(config.provider.timeout_seconds, 5);
        assert_eq!(config.analysis.debounce_ms, 250);
        assert_eq!(config.api.token.as_deref(), Some("secret"));
        assert_eq!(config.roster.path, Some(PathBuf::from("/srv/roster.json")));
    }

    #[test]
    fn test_unknown_backend_is_invalid() {
        let result: Result<Config, _> = toml::from_str("[provider]\nbackend = \"openai\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[analysis]\ndebounce_ms = 100").unwrap();
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.analysis.debounce_ms, 100);
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[analysis\n").unwrap();
        assert!(matches!(
            Config::load_from(file.path()),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load_from(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::Unreadable { .. })));
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.api.port, config.api.port);
        assert_eq!(deserialized.provider.backend, config.provider.backend);
    }
}
