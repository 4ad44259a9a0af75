//! Shared types used across the researcher agent crates.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Service name stamped on feedback and telemetry records.
pub const SERVICE_NAME: &str = "researcher-agent";

/// Session ID used when a caller does not send one.
pub const DEFAULT_SESSION_ID: &str = "anonymous-session";

/// User ID used when a caller does not send one.
pub const DEFAULT_USER_ID: &str = "anonymous";

/// Unix timestamp in milliseconds. Falls back to 0 if the clock is before the epoch.
pub fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Per-request correlation context. Carried into skills and telemetry only;
/// nothing is ever looked up by these identifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    /// Caller-supplied user identifier.
    pub user_id: String,
    /// Caller-supplied session identifier.
    pub session_id: String,
    /// Per-invocation trace identifier, generated by the gateway.
    pub invocation_id: String,
}

impl SessionContext {
    /// Builds a context from optional caller identifiers. Blank values fall back to the defaults
    /// and a fresh invocation ID is generated.
    pub fn new(user_id: Option<&str>, session_id: Option<&str>) -> Self {
        Self {
            user_id: non_blank(user_id).unwrap_or(DEFAULT_USER_ID).to_string(),
            session_id: non_blank(session_id).unwrap_or(DEFAULT_SESSION_ID).to_string(),
            invocation_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Goals the orchestrator can dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Goal {
    /// Research a topic from a focus-area perspective. Missing fields resolve as unknown / "general".
    ResearchTopic {
        #[serde(default)]
        topic: String,
        #[serde(default)]
        focus_area: Option<String>,
    },
    /// Analyze current trends in a domain.
    AnalyzeTrends {
        #[serde(default)]
        domain: String,
    },
    /// Free-text message; routed by keyword to one of the goals above.
    Converse {
        #[serde(default)]
        message: String,
    },
    /// Execute a named skill with optional payload.
    ExecuteSkill { name: String, payload: Option<serde_json::Value> },
}

impl Goal {
    /// Short label used in logs and response envelopes.
    pub fn label(&self) -> &'static str {
        match self {
            Goal::ResearchTopic { .. } => "ResearchTopic",
            Goal::AnalyzeTrends { .. } => "AnalyzeTrends",
            Goal::Converse { .. } => "Converse",
            Goal::ExecuteSkill { .. } => "ExecuteSkill",
        }
    }
}

/// Global application configuration for the gateway. Load from TOML or env.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Application identity, reported by `/v1/status` and stamped on telemetry.
    pub app_name: String,
    /// Human-readable description of the API.
    #[serde(default)]
    pub description: String,
    /// Bind address for the gateway.
    pub host: String,
    /// HTTP port for the gateway.
    pub port: u16,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Also emit every telemetry event at debug level with its full attribute map.
    #[serde(default)]
    pub telemetry_debug: bool,
    /// CORS origins allowed to call the API. Empty allows any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl CoreConfig {
    /// Load config from file and environment. Precedence: env `RESEARCH__*` > `RESEARCH_CONFIG` path
    /// (default `config/gateway`) > defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path = std::env::var("RESEARCH_CONFIG").unwrap_or_else(|_| "config/gateway".to_string());
        Self::load_from(&config_path)
    }

    /// Same as [`CoreConfig::load`] with an explicit config file path. A missing file is not an error.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .set_default("app_name", SERVICE_NAME)?
            .set_default("description", "API for interacting with the Researcher Agent")?
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080_i64)?
            .set_default("log_level", "info")?
            .set_default("telemetry_debug", false)?;

        // `config` resolves extension-less names itself; only add the source when something is there.
        let path = Path::new(config_path);
        let with_toml = path.with_extension("toml");
        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else if with_toml.exists() {
            builder.add_source(config::File::from(with_toml.as_path()))
        } else {
            builder
        };

        let built = builder
            .add_source(
                config::Environment::with_prefix("RESEARCH")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        built.try_deserialize()
    }

    /// `host:port` socket address string.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
