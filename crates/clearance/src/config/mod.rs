use std::env;
use std::fmt;

use crate::evaluation::config::{
    DEFAULT_AUDIT_BUDGET_MS, DEFAULT_HISTORY_WINDOW, DEFAULT_SCORER_BUDGET_MS,
};
use crate::evaluation::EvaluationConfig;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for binaries embedding the engine.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub engine: EngineSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let history_window = env::var("ENGINE_HISTORY_WINDOW")
            .unwrap_or_else(|_| DEFAULT_HISTORY_WINDOW.to_string())
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidHistoryWindow)?;
        let scorer_budget_ms = env::var("ENGINE_SCORER_BUDGET_MS")
            .unwrap_or_else(|_| DEFAULT_SCORER_BUDGET_MS.to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidScorerBudget)?;
        let audit_budget_ms = env::var("ENGINE_AUDIT_BUDGET_MS")
            .unwrap_or_else(|_| DEFAULT_AUDIT_BUDGET_MS.to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidAuditBudget)?;

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            engine: EngineSettings {
                history_window,
                scorer_budget_ms,
                audit_budget_ms,
            },
        })
    }
}

/// Engine tuning sourced from the environment.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub history_window: usize,
    pub scorer_budget_ms: u64,
    pub audit_budget_ms: u64,
}

impl EngineSettings {
    /// Fold the environment overrides into the built-in evaluation defaults.
    pub fn evaluation_config(&self) -> EvaluationConfig {
        EvaluationConfig {
            history_window: self.history_window,
            scorer_budget_ms: self.scorer_budget_ms,
            audit_budget_ms: self.audit_budget_ms,
            ..EvaluationConfig::default()
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidHistoryWindow,
    InvalidScorerBudget,
    InvalidAuditBudget,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidHistoryWindow => {
                write!(f, "ENGINE_HISTORY_WINDOW must be a valid usize")
            }
            ConfigError::InvalidScorerBudget => {
                write!(f, "ENGINE_SCORER_BUDGET_MS must be a valid u64")
            }
            ConfigError::InvalidAuditBudget => {
                write!(f, "ENGINE_AUDIT_BUDGET_MS must be a valid u64")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
