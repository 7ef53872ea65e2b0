use crate::scoring::{ScoringSources, Segmentation, UnknownSegmentation};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the deployment.
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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    /// Where the scoring rules come from. Unset fields fall back to the reference table.
    pub scoring: ScoringSources,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let base_points = optional_var("TRIAGE_BASE_POINTS")
            .map(|value| {
                value
                    .parse::<u32>()
                    .map_err(|_| ConfigError::InvalidBasePoints { value })
            })
            .transpose()?;

        let match_threshold = optional_var("TRIAGE_MATCH_THRESHOLD")
            .map(|value| match value.parse::<f64>() {
                Ok(threshold) if threshold.is_finite() && (0.0..=1.0).contains(&threshold) => {
                    Ok(threshold)
                }
                _ => Err(ConfigError::InvalidThreshold { value }),
            })
            .transpose()?;

        let segmentation = optional_var("TRIAGE_SEGMENTATION")
            .map(|value| {
                value
                    .parse::<Segmentation>()
                    .map_err(|source| ConfigError::InvalidSegmentation { source })
            })
            .transpose()?;

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            scoring: ScoringSources {
                rules_path: optional_var("TRIAGE_RULES_PATH").map(PathBuf::from),
                interventions_csv: optional_var("TRIAGE_INTERVENTIONS_CSV").map(PathBuf::from),
                base_points,
                match_threshold,
                segmentation,
            },
        })
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidBasePoints { value: String },
    InvalidThreshold { value: String },
    InvalidSegmentation { source: UnknownSegmentation },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBasePoints { value } => write!(
                f,
                "TRIAGE_BASE_POINTS must be a non-negative integer, got '{}'",
                value
            ),
            ConfigError::InvalidThreshold { value } => write!(
                f,
                "TRIAGE_MATCH_THRESHOLD must be a number between 0 and 1, got '{}'",
                value
            ),
            ConfigError::InvalidSegmentation { source } => {
                write!(f, "TRIAGE_SEGMENTATION is invalid: {}", source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidBasePoints { .. } | ConfigError::InvalidThreshold { .. } => None,
            ConfigError::InvalidSegmentation { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::path::Path;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("TRIAGE_RULES_PATH");
        env::remove_var("TRIAGE_INTERVENTIONS_CSV");
        env::remove_var("TRIAGE_BASE_POINTS");
        env::remove_var("TRIAGE_MATCH_THRESHOLD");
        env::remove_var("TRIAGE_SEGMENTATION");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.scoring, ScoringSources::default());
    }

    #[test]
    fn reads_scoring_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "CI");
        env::set_var("TRIAGE_RULES_PATH", "rules/ed.json");
        env::set_var("TRIAGE_BASE_POINTS", " 20 ");
        env::set_var("TRIAGE_MATCH_THRESHOLD", "0.3");
        env::set_var("TRIAGE_SEGMENTATION", "lines");

        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.environment, AppEnvironment::Test);
        assert_eq!(
            config.scoring.rules_path.as_deref(),
            Some(Path::new("rules/ed.json"))
        );
        assert_eq!(config.scoring.interventions_csv, None);
        assert_eq!(config.scoring.base_points, Some(20));
        assert_eq!(config.scoring.match_threshold, Some(0.3));
        assert_eq!(config.scoring.segmentation, Some(Segmentation::Lines));
    }

    #[test]
    fn rejects_malformed_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();

        env::set_var("TRIAGE_BASE_POINTS", "-5");
        let error = AppConfig::load().expect_err("negative base");
        assert!(error.to_string().contains("TRIAGE_BASE_POINTS"));
        reset_env();

        env::set_var("TRIAGE_MATCH_THRESHOLD", "1.2");
        let error = AppConfig::load().expect_err("threshold above one");
        assert!(matches!(error, ConfigError::InvalidThreshold { .. }));
        reset_env();

        env::set_var("TRIAGE_SEGMENTATION", "sentences");
        let error = AppConfig::load().expect_err("unknown segmentation");
        assert!(error.to_string().contains("TRIAGE_SEGMENTATION"));
        reset_env();
    }
}
