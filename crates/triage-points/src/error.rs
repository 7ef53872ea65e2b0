use crate::config::ConfigError;
use crate::scoring::{RulesLoadError, ScoringConfigError};
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Rules(RulesLoadError),
    Scoring(ScoringConfigError),
    Json(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Rules(err) => write!(f, "rules error: {}", err),
            AppError::Scoring(err) => write!(f, "invalid scoring configuration: {}", err),
            AppError::Json(err) => write!(f, "serialization error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Rules(err) => Some(err),
            AppError::Scoring(err) => Some(err),
            AppError::Json(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<RulesLoadError> for AppError {
    fn from(value: RulesLoadError) -> Self {
        Self::Rules(value)
    }
}

impl From<ScoringConfigError> for AppError {
    fn from(value: ScoringConfigError) -> Self {
        Self::Scoring(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn scoring_errors_keep_their_cause() {
        let error = AppError::from(ScoringConfigError::NoLevels);
        assert_eq!(
            error.to_string(),
            "invalid scoring configuration: no level bands configured"
        );
        assert!(error.source().is_some());
    }

    #[test]
    fn rules_errors_name_the_file() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error = AppError::from(RulesLoadError::Io {
            path: "rules/ed.json".into(),
            source: io,
        });
        assert!(error.to_string().contains("rules/ed.json"));
    }
}
