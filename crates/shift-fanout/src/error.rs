use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::shifts::{RepositoryError, SeedError, ShiftServiceError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Seed(SeedError),
    Engine(ShiftServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Seed(err) => write!(f, "seed data error: {}", err),
            AppError::Engine(err) => write!(f, "shift engine error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Seed(err) => Some(err),
            AppError::Engine(err) => Some(err),
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

impl From<SeedError> for AppError {
    fn from(value: SeedError) -> Self {
        Self::Seed(value)
    }
}

impl From<ShiftServiceError> for AppError {
    fn from(value: ShiftServiceError) -> Self {
        Self::Engine(value)
    }
}

impl From<RepositoryError> for AppError {
    fn from(value: RepositoryError) -> Self {
        Self::Engine(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::shifts::ShiftId;
    use std::error::Error;

    #[test]
    fn io_errors_keep_their_source() {
        let err = AppError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "seed.json missing",
        ));

        assert_eq!(err.to_string(), "io error: seed.json missing");
        assert!(err.source().is_some());
    }

    #[test]
    fn repository_errors_surface_as_engine_errors() {
        let err = AppError::from(RepositoryError::NotFound("S9".to_string()));
        assert!(matches!(err, AppError::Engine(_)));
        assert!(err.to_string().starts_with("shift engine error:"));

        let err = AppError::from(SeedError::InconsistentShift(ShiftId::new("S1")));
        assert!(err.to_string().starts_with("seed data error:"));
    }
}
