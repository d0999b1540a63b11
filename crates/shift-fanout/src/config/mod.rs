use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub fanout: FanoutConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let escalation_delay = env::var("FANOUT_ESCALATION_DELAY_SECS")
            .ok()
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|_| ConfigError::InvalidEscalationDelay)
            })
            .transpose()?
            .unwrap_or(FanoutConfig::DEFAULT_ESCALATION_DELAY);

        let notifier_latency = env::var("FANOUT_NOTIFIER_LATENCY_MS")
            .ok()
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|_| ConfigError::InvalidNotifierLatency)
            })
            .transpose()?
            .unwrap_or(Duration::ZERO);

        let seed_path = env::var("FANOUT_SEED_PATH")
            .ok()
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            fanout: FanoutConfig {
                escalation_delay,
                notifier_latency,
                seed_path,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Timing and data sources for the shift fanout engine.
#[derive(Debug, Clone)]
pub struct FanoutConfig {
    /// How long an unclaimed shift waits before phone escalation.
    pub escalation_delay: Duration,
    /// Simulated latency of the logging notifier.
    pub notifier_latency: Duration,
    pub seed_path: Option<PathBuf>,
}

impl FanoutConfig {
    pub const DEFAULT_ESCALATION_DELAY: Duration = Duration::from_secs(600);
}

impl Default for FanoutConfig {
    fn default() -> Self {
        Self {
            escalation_delay: Self::DEFAULT_ESCALATION_DELAY,
            notifier_latency: Duration::ZERO,
            seed_path: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidEscalationDelay,
    InvalidNotifierLatency,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidEscalationDelay => write!(
                f,
                "FANOUT_ESCALATION_DELAY_SECS must be a whole number of seconds"
            ),
            ConfigError::InvalidNotifierLatency => write!(
                f,
                "FANOUT_NOTIFIER_LATENCY_MS must be a whole number of milliseconds"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidEscalationDelay
            | ConfigError::InvalidNotifierLatency => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("FANOUT_ESCALATION_DELAY_SECS");
        env::remove_var("FANOUT_NOTIFIER_LATENCY_MS");
        env::remove_var("FANOUT_SEED_PATH");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.fanout.escalation_delay, Duration::from_secs(600));
        assert_eq!(config.fanout.notifier_latency, Duration::ZERO);
        assert!(config.fanout.seed_path.is_none());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_fanout_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("FANOUT_ESCALATION_DELAY_SECS", "30");
        env::set_var("FANOUT_NOTIFIER_LATENCY_MS", "250");
        env::set_var("FANOUT_SEED_PATH", "data/seed.json");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.fanout.escalation_delay, Duration::from_secs(30));
        assert_eq!(config.fanout.notifier_latency, Duration::from_millis(250));
        assert_eq!(
            config.fanout.seed_path.as_deref(),
            Some(std::path::Path::new("data/seed.json"))
        );
        reset_env();
    }

    #[test]
    fn rejects_non_numeric_escalation_delay() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("FANOUT_ESCALATION_DELAY_SECS", "ten minutes");
        let err = AppConfig::load().expect_err("delay must be numeric");
        assert!(matches!(err, ConfigError::InvalidEscalationDelay));
        reset_env();
    }
}
