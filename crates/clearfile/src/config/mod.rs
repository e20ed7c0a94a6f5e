use crate::workflows::reporting::{DeadlineRule, FilingEnvironment};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

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

    /// Filing submissions target the production regulator endpoint only when
    /// the whole service runs as production.
    pub fn filing_environment(self) -> FilingEnvironment {
        match self {
            AppEnvironment::Production => FilingEnvironment::Production,
            _ => FilingEnvironment::Staging,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub filing: FilingConfig,
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

        let deadline_rule = match env::var("FILING_DEADLINE_RULE") {
            Ok(raw) => parse_deadline_rule(&raw)?,
            Err(_) => DeadlineRule::ThirtyDaysAfterClosing,
        };

        let link_ttl_days = env::var("PARTY_LINK_TTL_DAYS")
            .unwrap_or_else(|_| "14".to_string())
            .parse::<i64>()
            .ok()
            .filter(|days| *days > 0)
            .ok_or(ConfigError::InvalidLinkTtl)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            filing: FilingConfig {
                deadline_rule,
                link_ttl_days,
            },
        })
    }
}

fn parse_deadline_rule(raw: &str) -> Result<DeadlineRule, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "closing_plus_30" | "thirty_days" => Ok(DeadlineRule::ThirtyDaysAfterClosing),
        "month_end" | "end_of_following_month" => Ok(DeadlineRule::EndOfFollowingMonth),
        other => Err(ConfigError::InvalidDeadlineRule {
            value: other.to_string(),
        }),
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Knobs for the filing workflow: deadline derivation and party-link expiry.
#[derive(Debug, Clone)]
pub struct FilingConfig {
    pub deadline_rule: DeadlineRule,
    pub link_ttl_days: i64,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidDeadlineRule { value: String },
    InvalidLinkTtl,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidDeadlineRule { value } => {
                write!(
                    f,
                    "FILING_DEADLINE_RULE '{value}' must be 'closing_plus_30' or 'month_end'"
                )
            }
            ConfigError::InvalidLinkTtl => {
                write!(f, "PARTY_LINK_TTL_DAYS must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
