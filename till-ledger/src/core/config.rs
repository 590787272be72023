use crate::orders::ids::DEFAULT_MAX_ATTEMPTS;
use crate::orders::sequence::DEFAULT_CEILING;
use chrono_tz::Tz;
use std::fmt;
use std::str::FromStr;

/// Refund behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefundPolicy {
    /// Existence and status checked in the write transaction; missing orders
    /// fail with `NotFound`, refunded ones with `Conflict`
    #[default]
    Strict,
    /// Unconditional status update keyed by id
    Permissive,
}

impl RefundPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Permissive => "permissive",
        }
    }
}

impl fmt::Display for RefundPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RefundPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "permissive" => Ok(Self::Permissive),
            other => Err(format!("unknown refund policy: {other}")),
        }
    }
}

/// Ledger configuration
///
/// # Environment
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | DB_PATH | Database/pos.db | SQLite file |
/// | TIMEZONE | UTC | IANA zone of the business day |
/// | DISPLAY_NUMBER_CEILING | 99 | wrap point of the daily display number |
/// | ID_MAX_ATTEMPTS | 100 | identifier probe bound |
/// | REFUND_POLICY | strict | `strict` or `permissive` |
/// | LOG_LEVEL | info | tracing filter directive, `RUST_LOG` wins |
/// | LOG_DIR | (unset) | daily rolling log directory |
/// | APP_ENV | development | environment name |
///
/// # Example
///
/// ```text
/// DB_PATH=/data/pos.db TIMEZONE=Europe/Madrid till-ledger summary
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    /// Zone that defines the local calendar day
    pub timezone: Tz,
    pub display_number_ceiling: i32,
    pub id_max_attempts: u32,
    pub refund_policy: RefundPolicy,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// development | staging | production
    pub environment: String,
}

impl Config {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            db_path: std::env::var("DB_PATH").unwrap_or(defaults.db_path),
            timezone: std::env::var("TIMEZONE")
                .ok()
                .and_then(|tz| match tz.parse::<Tz>() {
                    Ok(tz) => Some(tz),
                    Err(e) => {
                        tracing::warn!("Invalid TIMEZONE '{}': {}, falling back to UTC", tz, e);
                        None
                    }
                })
                .unwrap_or(defaults.timezone),
            display_number_ceiling: std::env::var("DISPLAY_NUMBER_CEILING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.display_number_ceiling),
            id_max_attempts: std::env::var("ID_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.id_max_attempts),
            refund_policy: std::env::var("REFUND_POLICY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.refund_policy),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            environment: std::env::var("APP_ENV").unwrap_or(defaults.environment),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: "Database/pos.db".into(),
            timezone: Tz::UTC,
            display_number_ceiling: DEFAULT_CEILING,
            id_max_attempts: DEFAULT_MAX_ATTEMPTS,
            refund_policy: RefundPolicy::Strict,
            log_level: "info".into(),
            log_dir: None,
            environment: "development".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.db_path, "Database/pos.db");
        assert_eq!(config.timezone, Tz::UTC);
        assert_eq!(config.display_number_ceiling, 99);
        assert_eq!(config.id_max_attempts, 100);
        assert_eq!(config.refund_policy, RefundPolicy::Strict);
        assert!(config.log_dir.is_none());
        assert!(config.is_development());
    }

    #[test]
    fn test_refund_policy_parse() {
        assert_eq!("strict".parse(), Ok(RefundPolicy::Strict));
        assert_eq!(" Permissive ".parse(), Ok(RefundPolicy::Permissive));
        assert!("lenient".parse::<RefundPolicy>().is_err());
    }
}
