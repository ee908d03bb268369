//! Environment-driven configuration.

use std::net::SocketAddr;
use std::str::FromStr;

use courier_notifications::application::command_handlers::MarkReadPolicy;
use courier_notifications::application::query_handlers::DEFAULT_LIST_LIMIT;
use courier_orders::domain::cart::{CartLimits, DEFAULT_MAX_QUANTITY};
use courier_orders::domain::policy::TransitionRules;

use crate::error::AppError;

/// Behavioural knobs passed to the handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSettings {
    /// Per-line cart bounds.
    pub cart_limits: CartLimits,
    /// Inbox page size when the request gives none.
    pub inbox_default_limit: u32,
    /// Ownership handling for mark-read.
    pub mark_read_policy: MarkReadPolicy,
    /// Admin transition rules.
    pub transition_rules: TransitionRules,
    /// Whether `POST /notifications/test` is routed.
    pub enable_test_notifications: bool,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            cart_limits: CartLimits::default(),
            inbox_default_limit: DEFAULT_LIST_LIMIT,
            mark_read_policy: MarkReadPolicy::Strict,
            transition_rules: TransitionRules::default(),
            enable_test_notifications: false,
        }
    }
}

/// Server configuration read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `PostgreSQL` connection URL.
    pub database_url: String,
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Connection pool size.
    pub database_max_connections: u32,
    /// OTLP collector endpoint; export is disabled when unset.
    pub otlp_endpoint: Option<String>,
    /// Handler settings.
    pub service: ServiceSettings,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// value does not parse.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// value does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                AppError::Config("DATABASE_URL environment variable must be set".to_owned())
            })?;
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned());
        let port = parse_or("PORT", lookup("PORT"), 3000_u16)?;
        let database_max_connections =
            parse_or("DATABASE_MAX_CONNECTIONS", lookup("DATABASE_MAX_CONNECTIONS"), 10_u32)?;

        let max_quantity = parse_or(
            "COURIER_MAX_ITEM_QUANTITY",
            lookup("COURIER_MAX_ITEM_QUANTITY"),
            DEFAULT_MAX_QUANTITY,
        )?;
        if max_quantity < 1 {
            return Err(AppError::Config(
                "COURIER_MAX_ITEM_QUANTITY must be at least 1".to_owned(),
            ));
        }
        let inbox_default_limit = parse_or(
            "COURIER_INBOX_DEFAULT_LIMIT",
            lookup("COURIER_INBOX_DEFAULT_LIMIT"),
            DEFAULT_LIST_LIMIT,
        )?;
        if inbox_default_limit == 0 {
            return Err(AppError::Config(
                "COURIER_INBOX_DEFAULT_LIMIT must be at least 1".to_owned(),
            ));
        }
        let strict_mark_read = parse_flag(
            "COURIER_STRICT_MARK_READ",
            lookup("COURIER_STRICT_MARK_READ"),
            true,
        )?;
        let forward_only_for_admin = parse_flag(
            "COURIER_ADMIN_FORWARD_ONLY",
            lookup("COURIER_ADMIN_FORWARD_ONLY"),
            false,
        )?;
        let enable_test_notifications = parse_flag(
            "COURIER_ENABLE_TEST_NOTIFICATIONS",
            lookup("COURIER_ENABLE_TEST_NOTIFICATIONS"),
            false,
        )?;
        let otlp_endpoint = lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|v| !v.trim().is_empty());

        Ok(Self {
            database_url,
            host,
            port,
            database_max_connections,
            otlp_endpoint,
            service: ServiceSettings {
                cart_limits: CartLimits { max_quantity },
                inbox_default_limit,
                mark_read_policy: if strict_mark_read {
                    MarkReadPolicy::Strict
                } else {
                    MarkReadPolicy::Lenient
                },
                transition_rules: TransitionRules {
                    forward_only_for_admin,
                },
                enable_test_notifications,
            },
        })
    }

    /// The socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key} is invalid: {e}"))),
    }
}

fn parse_flag(key: &str, raw: Option<String>, default: bool) -> Result<bool, AppError> {
    let Some(value) = raw else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(AppError::Config(format!(
            "{key} must be a boolean, got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults_apply_when_only_database_url_is_set() {
        let config = config_from(&[("DATABASE_URL", "postgres://localhost/courier")]).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.otlp_endpoint, None);
        assert_eq!(config.service, ServiceSettings::default());
        assert_eq!(config.service.cart_limits.max_quantity, 100);
        assert_eq!(config.service.inbox_default_limit, 20);
    }

    #[test]
    fn test_missing_database_url_is_config_error() {
        assert!(matches!(config_from(&[]), Err(AppError::Config(_))));
    }

    #[test]
    fn test_service_knobs_are_read() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/courier"),
            ("PORT", "8080"),
            ("COURIER_MAX_ITEM_QUANTITY", "12"),
            ("COURIER_INBOX_DEFAULT_LIMIT", "50"),
            ("COURIER_STRICT_MARK_READ", "no"),
            ("COURIER_ADMIN_FORWARD_ONLY", "TRUE"),
            ("COURIER_ENABLE_TEST_NOTIFICATIONS", "1"),
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://collector:4317"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.service.cart_limits.max_quantity, 12);
        assert_eq!(config.service.inbox_default_limit, 50);
        assert_eq!(config.service.mark_read_policy, MarkReadPolicy::Lenient);
        assert!(config.service.transition_rules.forward_only_for_admin);
        assert!(config.service.enable_test_notifications);
        assert_eq!(
            config.otlp_endpoint.as_deref(),
            Some("http://collector:4317")
        );
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        for (key, value) in [
            ("PORT", "http"),
            ("COURIER_MAX_ITEM_QUANTITY", "0"),
            ("COURIER_INBOX_DEFAULT_LIMIT", "0"),
            ("COURIER_STRICT_MARK_READ", "maybe"),
        ] {
            let result = config_from(&[("DATABASE_URL", "postgres://localhost/courier"), (key, value)]);
            assert!(matches!(result, Err(AppError::Config(_))), "{key}={value}");
        }
    }

    #[test]
    fn test_bind_addr_combines_host_and_port() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/courier"),
            ("HOST", "127.0.0.1"),
            ("PORT", "4000"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:4000");
    }
}
