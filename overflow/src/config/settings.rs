//! Server settings read from the environment.

use std::collections::HashSet;
use std::env;
use std::net::{IpAddr, SocketAddr};

use crate::errors::ServerError;

/// Default bind address.
const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default bind port.
const DEFAULT_SERVER_PORT: u16 = 8080;

/// Default bearer token lifetime, one day.
const DEFAULT_SESSION_TTL_SECS: i64 = 86_400;

/// Longest accepted bearer token lifetime, ten years.
const MAX_SESSION_TTL_SECS: i64 = 10 * 365 * 86_400;

/// Default front-end origins allowed by CORS.
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

/// Which store backs the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub store: StoreKind,
    pub database_url: Option<String>,
    pub host: IpAddr,
    pub port: u16,
    pub session_ttl: chrono::Duration,
    pub cors_origins: Vec<String>,
    pub log_format: LogFormat,
    pub run_migrations: bool,
    /// Usernames that are granted moderator rights when they register.
    pub moderator_usernames: HashSet<String>,
}

impl Settings {
    /// Reads settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `STORE`: "postgres" or "memory" (default: postgres)
    /// - `DATABASE_URL`: PostgreSQL connection string, required for the postgres store
    /// - `SERVER_HOST`: bind address (default: 127.0.0.1)
    /// - `SERVER_PORT`: bind port (default: 8080)
    /// - `SESSION_TTL_SECS`: bearer token lifetime, at most ten years (default: 86400)
    /// - `CORS_ORIGINS`: comma separated origins (default: localhost:3000 and localhost:5173)
    /// - `LOG_FORMAT`: "pretty" or "json" (default: pretty)
    /// - `RUN_MIGRATIONS`: apply embedded migrations at startup (default: true)
    /// - `MODERATOR_USERNAMES`: comma separated usernames (default: none)
    pub fn from_env() -> Result<Self, ServerError> {
        let store = match env::var("STORE")
            .unwrap_or_else(|_| "postgres".to_string())
            .to_lowercase()
            .as_str()
        {
            "postgres" | "postgresql" => StoreKind::Postgres,
            "memory" | "in-memory" => StoreKind::Memory,
            other => {
                return Err(ServerError::InvalidEnv {
                    name: "STORE",
                    value: other.to_string(),
                });
            }
        };

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());
        if store == StoreKind::Postgres && database_url.is_none() {
            return Err(ServerError::MissingEnv("DATABASE_URL"));
        }

        let host: IpAddr = parse_var("SERVER_HOST", DEFAULT_SERVER_HOST.parse().ok())?;
        let port: u16 = parse_var("SERVER_PORT", Some(DEFAULT_SERVER_PORT))?;
        let ttl_secs: i64 = parse_var("SESSION_TTL_SECS", Some(DEFAULT_SESSION_TTL_SECS))?;
        let session_ttl = Some(ttl_secs)
            .filter(|secs| (1..=MAX_SESSION_TTL_SECS).contains(secs))
            .and_then(chrono::Duration::try_seconds)
            .ok_or_else(|| ServerError::InvalidEnv {
                name: "SESSION_TTL_SECS",
                value: ttl_secs.to_string(),
            })?;

        let cors_origins = split_list(
            &env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string()),
        );

        let log_format = match env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "pretty".to_string())
            .to_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            other => {
                return Err(ServerError::InvalidEnv {
                    name: "LOG_FORMAT",
                    value: other.to_string(),
                });
            }
        };

        let run_migrations: bool = parse_var("RUN_MIGRATIONS", Some(true))?;
        let moderator_usernames = split_list(&env::var("MODERATOR_USERNAMES").unwrap_or_default())
            .into_iter()
            .collect();

        Ok(Self {
            store,
            database_url,
            host,
            port,
            session_ttl,
            cors_origins,
            log_format,
            run_migrations,
            moderator_usernames,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Parses `name` if it is set, otherwise falls back to `default`.
fn parse_var<T: std::str::FromStr>(
    name: &'static str,
    default: Option<T>,
) -> Result<T, ServerError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ServerError::InvalidEnv { name, value }),
        Err(_) => default.ok_or(ServerError::MissingEnv(name)),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serial_test::serial;

    const VARS: [&str; 9] = [
        "STORE",
        "DATABASE_URL",
        "SERVER_HOST",
        "SERVER_PORT",
        "SESSION_TTL_SECS",
        "CORS_ORIGINS",
        "LOG_FORMAT",
        "RUN_MIGRATIONS",
        "MODERATOR_USERNAMES",
    ];

    fn clear_env() {
        for var in VARS {
            unsafe {
                env::remove_var(var);
            }
        }
    }

    fn set(var: &str, value: &str) {
        unsafe {
            env::set_var(var, value);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_with_memory_store() {
        clear_env();
        set("STORE", "memory");

        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.store, StoreKind::Memory);
        assert_eq!(settings.database_url, None);
        assert_eq!(settings.addr(), "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(settings.session_ttl, chrono::Duration::seconds(86_400));
        assert_eq!(
            settings.cors_origins,
            vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()]
        );
        assert_eq!(settings.log_format, LogFormat::Pretty);
        assert!(settings.run_migrations);
        assert!(settings.moderator_usernames.is_empty());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_postgres_requires_database_url() {
        clear_env();
        let result = Settings::from_env();
        assert!(matches!(result, Err(ServerError::MissingEnv("DATABASE_URL"))));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        set("DATABASE_URL", "postgres://localhost/overflow");
        set("SERVER_HOST", "0.0.0.0");
        set("SERVER_PORT", "9000");
        set("SESSION_TTL_SECS", "60");
        set("CORS_ORIGINS", "https://overflow.test, ");
        set("LOG_FORMAT", "JSON");
        set("RUN_MIGRATIONS", "false");
        set("MODERATOR_USERNAMES", "alice,bob");

        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.store, StoreKind::Postgres);
        assert_eq!(settings.database_url.as_deref(), Some("postgres://localhost/overflow"));
        assert_eq!(settings.addr(), "0.0.0.0:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(settings.session_ttl, chrono::Duration::seconds(60));
        assert_eq!(settings.cors_origins, vec!["https://overflow.test".to_string()]);
        assert_eq!(settings.log_format, LogFormat::Json);
        assert!(!settings.run_migrations);
        assert!(settings.moderator_usernames.contains("alice"));
        assert!(settings.moderator_usernames.contains("bob"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_values_are_rejected() {
        clear_env();
        set("STORE", "mongo");
        assert!(matches!(
            Settings::from_env(),
            Err(ServerError::InvalidEnv { name: "STORE", .. })
        ));

        set("STORE", "memory");
        set("SERVER_PORT", "not-a-port");
        assert!(matches!(
            Settings::from_env(),
            Err(ServerError::InvalidEnv { name: "SERVER_PORT", .. })
        ));

        set("SERVER_PORT", "8080");
        for ttl in ["0", "-5", "10000000000000", "9300000000000000"] {
            set("SESSION_TTL_SECS", ttl);
            assert!(matches!(
                Settings::from_env(),
                Err(ServerError::InvalidEnv { name: "SESSION_TTL_SECS", .. })
            ));
        }

        set("SESSION_TTL_SECS", &MAX_SESSION_TTL_SECS.to_string());
        let settings = Settings::from_env().unwrap();
        assert!(Utc::now().checked_add_signed(settings.session_ttl).is_some());
        clear_env();
    }
}
