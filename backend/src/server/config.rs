//! Server settings loaded via OrthoConfig and the runtime configuration
//! derived from them.

use std::net::SocketAddr;
use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::DbPool;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_BCRYPT_COST: u32 = 12;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Process settings from CLI flags, `RIDESHARE_*` environment variables and
/// an optional config file.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RIDESHARE")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without it the server keeps rides in memory.
    pub database_url: Option<String>,
    /// File holding at least 64 bytes of session key material.
    pub session_key_file: Option<PathBuf>,
    /// Allow a random session key when the key file is unusable.
    /// Environment and file only.
    #[ortho_config(default = false, skip_cli)]
    pub session_allow_ephemeral: bool,
    /// Mark the session cookie `Secure`. Environment and file only.
    #[ortho_config(skip_cli)]
    pub cookie_secure: Option<bool>,
    pub bcrypt_cost: Option<u32>,
    pub db_max_connections: Option<u32>,
}

/// Invalid setting values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}'")]
    BindAddr { value: String },
    #[error("bcrypt cost must be between 4 and 31, got {value}")]
    BcryptCost { value: u32 },
    #[error("db_max_connections must be at least 1")]
    DbMaxConnections,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::BindAddr {
            value: raw.to_owned(),
        })
    }

    /// The database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    pub fn bcrypt_cost(&self) -> Result<u32, SettingsError> {
        let cost = self.bcrypt_cost.unwrap_or(DEFAULT_BCRYPT_COST);
        if (4..=31).contains(&cost) {
            Ok(cost)
        } else {
            Err(SettingsError::BcryptCost { value: cost })
        }
    }

    pub fn db_max_connections(&self) -> Result<u32, SettingsError> {
        match self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS) {
            0 => Err(SettingsError::DbMaxConnections),
            n => Ok(n),
        }
    }
}

/// Runtime configuration for [`super::create_server`].
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) bcrypt_cost: u32,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            db_pool: None,
        }
    }

    /// Store users and rides in PostgreSQL instead of memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 7] = [
        "RIDESHARE_BIND_ADDR",
        "RIDESHARE_DATABASE_URL",
        "RIDESHARE_SESSION_KEY_FILE",
        "RIDESHARE_SESSION_ALLOW_EPHEMERAL",
        "RIDESHARE_COOKIE_SECURE",
        "RIDESHARE_BCRYPT_COST",
        "RIDESHARE_DB_MAX_CONNECTIONS",
    ];

    fn load_with(overrides: &[(&str, &str)]) -> ServerSettings {
        let vars = VARS.map(|name| {
            let value = overrides
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_owned());
            (name, value)
        });
        let _guard = lock_env(vars);
        ServerSettings::load_from_iter([OsString::from("rideshare")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let settings = load_with(&[]);

        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("addr")
        );
        assert_eq!(settings.database_url(), None);
        assert_eq!(
            settings.session_key_file(),
            PathBuf::from("/var/run/secrets/session_key")
        );
        assert!(!settings.session_allow_ephemeral);
        assert!(settings.cookie_secure());
        assert_eq!(settings.bcrypt_cost(), Ok(12));
        assert_eq!(settings.db_max_connections(), Ok(10));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let settings = load_with(&[
            ("RIDESHARE_BIND_ADDR", "127.0.0.1:9000"),
            ("RIDESHARE_DATABASE_URL", "postgres://localhost/rides"),
            ("RIDESHARE_SESSION_ALLOW_EPHEMERAL", "true"),
            ("RIDESHARE_COOKIE_SECURE", "false"),
            ("RIDESHARE_BCRYPT_COST", "6"),
        ]);

        assert_eq!(
            settings.bind_addr().expect("address"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("addr")
        );
        assert_eq!(settings.database_url(), Some("postgres://localhost/rides"));
        assert!(settings.session_allow_ephemeral);
        assert!(!settings.cookie_secure());
        assert_eq!(settings.bcrypt_cost(), Ok(6));
    }

    #[rstest]
    fn allowing_ephemeral_keys_keeps_cookies_secure() {
        let settings = load_with(&[("RIDESHARE_SESSION_ALLOW_EPHEMERAL", "true")]);

        assert!(settings.session_allow_ephemeral);
        assert_eq!(settings.cookie_secure, None);
        assert!(settings.cookie_secure());
    }

    #[rstest]
    fn blank_database_url_means_in_memory() {
        let settings = load_with(&[("RIDESHARE_DATABASE_URL", "   ")]);
        assert_eq!(settings.database_url(), None);
    }

    #[rstest]
    #[case(&[("RIDESHARE_BIND_ADDR", "localhost")], "bind")]
    #[case(&[("RIDESHARE_BCRYPT_COST", "40")], "bcrypt")]
    #[case(&[("RIDESHARE_DB_MAX_CONNECTIONS", "0")], "pool")]
    fn invalid_values_are_reported(#[case] overrides: &[(&str, &str)], #[case] which: &str) {
        let settings = load_with(overrides);
        let failed = match which {
            "bind" => settings.bind_addr().is_err(),
            "bcrypt" => settings.bcrypt_cost().is_err(),
            _ => settings.db_max_connections().is_err(),
        };
        assert!(failed);
    }
}
