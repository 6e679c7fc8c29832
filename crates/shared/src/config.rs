//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Library behaviour toggles.
    #[serde(default)]
    pub library: LibraryConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Returns the `host:port` string to bind the listener to.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://library.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Library behaviour configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LibraryConfig {
    /// Insert the demo students on startup (existing tags are left alone).
    #[serde(default = "default_seed_sample_students")]
    pub seed_sample_students: bool,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            seed_sample_students: default_seed_sample_students(),
        }
    }
}

fn default_seed_sample_students() -> bool {
    true
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Later sources win: built-in defaults, `config/default`,
    /// `config/{RUN_MODE}`, then `LIBRIS__SECTION__KEY` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("LIBRIS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 5] = [
        "LIBRIS__SERVER__HOST",
        "LIBRIS__SERVER__PORT",
        "LIBRIS__DATABASE__URL",
        "LIBRIS__DATABASE__MAX_CONNECTIONS",
        "LIBRIS__LIBRARY__SEED_SAMPLE_STUDENTS",
    ];

    fn unset_all() -> Vec<(&'static str, Option<&'static str>)> {
        VARS.iter().map(|v| (*v, None)).collect()
    }

    #[test]
    fn test_defaults_without_sources() {
        temp_env::with_vars(unset_all(), || {
            let config = AppConfig::load().expect("defaults should load");
            assert_eq!(config.server.host, "0.0.0.0");
            assert_eq!(config.server.port, 5000);
            assert_eq!(config.database.url, "sqlite://library.db?mode=rwc");
            assert_eq!(config.database.max_connections, 10);
            assert_eq!(config.database.min_connections, 1);
            assert!(config.library.seed_sample_students);
        });
    }

    #[test]
    fn test_environment_overrides() {
        temp_env::with_vars(
            [
                ("LIBRIS__SERVER__PORT", Some("8081")),
                ("LIBRIS__DATABASE__URL", Some("postgres://localhost/libris")),
                ("LIBRIS__LIBRARY__SEED_SAMPLE_STUDENTS", Some("false")),
            ],
            || {
                let config = AppConfig::load().expect("env config should load");
                assert_eq!(config.server.port, 8081);
                assert_eq!(config.server.host, "0.0.0.0");
                assert_eq!(config.database.url, "postgres://localhost/libris");
                assert!(!config.library.seed_sample_students);
            },
        );
    }

    #[rstest]
    #[case("0.0.0.0", 5000, "0.0.0.0:5000")]
    #[case("127.0.0.1", 8080, "127.0.0.1:8080")]
    fn test_bind_address(#[case] host: &str, #[case] port: u16, #[case] expected: &str) {
        let server = ServerConfig {
            host: host.to_string(),
            port,
        };
        assert_eq!(server.bind_address(), expected);
    }
}
