//! Runtime configuration read from the process environment.

use std::env;
use std::path::PathBuf;

pub const ENV_DATA_PATH: &str = "REVIEW_DATA_PATH";
pub const ENV_DB_PATH: &str = "REVIEW_DB_PATH";
pub const ENV_BIND_ADDR: &str = "REVIEW_BIND_ADDR";
pub const ENV_DB_MAX_CONNECTIONS: &str = "REVIEW_DB_MAX_CONNECTIONS";

const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

/// Snapshot of the settings the server needs at startup.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Labelled CSV corpus the classifier is trained on.
    pub data_path: PathBuf,
    /// SQLite database file holding prediction records.
    pub db_path: PathBuf,
    pub bind_addr: String,
    pub db_max_connections: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("sample_reviews.csv"),
            db_path: PathBuf::from("reviews.db"),
            bind_addr: "127.0.0.1:5000".to_string(),
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let db_max_connections = match lookup(ENV_DB_MAX_CONNECTIONS) {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    log::warn!(
                        "ignoring {}={:?}, using {}",
                        ENV_DB_MAX_CONNECTIONS,
                        raw,
                        DEFAULT_DB_MAX_CONNECTIONS
                    );
                    DEFAULT_DB_MAX_CONNECTIONS
                }
            },
            None => defaults.db_max_connections,
        };

        Self {
            data_path: lookup(ENV_DATA_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            db_path: lookup(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            bind_addr: lookup(ENV_BIND_ADDR).unwrap_or(defaults.bind_addr),
            db_max_connections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = AppConfig::from_lookup(lookup_from(&[]));
        assert_eq!(cfg.data_path, PathBuf::from("sample_reviews.csv"));
        assert_eq!(cfg.db_path, PathBuf::from("reviews.db"));
        assert_eq!(cfg.bind_addr, "127.0.0.1:5000");
        assert_eq!(cfg.db_max_connections, 5);
    }

    #[test]
    fn environment_overrides_defaults() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            (ENV_DATA_PATH, "/srv/corpus.csv"),
            (ENV_DB_PATH, "/srv/reviews.db"),
            (ENV_BIND_ADDR, "0.0.0.0:8080"),
            (ENV_DB_MAX_CONNECTIONS, "12"),
        ]));
        assert_eq!(cfg.data_path, PathBuf::from("/srv/corpus.csv"));
        assert_eq!(cfg.db_path, PathBuf::from("/srv/reviews.db"));
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080");
        assert_eq!(cfg.db_max_connections, 12);
    }

    #[test]
    fn bad_pool_size_falls_back() {
        let cfg = AppConfig::from_lookup(lookup_from(&[(ENV_DB_MAX_CONNECTIONS, "lots")]));
        assert_eq!(cfg.db_max_connections, 5);
        let cfg = AppConfig::from_lookup(lookup_from(&[(ENV_DB_MAX_CONNECTIONS, "0")]));
        assert_eq!(cfg.db_max_connections, 5);
    }
}
