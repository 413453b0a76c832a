//! Client configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::CoreError;
use crate::Result;

const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the local storage database
    pub database_path: PathBuf,
    /// Base URL of the backend API
    pub api_base_url: String,
    /// Timeout for auth requests
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("estoque.db"),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    /// Defaults overlaid with `ESTOQUE_API_URL`, `ESTOQUE_DATABASE_PATH`
    /// and `ESTOQUE_REQUEST_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("ESTOQUE_API_URL").filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url;
        }

        if let Some(path) = lookup("ESTOQUE_DATABASE_PATH").filter(|v| !v.trim().is_empty()) {
            self.database_path = PathBuf::from(path);
        }

        if let Some(raw) = lookup("ESTOQUE_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = raw.trim().parse().map_err(|_| {
                CoreError::Config(format!("ESTOQUE_REQUEST_TIMEOUT_SECS is not a number: {raw}"))
            })?;
        }

        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("Estoque"))
            .unwrap_or_else(|| PathBuf::from(".estoque"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::new(PathBuf::from("/tmp/estoque"));
        assert_eq!(config.database_path, PathBuf::from("/tmp/estoque/estoque.db"));
        assert_eq!(config.api_base_url, "http://localhost:3000");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let config = Config::new(PathBuf::from("/tmp/estoque"))
            .with_overrides(lookup(&[
                ("ESTOQUE_API_URL", "https://api.estoque.app"),
                ("ESTOQUE_DATABASE_PATH", "/var/lib/estoque/local.db"),
                ("ESTOQUE_REQUEST_TIMEOUT_SECS", " 5 "),
            ]))
            .unwrap();

        assert_eq!(config.api_base_url, "https://api.estoque.app");
        assert_eq!(config.database_path, PathBuf::from("/var/lib/estoque/local.db"));
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn test_blank_overrides_are_ignored() {
        let config = Config::new(PathBuf::from("/tmp/estoque"))
            .with_overrides(lookup(&[("ESTOQUE_API_URL", "  ")]))
            .unwrap();
        assert_eq!(config.api_base_url, "http://localhost:3000");
    }

    #[test]
    fn test_from_env() {
        temp_env::with_vars(
            [
                ("ESTOQUE_API_URL", Some("https://api.estoque.app")),
                ("ESTOQUE_DATABASE_PATH", Some("/var/lib/estoque/env.db")),
                ("ESTOQUE_REQUEST_TIMEOUT_SECS", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.api_base_url, "https://api.estoque.app");
                assert_eq!(config.database_path, PathBuf::from("/var/lib/estoque/env.db"));
                assert_eq!(config.request_timeout_secs, 30);
            },
        );

        temp_env::with_var("ESTOQUE_REQUEST_TIMEOUT_SECS", Some("later"), || {
            assert!(matches!(Config::from_env(), Err(CoreError::Config(_))));
        });
    }

    #[test]
    fn test_bad_timeout() {
        let err = Config::new(PathBuf::from("/tmp/estoque"))
            .with_overrides(lookup(&[("ESTOQUE_REQUEST_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }
}
