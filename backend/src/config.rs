//! Server configuration.
//!
//! Values come from the environment (a `.env` file is loaded first) and
//! can be overridden by command line flags.

use std::env;
use std::path::PathBuf;

/// Port used when `PORT` is unset or invalid.
pub const DEFAULT_PORT: u16 = 8000;

/// Model definition used when `MODEL_PATH` is unset.
pub const DEFAULT_MODEL_PATH: &str = "model.json";

/// Built frontend served at `/` when `STATIC_DIR` is unset.
pub const DEFAULT_STATIC_DIR: &str = "frontend/dist";

/// Upload size cap in MiB when `UPLOAD_LIMIT_MB` is unset or invalid.
pub const DEFAULT_UPLOAD_LIMIT_MB: usize = 100;

/// Runtime settings for `predict serve`.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub model_path: PathBuf,
    pub static_dir: PathBuf,
    /// Largest accepted request body, in MiB
    pub upload_limit_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            upload_limit_mb: DEFAULT_UPLOAD_LIMIT_MB,
        }
    }
}

impl ServerConfig {
    /// Read `PORT`, `MODEL_PATH`, `STATIC_DIR` and `UPLOAD_LIMIT_MB`.
    pub fn from_env() -> Self {
        // Try loading .env file
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; missing or unparsable values use defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            port: lookup("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(defaults.port),
            model_path: lookup("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            upload_limit_mb: lookup("UPLOAD_LIMIT_MB")
                .and_then(|v| v.trim().parse().ok())
                .filter(|mb| *mb > 0)
                .unwrap_or(defaults.upload_limit_mb),
        }
    }

    pub fn with_port(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    pub fn with_model_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.model_path = path;
        }
        self
    }

    pub fn with_upload_limit_mb(mut self, mb: Option<usize>) -> Self {
        if let Some(mb) = mb {
            self.upload_limit_mb = mb;
        }
        self
    }

    /// Upload cap in bytes.
    pub fn upload_limit_bytes(&self) -> usize {
        self.upload_limit_mb.saturating_mul(1024 * 1024)
    }

    pub fn with_static_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.static_dir = dir;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_values_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("PORT", "9100"),
            ("MODEL_PATH", "models/fare.json"),
            ("STATIC_DIR", "public"),
            ("UPLOAD_LIMIT_MB", "25"),
        ]
        .into_iter()
        .collect();

        let config = ServerConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.port, 9100);
        assert_eq!(config.model_path, PathBuf::from("models/fare.json"));
        assert_eq!(config.static_dir, PathBuf::from("public"));
        assert_eq!(config.upload_limit_mb, 25);
        assert_eq!(config.upload_limit_bytes(), 25 * 1024 * 1024);
    }

    #[test]
    fn test_invalid_upload_limit_falls_back() {
        let config = ServerConfig::from_lookup(|k| (k == "UPLOAD_LIMIT_MB").then(|| "0".to_string()));
        assert_eq!(config.upload_limit_mb, DEFAULT_UPLOAD_LIMIT_MB);
        assert!(config.upload_limit_bytes() > 2 * 1024 * 1024);
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = ServerConfig::from_lookup(|k| (k == "PORT").then(|| "eighty".to_string()));
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_flags_override() {
        let config = ServerConfig::default()
            .with_port(Some(3000))
            .with_model_path(None)
            .with_static_dir(Some(PathBuf::from("dist")));
        assert_eq!(config.port, 3000);
        assert_eq!(config.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
        assert_eq!(config.static_dir, PathBuf::from("dist"));
    }
}
