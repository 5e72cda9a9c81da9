use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Environment variable naming the default config file.
pub const CONFIG_ENV: &str = "FOLIO_CONFIG";

/// Server configuration, usually read from a TOML file.
///
/// Every field has a default, so a config file only needs the keys it
/// changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Directory acting as the object storage bucket.
    pub bucket_root: PathBuf,
    pub bucket_name: String,
    /// Base of public object URLs: `{public_base_url}/{bucket}/{key}`.
    pub public_base_url: String,
    /// Directory of static markdown articles.
    pub content_dir: PathBuf,
    /// Author used when an article's front matter names none.
    pub default_author: String,
    /// Portfolio document (TOML or JSON).
    pub portfolio_path: Option<PathBuf>,
    pub max_upload_size: usize,
    /// Hex-encoded 32-byte key; enables signed read URLs.
    pub signing_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            bucket_root: PathBuf::from("bucket"),
            bucket_name: "blogscontent".into(),
            public_base_url: "https://storage.googleapis.com".into(),
            content_dir: PathBuf::from("content/articles"),
            default_author: "Site Owner".into(),
            portfolio_path: None,
            max_upload_size: 10 * 1024 * 1024,
            signing_key: None,
        }
    }
}

impl ServerConfig {
    /// Parse a TOML config document.
    pub fn from_toml(source: &str) -> ServerResult<Self> {
        toml::from_str(source).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Read a TOML config file.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&source)
    }

    /// Load from `path`, else from the file named by `FOLIO_CONFIG`, else
    /// fall back to defaults.
    pub fn resolve(path: Option<&Path>) -> ServerResult<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match std::env::var_os(CONFIG_ENV) {
            Some(env_path) => Self::load(Path::new(&env_path)),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(c.bucket_name, "blogscontent");
        assert_eq!(c.max_upload_size, 10 * 1024 * 1024);
        assert!(c.signing_key.is_none());
        assert!(c.portfolio_path.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = ServerConfig::from_toml(
            r#"
            bind_addr = "0.0.0.0:8080"
            bucket_root = "/var/lib/folio"
            default_author = "Jane Doe"
            "#,
        )
        .unwrap();
        assert_eq!(c.bind_addr.port(), 8080);
        assert_eq!(c.bucket_root, PathBuf::from("/var/lib/folio"));
        assert_eq!(c.default_author, "Jane Doe");
        assert_eq!(c.bucket_name, "blogscontent");
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = ServerConfig::from_toml("bind_addr = 12").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.toml");
        std::fs::write(&path, "bucket_name = \"other\"\n").unwrap();
        let c = ServerConfig::resolve(Some(&path)).unwrap();
        assert_eq!(c.bucket_name, "other");
        assert!(ServerConfig::load(&dir.path().join("missing.toml")).is_err());
    }
}
