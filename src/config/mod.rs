use std::path::PathBuf;

use log::warn;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding one `<title>.txt` per page
    pub data_dir: PathBuf,
    /// Directory searched for HTML template overrides
    pub views_dir: PathBuf,
    pub port: u16,
    pub host: String,
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            views_dir: PathBuf::from("views"),
            port: DEFAULT_PORT,
            host: DEFAULT_HOST.to_string(),
        }
    }

    /// Create configuration with custom values
    pub fn with_custom(
        data_dir: PathBuf,
        views_dir: PathBuf,
        port: Option<u16>,
        host: Option<String>,
    ) -> Self {
        Self {
            data_dir,
            views_dir,
            port: port.unwrap_or(DEFAULT_PORT),
            host: host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
        }
    }

    /// Defaults overridden by `FLATWIKI_DATA_DIR`, `FLATWIKI_VIEWS_DIR`, `FLATWIKI_HOST` and `FLATWIKI_PORT`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::new();
        let port = lookup("FLATWIKI_PORT").and_then(|raw| match raw.trim().parse::<u16>() {
            Ok(port) => Some(port),
            Err(_) => {
                warn!("Ignoring invalid FLATWIKI_PORT {:?}, using {}", raw, DEFAULT_PORT);
                None
            }
        });
        Self::with_custom(
            lookup("FLATWIKI_DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            lookup("FLATWIKI_VIEWS_DIR").map(PathBuf::from).unwrap_or(defaults.views_dir),
            port,
            lookup("FLATWIKI_HOST"),
        )
    }

    /// `host:port` for binding the listener
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
