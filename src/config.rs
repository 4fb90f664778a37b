use std::net::SocketAddr;
use std::path::PathBuf;

/// 6573 is ascii for "AI"
pub const DEFAULT_PORT: u16 = 6573;

/// Process-level settings for the HTTP/WebSocket server
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Where the word library file lives
    pub data_dir: PathBuf,
    /// Static UI served as the fallback route
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            data_dir: PathBuf::from("data"),
            static_dir: PathBuf::from("static"),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    /// Blank or unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let addr = match env_non_empty("IMPOSTOR_ADDR") {
            Some(raw) => raw.parse::<SocketAddr>().unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid IMPOSTOR_ADDR '{}': {}", raw, e);
                defaults.addr
            }),
            None => defaults.addr,
        };

        Self {
            addr,
            data_dir: env_non_empty("IMPOSTOR_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            static_dir: env_non_empty("IMPOSTOR_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
        }
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
