use std::net::SocketAddr;

/// 6573 is ascii for "AI"
const DEFAULT_PORT: u16 = 6573;

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Directory served for every path that is not an API or WebSocket route
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            static_dir: "static".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Ignoring invalid PORT {:?}, using {}", raw, defaults.port);
                defaults.port
            }),
            Err(_) => defaults.port,
        };

        let static_dir = std::env::var("STATIC_DIR")
            .ok()
            .and_then(|dir| {
                let trimmed = dir.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .unwrap_or(defaults.static_dir);

        Self { port, static_dir }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
