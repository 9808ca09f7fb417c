// Configuration module entry point
// Loads layered configuration and holds the shared application state

mod state;
mod types;

use std::net::SocketAddr;

use crate::error::ServerError;

// Re-export public types
pub use state::AppState;
pub use types::{
    AccessLogFormat, Config, HttpConfig, LogLevel, LoggingConfig, StaticFilesConfig,
};

/// Config file looked up in the working directory (extension resolved by the `config` crate)
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// Environment variable that overrides `server.port` above every other source
pub const PORT_ENV: &str = "PORT";

impl Config {
    /// Load configuration from the default file, `LUGX_*` variables and `PORT`
    pub fn load() -> Result<Self, ServerError> {
        Self::load_from(DEFAULT_CONFIG_PATH, std::env::var(PORT_ENV).ok())
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// Sources in increasing precedence: built-in defaults, the optional file,
    /// `LUGX_<SECTION>__<KEY>` environment variables, then `port_override`.
    /// A blank `port_override` counts as unset.
    pub fn load_from(config_path: &str, port_override: Option<String>) -> Result<Self, ServerError> {
        let port_override = port_override.filter(|p| !p.trim().is_empty());
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("LUGX")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.shutdown_grace", 5)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "lugx-server")?
            .set_default("http.enable_cors", true)?
            .set_default("http.max_body_size", 102_400)? // 100KB
            .set_default("static_files.root", ".")?
            .set_default("static_files.index_files", vec!["index.html"])?
            .set_default("static_files.max_age", 0)?
            .set_override_option("server.port", port_override)?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let raw = format!("{}:{}", self.server.host, self.server.port);
        raw.parse()
            .map_err(|e| ServerError::InvalidAddress(format!("{raw}: {e}")))
    }
}
