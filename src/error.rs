//! Startup error type
//!
//! Request handling never fails (handlers map every problem to a response),
//! so this only covers what can stop the process from serving at all.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration could not be loaded or deserialized
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// `server.host`/`server.port` do not form a socket address
    #[error("invalid listen address {0}")]
    InvalidAddress(String),

    /// Listener creation or binding failed
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Log files could not be opened
    #[error("failed to initialize logging: {0}")]
    Logger(#[source] std::io::Error),

    /// Any other I/O failure (runtime construction, accept loop)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
