// Server loop module
// Accepts connections until shutdown is requested, then drains them

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Accept loop for the storefront server
///
/// Must run inside a `LocalSet`: every connection is a `spawn_local` task, so
/// request handling stays on this thread. Returns once `shutdown` fires and
/// open connections have finished or `server.shutdown_grace` has elapsed.
pub async fn start_server_loop(listener: TcpListener, state: Arc<AppState>, shutdown: Arc<Notify>) {
    let active_connections = Arc::new(AtomicUsize::new(0));
    let graceful = GracefulShutdown::new();

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                            &graceful,
                        );
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => {
                logger::log_info("Shutdown requested, no longer accepting connections");
                break;
            }
        }
    }

    drop(listener);

    let grace = Duration::from_secs(state.config.server.shutdown_grace);
    match tokio::time::timeout(grace, graceful.shutdown()).await {
        Ok(()) => logger::log_shutdown_complete(0),
        Err(_) => logger::log_shutdown_complete(active_connections.load(Ordering::SeqCst)),
    }
}
