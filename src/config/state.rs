// Application state module
// Read-only state shared by every connection task

use crate::catalog::Catalog;

use super::types::Config;

/// Application state
///
/// Built once at startup and handed to handlers behind an `Arc`. Nothing in
/// here is written after construction, so no locking is involved.
pub struct AppState {
    pub config: Config,
    pub catalog: Catalog,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            catalog: Catalog::builtin(),
        }
    }
}
