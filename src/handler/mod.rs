//! Request handler module
//!
//! Routing dispatch plus the two kinds of content the server produces: the
//! storefront JSON API and static frontend files.

pub mod api;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
