//! HTTP protocol layer module
//!
//! Response builders and header semantics (caching, ranges, MIME types),
//! independent of which route produced the response.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used items
pub use range::ByteRange;
pub use response::{
    build_404_response, build_405_response, build_413_response, build_416_response,
    build_health_response, build_options_response, json_response, message_response,
};
