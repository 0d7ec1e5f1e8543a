//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the endpoint logic.

pub mod request;
pub mod response;

// Re-export commonly used types
pub use request::{parse_json, query_param, read_body, BoxError};
pub use response::{
    apply_common_headers, build_404_response, build_405_response, build_options_response,
    error_response, json_response, HttpResponse,
};
