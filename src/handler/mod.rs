//! Request handler module
//!
//! Responsible for request routing dispatch and the endpoint logic.

pub mod calculate;
pub mod files;
pub mod router;
pub mod system;

// Re-export main entry point
pub use router::{handle_request, Endpoint};
