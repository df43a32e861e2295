//! HTTP API for the image asset service
//!
//! Exposed as a library so integration tests can build the router against a
//! scratch upload directory; `main.rs` is a thin binary wrapper.

pub mod api_doc;
pub mod error;
pub mod handlers;
pub mod request_log;
pub mod routes;
pub mod state;
pub mod telemetry;
