//! HTTP server module.
//!
//! Binds the configured address and serves the router until SIGINT or SIGTERM,
//! then drains in-flight requests before returning.

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
