//! HTTP API module.
//!
//! This module provides the HTTP server and API types for the prediction backend.

pub mod server;
pub mod types;

pub use server::{router, serve, start_server};
pub use types::*;
