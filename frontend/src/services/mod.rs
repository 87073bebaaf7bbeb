//! Backend communication and browser-side services.
//!
//! # Services
//!
//! - [`predict`] - File upload to the prediction endpoint
//! - [`export`] - CSV/JSON download of the rendered results
//! - [`notify`] - User alerts

pub mod predict;
pub mod export;
pub mod notify;

pub use predict::*;
pub use export::*;
pub use notify::*;
