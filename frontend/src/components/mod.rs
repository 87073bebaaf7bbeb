//! UI Components for the prediction application.
//!
//! # Layout Components
//! - [`Hero`] - Main title and description
//! - [`Footer`] - Page footer
//!
//! # Feature Components
//! - [`UploadSection`] - File selection, upload and busy indicator
//! - [`ResultsSection`] - Results table with CSV/JSON export

mod hero;
mod upload;
mod results;
mod footer;

pub use hero::*;
pub use upload::*;
pub use results::*;
pub use footer::*;
