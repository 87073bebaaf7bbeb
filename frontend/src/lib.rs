//! Fare Prediction - Frontend Rust/Leptos Application
//!
//! A WebAssembly frontend for uploading a CSV or JSON file of trips,
//! showing the predicted fares and downloading them again.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  MainContent                                                 │
//! │  ├── Hero (title, description)                              │
//! │  ├── UploadSection (file input, upload button, spinner)     │
//! │  └── ResultsSection (table or placeholder, exports)         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Footer                                                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Upload → `POST /api/predict` → render → optional CSV/JSON download.
//!
//! # Modules
//!
//! - [`types`] - Records, result sets and errors
//! - [`table`] - Display formatting of the results table
//! - [`components`] - UI components (Upload, Results, etc.)
//! - [`services`] - Prediction request, exports, alerts

use leptos::*;
use leptos_meta::*;
use leptos_router::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod config;
pub mod types;
pub mod table;
pub mod components;
pub mod services;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Types
pub use types::{
    // Results
    CellValue, Record, ResultSet,
    // Errors
    AppError, AppResult,
};

// Components
pub use components::*;

// Services
pub use services::*;

// =============================================================================
// Application
// =============================================================================

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text=APP_TITLE/>
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=MainContent/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn MainContent() -> impl IntoView {
    // Last rendered results; each upload replaces them
    let (results, set_results) = create_signal(None::<ResultSet>);

    view! {
        <div class="container">
            <Hero/>
            <UploadSection set_results=set_results/>
            <ResultsSection results=results/>
        </div>

        <Footer/>
    }
}
