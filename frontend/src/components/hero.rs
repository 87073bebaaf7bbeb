//! Hero section component

use leptos::*;

use crate::config::APP_TITLE;

#[component]
pub fn Hero() -> impl IntoView {
    view! {
        <div class="hero">
            <h1>{APP_TITLE}</h1>
            <p class="subtitle">
                "Upload a CSV or JSON file of trips to get a fare prediction for each row. "
                "Results can be downloaded as CSV or JSON."
            </p>
        </div>
    }
}
