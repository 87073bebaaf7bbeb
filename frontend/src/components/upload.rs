//! File selection and prediction upload.
//!
//! Reads the selected file, posts it to the prediction endpoint and
//! publishes the returned records for the results section.

use leptos::*;

use crate::config::{ACCEPTED_FILE_TYPES, PREDICT_URL};
use crate::services::{alert, request_predictions, run_upload, take_file, UploadView};
use crate::ResultSet;

/// Signals the upload flow writes to.
#[derive(Clone, Copy)]
struct PageView {
    busy: WriteSignal<bool>,
    results: WriteSignal<Option<ResultSet>>,
}

impl UploadView for PageView {
    fn set_busy(&self, busy: bool) {
        self.busy.set(busy);
    }

    fn alert(&self, message: &str) {
        alert(message);
    }

    fn render(&self, results: ResultSet) {
        self.results.set(Some(results));
    }
}

#[component]
pub fn UploadSection(
    /// Receives the records of each successful upload
    set_results: WriteSignal<Option<ResultSet>>,
) -> impl IntoView {
    let (busy, set_busy) = create_signal(false);
    let file_input = create_node_ref::<html::Input>();

    let page = PageView {
        busy: set_busy,
        results: set_results,
    };

    let on_upload = move |_| {
        let selected = file_input
            .get_untracked()
            .and_then(|input| input.files())
            .and_then(|files| files.get(0));

        // Missing file is reported before anything is spawned.
        let Some(file) = take_file(&page, selected) else {
            return;
        };

        log::info!("📤 Uploading {} ({} bytes)", file.name(), file.size());

        spawn_local(async move {
            run_upload(&page, Some(file), |file| request_predictions(file, PREDICT_URL)).await;
        });
    };

    view! {
        <div class="upload-section">
            <input
                type="file"
                id="file-input"
                class="form-control"
                accept=ACCEPTED_FILE_TYPES
                node_ref=file_input
            />
            <button id="upload-btn" class="btn btn-primary" on:click=on_upload>
                "Upload & Predict"
            </button>
            <Spinner busy=busy/>
        </div>
    }
}

/// Busy indicator, visible while a prediction request is in flight.
#[component]
pub fn Spinner(busy: ReadSignal<bool>) -> impl IntoView {
    view! {
        <div
            id="spinner"
            role="status"
            class=move || if busy.get() { "spinner-border" } else { "spinner-border d-none" }
        >
            <span class="visually-hidden">"Predicting..."</span>
        </div>
    }
}
