//! Results table and export buttons.

use leptos::*;
use std::rc::Rc;

use crate::config::NO_RESULTS_MESSAGE;
use crate::services::{alert, export_results, ExportFormat};
use crate::table::TableView;
use crate::ResultSet;

#[component]
pub fn ResultsSection(
    /// Last received records, `None` until the first upload finishes
    results: ReadSignal<Option<ResultSet>>,
) -> impl IntoView {
    view! {
        <div id="results-area" class="results-area">
            {move || results.get().map(render_results)}
        </div>
    }
}

/// What the results area shows for one received set.
#[derive(Clone, Debug, PartialEq)]
pub enum ResultsView {
    /// Message instead of a table; no export buttons.
    Placeholder(&'static str),
    /// Table plus export buttons bound to `exports`.
    Table {
        table: TableView,
        exports: Rc<ResultSet>,
    },
}

impl ResultsView {
    pub fn from_results(results: ResultSet) -> Self {
        match TableView::from_results(&results) {
            None => ResultsView::Placeholder(NO_RESULTS_MESSAGE),
            Some(table) => ResultsView::Table {
                table,
                exports: Rc::new(results),
            },
        }
    }

    /// `true` when the download buttons are part of the page.
    pub fn has_exports(&self) -> bool {
        matches!(self, ResultsView::Table { .. })
    }
}

fn render_results(results: ResultSet) -> View {
    match ResultsView::from_results(results) {
        ResultsView::Placeholder(message) => {
            view! { <p class="text-muted">{message}</p> }.into_view()
        }
        ResultsView::Table { table, exports } => view! {
            <ResultsTable table=table/>
            <ExportButtons results=exports/>
        }
        .into_view(),
    }
}

#[component]
fn ResultsTable(table: TableView) -> impl IntoView {
    let TableView { headers, rows } = table;

    view! {
        <div class="table-responsive">
            <table class="table table-sm table-striped">
                <thead>
                    <tr>
                        {headers.into_iter().map(|h| view! { <th>{h}</th> }).collect_view()}
                    </tr>
                </thead>
                <tbody>
                    {rows
                        .into_iter()
                        .map(|row| {
                            view! {
                                <tr>
                                    {row.into_iter().map(|cell| view! { <td>{cell}</td> }).collect_view()}
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
        </div>
    }
}

/// Download buttons bound to the exact records they were rendered with.
#[component]
fn ExportButtons(results: Rc<ResultSet>) -> impl IntoView {
    let csv_results = Rc::clone(&results);
    let on_csv = move |_| export_or_alert(&csv_results, ExportFormat::Csv);
    let on_json = move |_| export_or_alert(&results, ExportFormat::Json);

    view! {
        <div class="export-buttons">
            <button id="download-csv" class="btn btn-outline-secondary" on:click=on_csv>
                {ExportFormat::Csv.label()}
            </button>
            <button id="download-json" class="btn btn-outline-secondary" on:click=on_json>
                {ExportFormat::Json.label()}
            </button>
        </div>
    }
}

fn export_or_alert(results: &ResultSet, format: ExportFormat) {
    if let Err(e) = export_results(results, format) {
        log::error!("❌ Export to {} failed: {}", format.file_name(), e);
        alert(&e.to_string());
    }
}
