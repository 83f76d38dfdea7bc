//! Plain-text rendering of a `ViewState`, used by the one-shot commands.

use crate::charts::{ChartData, bar_chart, line_chart};
use crate::dataset::MetadataEntry;
use crate::display::{format_columns, format_currency, format_number};
use crate::workflow::{MetadataState, ViewState};
use std::fmt::Write;

pub const TITLE: &str = "EV Analytics";
pub const ANALYTICS_HEADING: &str = "Electric Vehicle Analytics";
pub const BAR_CHART_TITLE: &str = "Electric Range by Make";
pub const LINE_CHART_TITLE: &str = "Base MSRP Over Model Year";
pub const METADATA_HEADING: &str = "Dataset Metadata";

const BAR_WIDTH: usize = 40;

/// One metadata listing line: `name: description (Type: dataType)`
pub fn metadata_line(entry: &MetadataEntry) -> String {
    format!(
        "{}: {} (Type: {})",
        entry.name, entry.description, entry.data_type
    )
}

/// Render the whole page.
///
/// Charts appear only when rows are loaded; the metadata section only when
/// metadata is non-empty.
pub fn render_report(state: &ViewState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{TITLE}");

    if let Some(task_id) = state.task_id() {
        let _ = writeln!(out, "Task ID: {task_id}");
    }
    if let Some(status) = state.status.as_deref().filter(|s| !s.is_empty()) {
        let _ = writeln!(out, "Status: {status}");
    }
    if let Some(error) = &state.last_error {
        let _ = writeln!(out, "Error: {error}");
    }

    if !state.rows.is_empty() {
        let _ = writeln!(out, "\n{ANALYTICS_HEADING}");
        let _ = writeln!(out, "\n{BAR_CHART_TITLE}");
        out.push_str(&render_bar_chart(&bar_chart(&state.rows)));
        let _ = writeln!(out, "\n{LINE_CHART_TITLE}");
        out.push_str(&render_line_chart(&line_chart(&state.rows)));
    }

    out.push_str(&render_metadata(&state.metadata));
    out
}

/// Render the metadata section, or nothing when there are no entries
pub fn render_metadata(metadata: &MetadataState) -> String {
    let mut out = String::new();
    match metadata {
        MetadataState::Loaded(entries) if !entries.is_empty() => {
            let _ = writeln!(out, "\n{METADATA_HEADING}");
            for entry in entries {
                let _ = writeln!(out, "- {}", metadata_line(entry));
            }
        }
        MetadataState::Unavailable(reason) => {
            let _ = writeln!(out, "\nMetadata unavailable: {reason}");
        }
        MetadataState::Loaded(_) | MetadataState::NotLoaded => {}
    }
    out
}

fn render_bar_chart(chart: &ChartData<String>) -> String {
    let Some(dataset) = chart.primary() else {
        return String::new();
    };
    let label_width = chart
        .labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0);
    let max = dataset.data.iter().cloned().fold(0.0_f64, f64::max);

    let mut out = format!("({})\n", dataset.label);
    for (label, value) in chart.labels.iter().zip(&dataset.data) {
        let filled = if max > 0.0 {
            ((value.max(0.0) / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let _ = writeln!(
            out,
            "{label:<label_width$}  {} {}",
            "\u{2588}".repeat(filled),
            format_number(*value)
        );
    }
    out
}

fn render_line_chart(chart: &ChartData<i32>) -> String {
    let Some(dataset) = chart.primary() else {
        return String::new();
    };
    let rows: Vec<Vec<String>> = chart
        .labels
        .iter()
        .zip(&dataset.data)
        .map(|(year, msrp)| vec![year.to_string(), format_currency(*msrp)])
        .collect();
    format_columns(&["Model Year", dataset.label], &rows)
}
