use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset as PlotDataset, GraphType,
        List, ListItem, Paragraph,
    },
};

use crate::charts::{ChartData, Rgba, bar_chart, line_chart};
use crate::dataset::MetadataEntry;
use crate::display::{format_currency, format_number};
use crate::render::{
    ANALYTICS_HEADING, BAR_CHART_TITLE, LINE_CHART_TITLE, METADATA_HEADING, TITLE,
};
use crate::task::TaskStatus;
use crate::workflow::MetadataState;

use super::app::DashboardApp;

const MAX_METADATA_HEIGHT: u16 = 12;

/// Render the dashboard to the terminal frame.
///
/// Header with task id and status, the two charts once rows are loaded, the
/// metadata list once it has entries, then activity and key hints.
pub fn render(app: &mut DashboardApp, frame: &mut Frame) {
    let area = frame.area();

    let outer = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(0),
        Constraint::Length(metadata_height(&app.state.metadata)),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_header(app, frame, outer[0]);
    render_charts(app, frame, outer[1]);
    render_metadata(app, frame, outer[2]);
    render_activity(app, frame, outer[3]);
    render_footer(frame, outer[4]);
}

/// Rows for the metadata pane: the bordered list capped at
/// `MAX_METADATA_HEIGHT`, one line for the unavailable note, else nothing
fn metadata_height(metadata: &MetadataState) -> u16 {
    match metadata {
        MetadataState::Loaded(entries) if !entries.is_empty() => u16::try_from(entries.len())
            .unwrap_or(u16::MAX)
            .saturating_add(2)
            .min(MAX_METADATA_HEIGHT),
        MetadataState::Unavailable(_) => 1,
        MetadataState::Loaded(_) | MetadataState::NotLoaded => 0,
    }
}

fn to_color(rgba: Rgba) -> Color {
    let (r, g, b) = rgba.on_black();
    Color::Rgb(r, g, b)
}

fn status_color(status: &str) -> Color {
    match TaskStatus::parse(status) {
        TaskStatus::Completed => Color::Green,
        TaskStatus::Failed => Color::Red,
        TaskStatus::Running => Color::Yellow,
        TaskStatus::Pending => Color::Blue,
        TaskStatus::Other(_) => Color::Gray,
    }
}

/// Title line plus the current task and its status
fn render_header(app: &DashboardApp, frame: &mut Frame, area: Rect) {
    let mut title = vec![
        Span::styled(TITLE, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" \u{2502} "),
        Span::styled(app.backend.clone(), Style::default().fg(Color::DarkGray)),
    ];
    if let Some(action) = app.busy {
        title.push(Span::raw(" \u{2502} "));
        title.push(Span::styled(
            action.busy_label(),
            Style::default().fg(Color::Yellow),
        ));
    }

    let mut task = Vec::new();
    if let Some(task_id) = app.state.task_id() {
        task.push(Span::raw(format!("Task ID: {task_id}")));
    }
    if let Some(status) = app.state.status.as_deref().filter(|s| !s.is_empty()) {
        if !task.is_empty() {
            task.push(Span::raw("  "));
        }
        task.push(Span::raw("Status: "));
        task.push(Span::styled(
            status.to_string(),
            Style::default().fg(status_color(status)),
        ));
    }

    let lines = vec![Line::from(title), Line::from(task)];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_charts(app: &DashboardApp, frame: &mut Frame, area: Rect) {
    if app.state.rows.is_empty() {
        let hint = Paragraph::new(Line::from(Span::styled(
            " No data yet. Press c to create a task, then s to check its status.",
            Style::default().fg(Color::DarkGray),
        )));
        frame.render_widget(hint, area);
        return;
    }

    let block = Block::default()
        .title(format!(" {ANALYTICS_HEADING} "))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let panels =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(inner);

    render_bar_chart(&bar_chart(&app.state.rows), frame, panels[0]);
    render_line_chart(&line_chart(&app.state.rows), frame, panels[1]);
}

fn render_bar_chart(chart: &ChartData<String>, frame: &mut Frame, area: Rect) {
    let Some(dataset) = chart.primary() else {
        return;
    };
    let color = dataset
        .background_color
        .map(to_color)
        .unwrap_or(Color::Cyan);

    let bars: Vec<Bar> = chart
        .labels
        .iter()
        .zip(&dataset.data)
        .map(|(label, value)| {
            Bar::default()
                .value(value.max(0.0).round() as u64)
                .label(Line::from(label.clone()))
                .text_value(format_number(*value))
        })
        .collect();

    let widget = BarChart::default()
        .block(
            Block::default()
                .title(format!(" {BAR_CHART_TITLE} "))
                .borders(Borders::ALL),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(7)
        .bar_gap(1)
        .bar_style(Style::default().fg(color))
        .value_style(Style::default().fg(Color::Black).bg(color));

    frame.render_widget(widget, area);
}

fn render_line_chart(chart: &ChartData<i32>, frame: &mut Frame, area: Rect) {
    let Some(dataset) = chart.primary() else {
        return;
    };
    let color = dataset.border_color.map(to_color).unwrap_or(Color::Red);

    // x is the row index so the server's order is kept; the axis shows model years
    let points: Vec<(f64, f64)> = dataset
        .data
        .iter()
        .enumerate()
        .map(|(i, value)| (i as f64, *value))
        .collect();

    let max_x = (points.len().saturating_sub(1)).max(1) as f64;
    let min_y = dataset.data.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_y = dataset.data.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let (min_y, max_y) = if min_y < max_y {
        (min_y, max_y)
    } else {
        (min_y - 1.0, max_y + 1.0)
    };

    let x_labels = axis_labels(&chart.labels);
    let y_labels = vec![
        format_currency(min_y),
        format_currency((min_y + max_y) / 2.0),
        format_currency(max_y),
    ];

    let plot = vec![
        PlotDataset::default()
            .name(dataset.label)
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(color))
            .data(&points),
    ];

    let widget = Chart::new(plot)
        .block(
            Block::default()
                .title(format!(" {LINE_CHART_TITLE} "))
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title("Model Year")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, max_x])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(dataset.label)
                .style(Style::default().fg(Color::Gray))
                .bounds([min_y, max_y])
                .labels(y_labels),
        );

    frame.render_widget(widget, area);
}

/// First, middle and last label of a category axis
fn axis_labels(labels: &[i32]) -> Vec<String> {
    match labels.len() {
        0 => Vec::new(),
        1 | 2 => labels.iter().map(|l| l.to_string()).collect(),
        n => vec![
            labels[0].to_string(),
            labels[n / 2].to_string(),
            labels[n - 1].to_string(),
        ],
    }
}

/// One list item per metadata entry
pub fn metadata_items(entries: &[MetadataEntry]) -> Vec<ListItem<'_>> {
    entries
        .iter()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    entry.name.as_str(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(
                    ": {} (Type: {})",
                    entry.description, entry.data_type
                )),
            ]))
        })
        .collect()
}

fn render_metadata(app: &mut DashboardApp, frame: &mut Frame, area: Rect) {
    if area.height == 0 {
        return;
    }

    match &app.state.metadata {
        MetadataState::Loaded(entries) => {
            let list = List::new(metadata_items(entries))
                .block(
                    Block::default()
                        .title(format!(" {METADATA_HEADING} "))
                        .borders(Borders::ALL),
                )
                .highlight_style(Style::default().bg(Color::DarkGray));
            frame.render_stateful_widget(list, area, &mut app.metadata_list_state);
        }
        MetadataState::Unavailable(reason) => {
            let note = Paragraph::new(Line::from(Span::styled(
                format!(" Metadata unavailable: {reason}"),
                Style::default().fg(Color::DarkGray),
            )));
            frame.render_widget(note, area);
        }
        MetadataState::NotLoaded => {}
    }
}

/// Latest error or activity message
fn render_activity(app: &DashboardApp, frame: &mut Frame, area: Rect) {
    let line = if let Some(error) = &app.state.last_error {
        Line::from(Span::styled(
            format!(" Error: {error}"),
            Style::default().fg(Color::Red),
        ))
    } else if let Some((at, message)) = app.activity.last() {
        Line::from(vec![
            Span::styled(
                format!(" {} ", at.format("%H:%M:%S")),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw(message.clone()),
        ])
    } else {
        Line::default()
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(
        " c create task \u{2502} s check status \u{2502} r reload metadata \u{2502} \u{2191}\u{2193} metadata \u{2502} q quit",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(line), area);
}
