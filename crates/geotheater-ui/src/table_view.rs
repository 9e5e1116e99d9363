//! Recent-visits table for the Geotheater TUI.
//!
//! Renders a bordered [`ratatui::widgets::Table`] with one row per log entry,
//! newest first.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use geotheater_core::formatting::format_count;
use geotheater_core::models::{VisitorRecord, OUT_OF_AREA};

use crate::themes::Theme;

/// Column headers, left to right.
pub const HEADERS: [&str; 6] = [
    "Type",
    "Name / Institution",
    "Detail",
    "Party",
    "Subdistrict",
    "Time",
];

/// Cell texts for one visit, in [`HEADERS`] order.
pub fn visit_cells(record: &VisitorRecord) -> [String; 6] {
    [
        record.visit_kind.label().to_string(),
        record.display_name().to_string(),
        record.display_detail().to_string(),
        format_count(u64::from(record.party_size)),
        record
            .subdistrict
            .clone()
            .unwrap_or_else(|| OUT_OF_AREA.to_string()),
        record.timestamp.clone(),
    ]
}

/// Render the recent visits into `area`. `visits` is expected newest first.
pub fn render_recent_visits(
    frame: &mut Frame,
    area: Rect,
    visits: &[&VisitorRecord],
    theme: &Theme,
) {
    let header_cells = HEADERS
        .iter()
        .map(|h| Cell::from(*h).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = visits
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            let [kind, name, detail, party, subdistrict, time] = visit_cells(record);
            Row::new(vec![
                Cell::from(kind).style(theme.visit_kind_style(record.visit_kind)),
                Cell::from(name),
                Cell::from(detail).style(theme.dim),
                Cell::from(party),
                Cell::from(subdistrict),
                Cell::from(time).style(theme.dim),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(11),
        Constraint::Min(20),
        Constraint::Length(18),
        Constraint::Length(6),
        Constraint::Length(16),
        Constraint::Length(17),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" Recent visits ({}) ", visits.len())),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Render a "no data" placeholder when the log has no entries.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No visitor data found", theme.warning)),
        Line::from(""),
        Line::from(Span::styled("Press 'r' to reload", theme.dim)),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Recent visits "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
