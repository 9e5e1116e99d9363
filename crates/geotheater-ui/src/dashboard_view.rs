//! Main dashboard screen.
//!
//! Combines the header, stat cards, distribution bars, the insight panel, the
//! party-size trend and the recent-visits table into one frame.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Sparkline, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use geotheater_core::formatting::format_count;
use geotheater_core::models::{InsightReport, VisitKind};
use geotheater_runtime::session::DashboardSnapshot;

use crate::components::header::Header;
use crate::components::indicators::{StatCard, TrendIndicator};
use crate::components::progress_bar::{ShareBar, SplitBar};
use crate::table_view;
use crate::themes::Theme;

/// Entries shown in the top-N lists.
pub const TOP_N: usize = 5;
/// Rows in the recent-visits table and points in the trend.
pub const RECENT_LEN: usize = 10;

const NAME_WIDTH: usize = 20;
const BAR_WIDTH: u16 = 20;

/// Progress of the narrative insight panel.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InsightState {
    /// Nothing requested yet (no data loaded).
    #[default]
    Pending,
    Loading,
    Ready(InsightReport),
}

/// Everything the dashboard needs for one frame.
pub struct DashboardViewData<'a> {
    /// Description of the log source for the header.
    pub source: &'a str,
    /// Short status text, e.g. `"updated 08:30:12"`.
    pub status: &'a str,
    pub snapshot: &'a DashboardSnapshot,
    pub insight: &'a InsightState,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Pad or truncate `text` to exactly `width` display columns.
fn fit_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        let pad = width - text.width();
        return format!("{}{}", text, " ".repeat(pad));
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width.saturating_sub(1) {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

fn section_title<'a>(title: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(title, theme.bold))
}

// ── Line builders ─────────────────────────────────────────────────────────────

/// Build the statistics column: warning, stat cards and distributions.
pub fn build_stats_lines<'a>(snapshot: &DashboardSnapshot, theme: &'a Theme) -> Vec<Line<'a>> {
    let stats = &snapshot.stats;
    let mut lines: Vec<Line<'a>> = Vec::with_capacity(40);

    if let Some(ref warning) = snapshot.warning {
        let mut spans = vec![
            Span::styled("⚠ ", theme.warning),
            Span::styled(warning.clone(), theme.warning),
        ];
        if let Some(ref cause) = snapshot.fetch_error {
            spans.push(Span::styled(format!(" ({cause})"), theme.dim));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    // ── Stat cards ────────────────────────────────────────────────────────────
    lines.push(StatCard::new("👥", "Total visitors", stats.total, theme.value, theme).to_line());
    lines.push(StatCard::new("👨", "Total male", stats.total_male, theme.male, theme).to_line());
    lines.push(
        StatCard::new("👩", "Total female", stats.total_female, theme.female, theme).to_line(),
    );
    lines.push(
        StatCard::new("🚌", "Total groups", stats.group_visits, theme.visit_group, theme)
            .to_line(),
    );
    lines.push(Line::from(""));

    // ── Visit type ────────────────────────────────────────────────────────────
    lines.push(section_title("Visit type", theme));
    lines.push(
        SplitBar::new(
            vec![
                (
                    VisitKind::Individual.label().to_string(),
                    stats.individual_visits,
                    theme.visit_individual,
                ),
                (
                    VisitKind::Group.label().to_string(),
                    stats.group_visits,
                    theme.visit_group,
                ),
            ],
            theme,
        )
        .to_line(),
    );
    lines.push(Line::from(""));

    // ── Age distribution ──────────────────────────────────────────────────────
    lines.push(section_title("Age distribution", theme));
    for (bucket, count) in stats.age_distribution() {
        let bar = ShareBar::new(count, stats.total, theme)
            .with_style(theme.age_style(bucket))
            .with_width(BAR_WIDTH)
            .to_line();
        let mut spans = vec![Span::styled(fit_width(bucket.label(), 8), theme.label)];
        spans.extend(bar.spans);
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));

    // ── Top occupations ───────────────────────────────────────────────────────
    lines.push(section_title("Top occupations", theme));
    let occupations = stats.top_occupations(TOP_N);
    if occupations.is_empty() {
        lines.push(Line::from(Span::styled("  No data", theme.dim)));
    }
    for (name, count) in occupations {
        let bar = ShareBar::new(count, stats.total, theme)
            .with_width(BAR_WIDTH)
            .to_line();
        let mut spans = vec![Span::styled(fit_width(&name, NAME_WIDTH), theme.text)];
        spans.extend(bar.spans);
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));

    // ── Top subdistricts ──────────────────────────────────────────────────────
    lines.push(section_title("Top subdistricts", theme));
    let subdistricts = stats.top_subdistricts(TOP_N);
    if subdistricts.is_empty() {
        lines.push(Line::from(Span::styled("  No data", theme.dim)));
    }
    for (rank, (name, count)) in subdistricts.into_iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("{:>2}. ", rank + 1), theme.dim),
            Span::styled(fit_width(&name, NAME_WIDTH), theme.text),
            Span::styled(format!("{:>7}", format_count(count)), theme.value),
            Span::styled(" visitors", theme.dim),
        ]));
    }

    lines
}

/// Build the insight panel body.
pub fn build_insight_lines<'a>(insight: &InsightState, theme: &'a Theme) -> Vec<Line<'a>> {
    match insight {
        InsightState::Pending => vec![Line::from(Span::styled(
            "Waiting for visitor data…",
            theme.dim,
        ))],
        InsightState::Loading => vec![Line::from(Span::styled(
            "Analyzing visitor data…",
            theme.info,
        ))],
        InsightState::Ready(report) => {
            let mut lines = vec![
                TrendIndicator::new(report.trending_status, theme).to_line(),
                Line::from(""),
                Line::from(Span::styled(report.summary.clone(), theme.text)),
            ];
            if !report.recommendations.is_empty() {
                lines.push(Line::from(""));
                lines.push(section_title("Recommendations", theme));
                for rec in &report.recommendations {
                    lines.push(Line::from(vec![
                        Span::styled("• ", theme.info),
                        Span::styled(rec.clone(), theme.text),
                    ]));
                }
            }
            lines
        }
    }
}

// ── Render ────────────────────────────────────────────────────────────────────

/// Render the full dashboard into `area`.
pub fn render_dashboard_view(
    frame: &mut Frame,
    area: Rect,
    data: &DashboardViewData,
    theme: &Theme,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(12),
            Constraint::Length(RECENT_LEN as u16 + 3),
        ])
        .split(area);

    let header = Header::new(data.source, data.status, theme).to_lines();
    frame.render_widget(Paragraph::new(Text::from(header)), rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);

    let stats = Paragraph::new(Text::from(build_stats_lines(data.snapshot, theme)));
    frame.render_widget(stats, columns[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(6)])
        .split(columns[1]);

    let insight = Paragraph::new(Text::from(build_insight_lines(data.insight, theme)))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(" Smart insights "),
        );
    frame.render_widget(insight, side[0]);

    let party_sizes = data.snapshot.recent_party_sizes(RECENT_LEN);
    let trend = Sparkline::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(" Party size, last visits "),
        )
        .data(&party_sizes)
        .style(theme.sparkline);
    frame.render_widget(trend, side[1]);

    let recent = data.snapshot.recent_visits(RECENT_LEN);
    if recent.is_empty() {
        table_view::render_no_data(frame, rows[2], theme);
    } else {
        table_view::render_recent_visits(frame, rows[2], &recent, theme);
    }
}

/// Render the placeholder shown before the first snapshot arrives.
pub fn render_loading(frame: &mut Frame, area: Rect, source: &str, theme: &Theme) {
    let mut lines = Header::new(source, "loading…", theme).to_lines();
    lines.push(Line::from(Span::styled("Synchronizing visitor log…", theme.info)));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press 'q' or Ctrl+C to exit",
        theme.dim,
    )));
    frame.render_widget(Paragraph::new(Text::from(lines)), area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
