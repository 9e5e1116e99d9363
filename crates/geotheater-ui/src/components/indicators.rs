use crate::themes::Theme;
use geotheater_core::formatting::format_count;
use geotheater_core::models::TrendingStatus;
use ratatui::style::Style;
use ratatui::text::{Line, Span};

// ── TrendIndicator ───────────────────────────────────────────────────────────

/// Displays the insight trend with an arrow and colour.
///
/// | Status | Arrow |
/// |--------|-------|
/// | up     | ↗     |
/// | down   | ↘     |
/// | stable | →     |
pub struct TrendIndicator<'a> {
    pub status: TrendingStatus,
    pub theme: &'a Theme,
}

impl<'a> TrendIndicator<'a> {
    pub fn new(status: TrendingStatus, theme: &'a Theme) -> Self {
        Self { status, theme }
    }

    pub fn arrow(&self) -> &'static str {
        match self.status {
            TrendingStatus::Up => "↗",
            TrendingStatus::Down => "↘",
            TrendingStatus::Stable => "→",
        }
    }

    /// Render the indicator as a [`Line`].
    ///
    /// Format: `"Status: STABLE →"`
    pub fn to_line(&self) -> Line<'a> {
        let style = self.theme.trend_style(self.status);
        Line::from(vec![
            Span::styled("Status: ", self.theme.label),
            Span::styled(self.status.as_str().to_uppercase(), style),
            Span::raw(" "),
            Span::styled(self.arrow(), style),
        ])
    }
}

// ── StatCard ─────────────────────────────────────────────────────────────────

/// A headline count such as total visitors, rendered as one line.
pub struct StatCard<'a> {
    pub icon: &'static str,
    pub title: &'a str,
    pub value: u64,
    /// Style of the value.
    pub accent: Style,
    pub theme: &'a Theme,
}

impl<'a> StatCard<'a> {
    pub fn new(
        icon: &'static str,
        title: &'a str,
        value: u64,
        accent: Style,
        theme: &'a Theme,
    ) -> Self {
        Self {
            icon,
            title,
            value,
            accent,
            theme,
        }
    }

    /// Render as `"<icon> <title>: <value>"`, the title padded to a fixed width
    /// so cards stacked vertically line up.
    pub fn to_line(&self) -> Line<'a> {
        Line::from(vec![
            Span::raw(self.icon),
            Span::raw(" "),
            Span::styled(format!("{:<18}", format!("{}:", self.title)), self.theme.label),
            Span::styled(format_count(self.value), self.accent),
        ])
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
