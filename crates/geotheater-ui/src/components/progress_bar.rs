use crate::themes::Theme;
use geotheater_core::formatting::{format_count, percentage};
use ratatui::style::Style;
use ratatui::text::{Line, Span};

/// Configuration controlling visual appearance of a bar.
pub struct ProgressBarConfig {
    /// Total width in terminal columns of the bar portion (excluding label).
    pub width: u16,
    /// Character used to fill the completed portion of the bar.
    pub filled_char: char,
    /// Character used to fill the empty portion of the bar.
    pub empty_char: char,
}

impl Default for ProgressBarConfig {
    fn default() -> Self {
        Self {
            width: 30,
            filled_char: '\u{2588}', // █  FULL BLOCK
            empty_char: '\u{2591}',  // ░  LIGHT SHADE
        }
    }
}

// ── ShareBar ─────────────────────────────────────────────────────────────────

/// Horizontal bar showing one category's share of all visitors.
///
/// Renders as a fill + empty portion followed by the count and percentage.
pub struct ShareBar<'a> {
    /// Visitors in this category.
    pub count: u64,
    /// All visitors.
    pub total: u64,
    /// Share of `total`, clamped to `[0.0, 100.0]`.
    pub percentage: f64,
    /// Style of the filled portion.
    pub fill_style: Style,
    pub theme: &'a Theme,
    pub config: ProgressBarConfig,
}

impl<'a> ShareBar<'a> {
    /// Construct a new bar using the theme's default fill style.
    pub fn new(count: u64, total: u64, theme: &'a Theme) -> Self {
        Self {
            count,
            total,
            percentage: percentage(count, total, 1).min(100.0),
            fill_style: theme.bar_fill,
            theme,
            config: ProgressBarConfig::default(),
        }
    }

    /// Override the fill style (e.g. an age-bucket colour).
    pub fn with_style(mut self, style: Style) -> Self {
        self.fill_style = style;
        self
    }

    pub fn with_width(mut self, width: u16) -> Self {
        self.config.width = width;
        self
    }

    /// Render the bar as a [`Line`]: fill, empty, then label.
    pub fn to_line(&self) -> Line<'a> {
        let filled = ((self.percentage / 100.0) * self.config.width as f64).round() as u16;
        let filled = filled.min(self.config.width);
        let empty = self.config.width.saturating_sub(filled);

        let filled_str: String =
            std::iter::repeat_n(self.config.filled_char, filled as usize).collect();
        let empty_str: String =
            std::iter::repeat_n(self.config.empty_char, empty as usize).collect();

        let label = format!(" {:>6} {:>5.1}%", format_count(self.count), self.percentage);

        Line::from(vec![
            Span::styled(filled_str, self.fill_style),
            Span::styled(empty_str, self.theme.bar_empty),
            Span::styled(label, self.theme.bar_label),
        ])
    }
}

// ── SplitBar ─────────────────────────────────────────────────────────────────

/// A proportional multi-coloured bar, e.g. individual vs group visits.
///
/// Each segment's width is proportional to its share of the summed counts.
/// Labels with the raw counts follow the bar.
pub struct SplitBar<'a> {
    /// Ordered `(label, count, style)` triples.
    pub segments: Vec<(String, u64, Style)>,
    pub theme: &'a Theme,
    /// Total width of the bar in terminal columns.
    pub width: u16,
}

impl<'a> SplitBar<'a> {
    pub fn new(segments: Vec<(String, u64, Style)>, theme: &'a Theme) -> Self {
        Self {
            segments,
            theme,
            width: 30,
        }
    }

    /// Render the bar as a [`Line`].
    pub fn to_line(&self) -> Line<'a> {
        let total: u64 = self.segments.iter().map(|(_, c, _)| *c).sum();
        let width = self.width as usize;
        let mut spans: Vec<Span<'a>> = Vec::new();

        if total == 0 {
            spans.push(Span::styled("░".repeat(width), self.theme.bar_empty));
        } else {
            let active: Vec<&(String, u64, Style)> =
                self.segments.iter().filter(|(_, c, _)| *c > 0).collect();
            let mut used = 0usize;
            for (i, (_, count, style)) in active.iter().enumerate() {
                // Last segment takes the remainder so the bar is exactly `width`.
                let chars = if i == active.len() - 1 {
                    width.saturating_sub(used)
                } else {
                    ((*count as f64 / total as f64) * width as f64).floor() as usize
                };
                if chars > 0 {
                    spans.push(Span::styled("█".repeat(chars), *style));
                    used += chars;
                }
            }
        }

        spans.push(Span::raw(" "));

        for (i, (label, count, style)) in self.segments.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", self.theme.dim));
            }
            spans.push(Span::styled(
                format!("{} {}", label, format_count(*count)),
                *style,
            ));
        }

        Line::from(spans)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
