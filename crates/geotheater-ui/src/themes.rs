use geotheater_core::models::{AgeBucket, TrendingStatus, VisitKind};
use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`.  Background values
/// 0–6 are considered dark; 7–15 are considered light.  If the variable is
/// absent or unparseable, `BackgroundType::Dark` is returned.
pub fn detect_background() -> BackgroundType {
    if let Ok(val) = std::env::var("COLORFGBG") {
        if let Some(bg) = val.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                return if bg_num <= 6 {
                    BackgroundType::Dark
                } else {
                    BackgroundType::Light
                };
            }
        }
    }
    BackgroundType::Dark
}

/// Complete theme definition carrying all styles used by the dashboard
/// components.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_sparkle: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub bold: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,

    // ── Share bars ───────────────────────────────────────────────────────────
    pub bar_fill: Style,
    pub bar_empty: Style,
    pub bar_label: Style,

    // ── Demographics ─────────────────────────────────────────────────────────
    pub age_child: Style,
    pub age_teen: Style,
    pub age_adult: Style,
    pub age_senior: Style,
    pub male: Style,
    pub female: Style,
    pub visit_individual: Style,
    pub visit_group: Style,

    // ── Insight trend ────────────────────────────────────────────────────────
    pub trend_up: Style,
    pub trend_down: Style,
    pub trend_stable: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_border: Style,
    pub table_row: Style,
    pub table_row_alt: Style,

    pub sparkline: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_sparkle: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            bar_fill: Style::default().fg(Color::LightBlue),
            bar_empty: Style::default().fg(Color::DarkGray),
            bar_label: Style::default().fg(Color::Gray),

            age_child: Style::default().fg(Color::Green),
            age_teen: Style::default().fg(Color::Magenta),
            age_adult: Style::default().fg(Color::Blue),
            age_senior: Style::default().fg(Color::Cyan),
            male: Style::default().fg(Color::Blue),
            female: Style::default().fg(Color::LightMagenta),
            visit_individual: Style::default().fg(Color::LightBlue),
            visit_group: Style::default().fg(Color::Yellow),

            trend_up: Style::default().fg(Color::Green),
            trend_down: Style::default().fg(Color::Red),
            trend_stable: Style::default().fg(Color::Yellow),

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),

            sparkline: Style::default().fg(Color::Cyan),
        }
    }

    /// Light-background terminal theme.
    ///
    /// Uses dark colours for text and saturated accents so that content
    /// remains legible against a white/light-grey terminal canvas.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_sparkle: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            bold: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Blue),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            bar_fill: Style::default().fg(Color::Blue),
            bar_empty: Style::default().fg(Color::Gray),
            bar_label: Style::default().fg(Color::DarkGray),

            age_child: Style::default().fg(Color::Green),
            age_teen: Style::default().fg(Color::Magenta),
            age_adult: Style::default().fg(Color::Blue),
            age_senior: Style::default().fg(Color::DarkGray),
            male: Style::default().fg(Color::Blue),
            female: Style::default().fg(Color::Magenta),
            visit_individual: Style::default().fg(Color::Blue),
            visit_group: Style::default().fg(Color::Red),

            trend_up: Style::default().fg(Color::Green),
            trend_down: Style::default().fg(Color::Red),
            trend_stable: Style::default().fg(Color::Magenta),

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::Gray),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),

            sparkline: Style::default().fg(Color::Blue),
        }
    }

    /// Classic terminal theme using only the basic 8-colour ANSI palette.
    ///
    /// Avoids bold modifiers to maximise compatibility with minimal terminal
    /// emulators.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            header_sparkle: Style::default().fg(Color::White),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default().fg(Color::White),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            bar_fill: Style::default().fg(Color::Blue),
            bar_empty: Style::default().fg(Color::DarkGray),
            bar_label: Style::default().fg(Color::White),

            age_child: Style::default().fg(Color::Green),
            age_teen: Style::default().fg(Color::Magenta),
            age_adult: Style::default().fg(Color::Blue),
            age_senior: Style::default().fg(Color::Cyan),
            male: Style::default().fg(Color::Blue),
            female: Style::default().fg(Color::Magenta),
            visit_individual: Style::default().fg(Color::Blue),
            visit_group: Style::default().fg(Color::Yellow),

            trend_up: Style::default().fg(Color::Green),
            trend_down: Style::default().fg(Color::Red),
            trend_stable: Style::default().fg(Color::Yellow),

            table_header: Style::default().fg(Color::Cyan),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),

            sparkline: Style::default().fg(Color::Cyan),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name.  Falls back to `auto_detect` for unknown
    /// names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Chart colour for an age bucket.
    pub fn age_style(&self, bucket: AgeBucket) -> Style {
        match bucket {
            AgeBucket::Child => self.age_child,
            AgeBucket::Teen => self.age_teen,
            AgeBucket::Adult => self.age_adult,
            AgeBucket::Senior => self.age_senior,
        }
    }

    /// Badge colour for a visit kind.
    pub fn visit_kind_style(&self, kind: VisitKind) -> Style {
        match kind {
            VisitKind::Individual => self.visit_individual,
            VisitKind::Group => self.visit_group,
        }
    }

    /// Colour for the insight trend badge.
    pub fn trend_style(&self, status: TrendingStatus) -> Style {
        match status {
            TrendingStatus::Up => self.trend_up,
            TrendingStatus::Down => self.trend_down,
            TrendingStatus::Stable => self.trend_stable,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
