use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Decorative sparkle string placed either side of the application title.
pub const SPARKLES: &str = "✦ ✧ ✦ ✧";

/// Width of the `=` separator under the title.
pub const SEPARATOR_WIDTH: usize = 78;

/// Dashboard header rendering four lines:
///
/// 1. Application title with sparkle decorations.
/// 2. A `=` separator.
/// 3. Source and refresh status in `[ source | status ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    /// Where the visitor log comes from (URL or file path).
    pub source: &'a str,
    /// Short status text, e.g. `"updated 08:30:12"` or `"loading…"`.
    pub status: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(source: &'a str, status: &'a str, theme: &'a Theme) -> Self {
        Self {
            source,
            status,
            theme,
        }
    }

    /// Render the header as exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        vec![
            Line::from(vec![
                Span::styled(SPARKLES, self.theme.header_sparkle),
                Span::styled(" GEOTHEATER VISITOR DASHBOARD ", self.theme.header),
                Span::styled(SPARKLES, self.theme.header_sparkle),
            ]),
            Line::from(Span::styled(
                "=".repeat(SEPARATOR_WIDTH),
                self.theme.separator,
            )),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.source, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.status, self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::themes::Theme;

    fn text_of(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_header_to_lines_count() {
        let theme = Theme::dark();
        let lines = Header::new("buku_tamu.csv", "updated 08:30:00", &theme).to_lines();
        assert_eq!(lines.len(), 4, "header must produce exactly 4 lines");
    }

    #[test]
    fn test_header_title_line_content() {
        let theme = Theme::dark();
        let lines = Header::new("x", "y", &theme).to_lines();
        let title = text_of(&lines[0]);
        assert!(title.contains("GEOTHEATER VISITOR DASHBOARD"), "got: {title}");
        assert!(title.contains(SPARKLES), "got: {title}");
    }

    #[test]
    fn test_header_separator_line() {
        let theme = Theme::dark();
        let lines = Header::new("x", "y", &theme).to_lines();
        let sep = text_of(&lines[1]);
        assert_eq!(sep.chars().count(), SEPARATOR_WIDTH);
        assert!(sep.chars().all(|c| c == '='));
    }

    #[test]
    fn test_header_info_line_format() {
        let theme = Theme::dark();
        let lines = Header::new("https://example.test/log.csv", "loading…", &theme).to_lines();
        assert_eq!(lines[2].spans.len(), 5);
        assert_eq!(text_of(&lines[2]), "[ https://example.test/log.csv | loading… ]");
    }

    #[test]
    fn test_header_empty_fourth_line() {
        let theme = Theme::dark();
        let lines = Header::new("x", "y", &theme).to_lines();
        assert!(text_of(&lines[3]).is_empty());
    }
}
