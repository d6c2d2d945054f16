//! Column formatting shared by every report.

use unicode_width::UnicodeWidthStr;

/// Placeholder rendered for null columns.
pub const NULL_PLACEHOLDER: &str = "-";

/// Cuts `s` to `width` characters. When something was cut and `width > 4`,
/// the last three kept characters become `...`.
pub fn abbreviate(s: &str, width: usize) -> String {
    let total = s.chars().count();
    if total <= width {
        return s.to_string();
    }
    if width > 4 {
        let mut cut: String = s.chars().take(width - 3).collect();
        cut.push_str("...");
        cut
    } else {
        s.chars().take(width).collect()
    }
}

pub fn nullable(s: Option<&str>) -> &str {
    s.unwrap_or(NULL_PLACEHOLDER)
}

/// `M:SS` below one hour, `H:MM:SS` from one hour up.
pub fn format_duration(secs: i64) -> String {
    let secs = secs.max(0);
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

pub fn format_optional_duration(secs: Option<i64>) -> String {
    secs.map(format_duration)
        .unwrap_or_else(|| NULL_PLACEHOLDER.to_string())
}

/// First four characters of an ISO date, or the placeholder.
pub fn year_of(date: Option<&str>) -> String {
    match date {
        Some(d) => abbreviate(d, 4),
        None => NULL_PLACEHOLDER.to_string(),
    }
}

/// Left-aligns `s` to `width` display columns.
pub fn pad_right(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(UnicodeWidthStr::width(s));
    format!("{}{}", s, " ".repeat(fill))
}

/// Right-aligns `s` to `width` display columns.
pub fn pad_left(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(UnicodeWidthStr::width(s));
    format!("{}{}", " ".repeat(fill), s)
}

/// Abbreviates then left-aligns, so a cell is always exactly `width` wide
/// for single-width text.
pub fn cell(s: &str, width: usize) -> String {
    pad_right(&abbreviate(s, width), width)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeGlyph {
    First,
    Middle,
    Last,
}

impl TreeGlyph {
    /// Glyph for the track at `index` (0-based) in a group of `total`.
    /// The last position wins, so a single track closes its group.
    pub fn for_position(index: usize, total: usize) -> Self {
        if index + 1 >= total {
            TreeGlyph::Last
        } else if index == 0 {
            TreeGlyph::First
        } else {
            TreeGlyph::Middle
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TreeGlyph::First => "┌─",
            TreeGlyph::Middle => "├─",
            TreeGlyph::Last => "└─",
        }
    }
}
