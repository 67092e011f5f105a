//! Layout detection
//!
//! A "vertical" sheet spreads a single requirement over rows (label in the
//! first column, English and Arabic values beside it). A "horizontal" sheet
//! has a header row and one requirement per following row.

use std::fmt;

use crate::lang::contains_arabic;
use crate::sheet::{cell, Grid};

/// Number of leading rows inspected
pub const DETECTION_ROWS: usize = 5;

/// First-column values that mark a vertical sheet (exact match, lower-case)
pub const VERTICAL_KEYWORDS: &[&str] = &[
    "title",
    "user story",
    "us",
    "description",
    "classification",
];

/// How requirements are laid out in a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One field per row, language values in adjacent columns
    Vertical,
    /// Header row, then one requirement per row
    Horizontal,
}

impl Layout {
    pub fn is_vertical(&self) -> bool {
        matches!(self, Layout::Vertical)
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Vertical => write!(f, "vertical"),
            Layout::Horizontal => write!(f, "horizontal"),
        }
    }
}

/// Classify a grid by its first column over the first few rows.
///
/// This is a heuristic: a horizontal sheet whose first header happens to be
/// "Title" is read as vertical.
pub fn detect_layout(grid: &Grid) -> Layout {
    let vertical = grid.iter().take(DETECTION_ROWS).any(|row| {
        let first = cell(row, 0).trim().to_lowercase();
        VERTICAL_KEYWORDS.contains(&first.as_str()) || contains_arabic(&first)
    });

    if vertical {
        Layout::Vertical
    } else {
        Layout::Horizontal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Grid {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_keyword_rows_are_vertical() {
        for keyword in ["Title", "USER STORY", "us", "Description", "classification"] {
            let g = grid(&[&["ID", "1"], &[keyword, "x", "y"]]);
            assert_eq!(detect_layout(&g), Layout::Vertical, "keyword {}", keyword);
        }
    }

    #[test]
    fn test_arabic_first_column_is_vertical() {
        let g = grid(&[&["Ref", "x"], &["عنوان", "Hello", "مرحبا"]]);
        assert_eq!(detect_layout(&g), Layout::Vertical);
    }

    #[test]
    fn test_header_row_is_horizontal() {
        let g = grid(&[&["ID", "Title", "Description"], &["1", "Fix bug", "Broken"]]);
        assert_eq!(detect_layout(&g), Layout::Horizontal);
    }

    #[test]
    fn test_keyword_match_is_exact() {
        // "Title EN" is not an exact keyword and has no Arabic
        let g = grid(&[&["Title EN", "Title AR"], &["Hello", "Bonjour"]]);
        assert_eq!(detect_layout(&g), Layout::Horizontal);
    }

    #[test]
    fn test_only_first_five_rows_count() {
        let g = grid(&[&["a"], &["b"], &["c"], &["d"], &["e"], &["title"]]);
        assert_eq!(detect_layout(&g), Layout::Horizontal);

        let g = grid(&[&["a"], &["b"], &["c"], &["d"], &["title"]]);
        assert_eq!(detect_layout(&g), Layout::Vertical);
    }

    #[test]
    fn test_empty_grid_is_horizontal() {
        assert_eq!(detect_layout(&Grid::new()), Layout::Horizontal);
        assert!(!Layout::Horizontal.is_vertical());
    }
}
