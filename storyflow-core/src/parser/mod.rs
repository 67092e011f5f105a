//! Sheet normalization
//!
//! Detects the sheet layout and maps raw cells into draft rows.

mod horizontal;
mod layout;
mod routing;
mod vertical;

pub use horizontal::normalize_horizontal;
pub use layout::{detect_layout, Layout, DETECTION_ROWS, VERTICAL_KEYWORDS};
pub use routing::{
    has_arabic_marker, horizontal_language, route_horizontal, route_vertical, CoreField,
    FieldTarget,
};
pub use vertical::normalize_vertical;

use crate::models::DraftRow;
use crate::sheet::Grid;

/// Draft rows extracted from one sheet
#[derive(Debug, Clone)]
pub struct ParsedSheet {
    pub layout: Layout,
    pub rows: Vec<DraftRow>,
}

/// Detect the layout of a grid and normalize it into draft rows
pub fn normalize(grid: &Grid) -> ParsedSheet {
    let layout = detect_layout(grid);
    let rows = match layout {
        Layout::Vertical => vec![normalize_vertical(grid)],
        Layout::Horizontal => normalize_horizontal(grid),
    };

    log::info!("Detected {} layout, {} draft row(s)", layout, rows.len());
    ParsedSheet { layout, rows }
}

/// Store a value in an empty-or-stale slot; empty values never overwrite
fn assign(slot: &mut Option<String>, value: &str) {
    if !value.is_empty() {
        *slot = Some(value.to_string());
    }
}
