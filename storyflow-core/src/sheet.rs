//! Spreadsheet decoding
//!
//! Turns the first sheet of a CSV or Excel file into a plain grid of strings.
//! Everything downstream works on the grid only.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::import::ImportError;

/// Decoded sheet: ordered rows, each an ordered list of cell strings
pub type Grid = Vec<Vec<String>>;

/// File extensions accepted for import (lower-case, without the dot)
pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "xlsx", "xls"];

/// Delimiters tried when sniffing a CSV file, in tie-break order
const CSV_DELIMITERS: &[u8] = &[b'\t', b';', b',', b'|'];

/// Number of lines inspected when sniffing a CSV delimiter
const SNIFF_LINES: usize = 10;

/// How a file will be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Csv,
    Excel,
}

/// Validate the file extension before any I/O happens
pub fn check_extension(path: &Path) -> Result<SheetFormat, ImportError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => Ok(SheetFormat::Csv),
        "xlsx" | "xls" => Ok(SheetFormat::Excel),
        _ => Err(ImportError::UnsupportedExtension(
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        )),
    }
}

/// Load the first sheet of a supported file into a grid
pub fn load_grid(path: &Path) -> Result<Grid, ImportError> {
    let grid = match check_extension(path)? {
        SheetFormat::Csv => load_csv(path)?,
        SheetFormat::Excel => load_excel(path)?,
    };

    log::debug!("Decoded {} rows from {}", grid.len(), path.display());
    Ok(grid)
}

/// Cell at `idx`, or an empty string when the row is shorter
pub fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

fn unreadable(path: &Path, reason: impl ToString) -> ImportError {
    ImportError::Unreadable {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn load_csv(path: &Path) -> Result<Grid, ImportError> {
    let bytes = std::fs::read(path).map_err(|e| unreadable(path, e))?;
    let content = decode_text(bytes);
    parse_csv(&content).map_err(|e| unreadable(path, e))
}

/// Decode bytes as UTF-8, falling back to Windows-1252 (common for
/// Excel-exported CSVs). A leading BOM is dropped.
fn decode_text(bytes: Vec<u8>) -> String {
    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    };

    match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}

/// Parse CSV text into a grid, sniffing the delimiter
pub fn parse_csv(content: &str) -> Result<Grid, csv::Error> {
    let delimiter = sniff_delimiter(content);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut grid = Grid::new();
    for result in reader.records() {
        let record = result?;
        grid.push(record.iter().map(str::to_string).collect());
    }
    Ok(grid)
}

/// Pick the delimiter that yields the most consistent field count (>1 field)
/// across the first few lines
fn sniff_delimiter(content: &str) -> u8 {
    let sample_lines: Vec<&str> = content.lines().take(SNIFF_LINES).collect();
    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in CSV_DELIMITERS {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        let target = counts.first().copied().unwrap_or(0);
        if target <= 1 {
            continue;
        }

        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;
        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

fn load_excel(path: &Path) -> Result<Grid, ImportError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| unreadable(path, e))?;

    let Some(first_sheet) = workbook.sheet_names().first().cloned() else {
        return Ok(Grid::new());
    };

    let range = workbook
        .worksheet_range(&first_sheet)
        .map_err(|e| unreadable(path, e))?;

    // The range starts at the first used cell, so "first column" and the
    // header row are the first used ones, as with blank-line-free CSV
    let grid: Grid = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    Ok(grid)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::Error(e) => format!("#{:?}", e),
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    #[test]
    fn test_check_extension() {
        assert_eq!(
            check_extension(Path::new("stories.CSV")).unwrap(),
            SheetFormat::Csv
        );
        assert_eq!(
            check_extension(Path::new("stories.xlsx")).unwrap(),
            SheetFormat::Excel
        );
        assert_eq!(
            check_extension(Path::new("legacy.xls")).unwrap(),
            SheetFormat::Excel
        );
    }

    #[test]
    fn test_rejects_unsupported_extension_without_io() {
        // The file does not exist; rejection must happen before opening it
        let err = load_grid(Path::new("/nonexistent/stories.pdf")).unwrap_err();
        assert!(matches!(
            err,
            ImportError::UnsupportedExtension(ref name) if name == "stories.pdf"
        ));

        let err = check_extension(Path::new("no_extension")).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedExtension(_)));
    }

    #[test]
    fn test_parse_csv_comma() {
        let grid = parse_csv("Title,Description\nFix bug,Bug breaks login\n").unwrap();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[1], vec!["Fix bug", "Bug breaks login"]);
    }

    #[test]
    fn test_semicolon_matches_comma() {
        let comma = parse_csv("Title,Description,Classification\nA,B,C\n").unwrap();
        let semi = parse_csv("Title;Description;Classification\nA;B;C\n").unwrap();
        assert_eq!(comma, semi);
    }

    #[test]
    fn test_parse_csv_quoted_multiline() {
        let grid = parse_csv("Title,Criteria\nLogin,\"- one\n- two\"\n").unwrap();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[1][1], "- one\n- two");
    }

    #[test]
    fn test_cell_out_of_range() {
        let row = vec!["a".to_string()];
        assert_eq!(cell(&row, 0), "a");
        assert_eq!(cell(&row, 2), "");
    }

    #[test]
    fn test_load_csv_with_bom_and_arabic() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all("\u{feff}Title,مرحبا\n".as_bytes()).unwrap();

        let grid = load_grid(file.path()).unwrap();
        assert_eq!(grid, vec![vec!["Title".to_string(), "مرحبا".to_string()]]);
    }

    #[test]
    fn test_load_csv_windows_1252() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        // "Café" in Windows-1252
        file.write_all(b"Title,Caf\xe9\n").unwrap();

        let grid = load_grid(file.path()).unwrap();
        assert_eq!(grid[0][1], "Café");
    }

    #[test]
    fn test_unreadable_excel() {
        let mut file = Builder::new().suffix(".xlsx").tempfile().unwrap();
        file.write_all(b"definitely not a zip archive").unwrap();

        let err = load_grid(file.path()).unwrap_err();
        assert!(matches!(err, ImportError::Unreadable { .. }));
    }

    fn fixture(name: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    #[test]
    fn test_excel_grid_starts_at_first_used_row() {
        // Header sits in row 2 of the sheet
        let grid = load_grid(&fixture("horizontal_offset.xlsx")).unwrap();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0], vec!["ID", "Title", "Description", "Priority"]);
        assert_eq!(grid[1][0], "1");
        assert_eq!(grid[1][1], "Login page");
        assert_eq!(grid[2][3], "Low");
    }

    #[test]
    fn test_excel_grid_starts_at_first_used_column() {
        // Labels sit in column B
        let grid = load_grid(&fixture("vertical_offset.xlsx")).unwrap();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0][0], "Title");
        assert_eq!(grid[0][2], "صفحة الدخول");
        assert_eq!(cell(&grid[2], 0), "Classification");
        assert_eq!(cell(&grid[2], 2), "");
    }

    #[test]
    fn test_missing_csv_is_unreadable() {
        let file = NamedTempFile::new().unwrap();
        let missing = file.path().with_extension("csv");
        let err = load_grid(&missing).unwrap_err();
        assert!(matches!(err, ImportError::Unreadable { .. }));
    }

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Float(3.0)), "3");
        assert_eq!(cell_to_string(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
        assert_eq!(cell_to_string(&Data::Bool(true)), "TRUE");
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::String("x".into())), "x");
    }
}
