//! Guest sheet reader
//!
//! Reads a CSV export of the guest spreadsheet and counts confirmed guests:
//! a row is confirmed when its confirmation cell is non-empty.

use std::path::{Path, PathBuf};

use super::error::{EndpointError, EndpointResult};
use crate::guests::{Category, GuestSnapshot};

/// Label used for confirmed rows with a blank category cell
pub const UNCATEGORIZED_LABEL: &str = "Other";

/// Where and how to read the sheet
#[derive(Debug, Clone)]
pub struct SheetOptions {
    pub path: PathBuf,
    /// 0-indexed confirmation column (2 = column C)
    pub confirmed_column: usize,
    /// 0-indexed column to group by, if any
    pub category_column: Option<usize>,
}

impl SheetOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            confirmed_column: 2,
            category_column: None,
        }
    }

    pub fn with_confirmed_column(mut self, column: usize) -> Self {
        self.confirmed_column = column;
        self
    }

    pub fn with_category_column(mut self, column: usize) -> Self {
        self.category_column = Some(column);
        self
    }
}

/// Read the sheet at `options.path` into a snapshot.
///
/// Without a category column this is the count-only shape; with one, the
/// confirmed rows are grouped by category in order of first appearance.
pub fn read_sheet(options: &SheetOptions) -> EndpointResult<GuestSnapshot> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(&options.path)
        .map_err(|e| sheet_error(&options.path, e))?;

    summarize(reader, options)
}

/// Same as [`read_sheet`] for CSV text already in memory
pub fn read_sheet_str(csv_text: &str, options: &SheetOptions) -> EndpointResult<GuestSnapshot> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    summarize(reader, options)
}

fn summarize<R: std::io::Read>(
    mut reader: csv::Reader<R>,
    options: &SheetOptions,
) -> EndpointResult<GuestSnapshot> {
    let mut confirmed: u64 = 0;
    let mut categories: Vec<Category> = Vec::new();

    for record in reader.records() {
        let record = record.map_err(|e| sheet_error(&options.path, e))?;

        let is_confirmed = record
            .get(options.confirmed_column)
            .map(|cell| !cell.trim().is_empty())
            .unwrap_or(false);
        if !is_confirmed {
            continue;
        }
        confirmed += 1;

        if let Some(column) = options.category_column {
            let label = record
                .get(column)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(UNCATEGORIZED_LABEL);

            match categories.iter_mut().find(|c| c.label == label) {
                Some(category) => category.value += 1.0,
                None => categories.push(Category::new(label, 1.0)),
            }
        }
    }

    tracing::debug!(
        path = ?options.path,
        confirmed,
        categories = categories.len(),
        "Guest sheet read"
    );

    Ok(match options.category_column {
        Some(_) => GuestSnapshot::Chart {
            total_confirmed: confirmed,
            categories,
        },
        None => GuestSnapshot::Count {
            confirmed_count: confirmed,
        },
    })
}

fn sheet_error(path: &Path, error: csv::Error) -> EndpointError {
    EndpointError::Sheet {
        path: path.to_path_buf(),
        error: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SHEET: &str = "\
Name,Email,Paid,Group
Alice,alice@example.com,yes,Adult
Bob,bob@example.com,,Adult
Chloe,chloe@example.com,2025-12-01,Kids
Dan,dan@example.com,  ,Kids
Eve,eve@example.com,yes,
Finn,finn@example.com,yes,Adult
";

    #[test]
    fn test_counts_non_empty_confirmation_cells() {
        let snapshot = read_sheet_str(SHEET, &SheetOptions::new("guests.csv")).unwrap();
        assert_eq!(snapshot, GuestSnapshot::Count { confirmed_count: 4 });
    }

    #[test]
    fn test_groups_by_category() {
        let options = SheetOptions::new("guests.csv").with_category_column(3);
        let snapshot = read_sheet_str(SHEET, &options).unwrap();

        assert_eq!(
            snapshot,
            GuestSnapshot::Chart {
                total_confirmed: 4,
                categories: vec![
                    Category::new("Adult", 2.0),
                    Category::new("Kids", 1.0),
                    Category::new(UNCATEGORIZED_LABEL, 1.0),
                ],
            }
        );
    }

    #[test]
    fn test_short_rows_are_unconfirmed() {
        let sheet = "Name,Email,Paid\nAlice\nBob,bob@example.com,yes\n";
        let snapshot = read_sheet_str(sheet, &SheetOptions::new("guests.csv")).unwrap();
        assert_eq!(snapshot.total(), 1);
    }

    #[test]
    fn test_other_confirmation_column() {
        let options = SheetOptions::new("guests.csv").with_confirmed_column(1);
        let snapshot = read_sheet_str(SHEET, &options).unwrap();
        assert_eq!(snapshot.total(), 6);
    }

    #[test]
    fn test_read_sheet_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SHEET.as_bytes()).unwrap();

        let snapshot = read_sheet(&SheetOptions::new(file.path())).unwrap();
        assert_eq!(snapshot.total(), 4);
    }

    #[test]
    fn test_missing_file() {
        let err = read_sheet(&SheetOptions::new("/nonexistent/guests.csv")).unwrap_err();
        assert!(matches!(err, EndpointError::Sheet { .. }));
    }
}
