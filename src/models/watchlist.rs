use std::io::Read;

use serde::Serialize;

use super::WatchlistEntry;
use crate::error::{AppError, AppResult};

const NAME_COLUMN: &str = "Name";
const YEAR_COLUMN: &str = "Year";

/// Parsed watchlist upload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Watchlist {
    pub entries: Vec<WatchlistEntry>,
    /// Hex blake3 digest of the entries, used as the catalog cache key
    pub hash: String,
}

impl Watchlist {
    pub fn new(entries: Vec<WatchlistEntry>) -> Self {
        let hash = content_hash(&entries);
        Self { entries, hash }
    }

    /// Parses a CSV export with at least `Name` and `Year` columns.
    ///
    /// Other columns are ignored and rows with an empty name are skipped.
    pub fn from_csv<R: Read>(reader: R) -> AppResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| AppError::InvalidInput(format!("Unreadable CSV header: {}", e)))?
            .clone();

        let name_idx = column_index(&headers, NAME_COLUMN)?;
        let year_idx = column_index(&headers, YEAR_COLUMN)?;

        let mut entries = Vec::new();
        for (row, record) in reader.records().enumerate() {
            // Header is line 1
            let line = row + 2;
            let record = record
                .map_err(|e| AppError::InvalidInput(format!("Malformed CSV row {}: {}", line, e)))?;

            let name = record.get(name_idx).unwrap_or_default();
            if name.is_empty() {
                continue;
            }

            let raw_year = record.get(year_idx).unwrap_or_default();
            let year = parse_year(raw_year).ok_or_else(|| {
                AppError::InvalidInput(format!(
                    "Row {} ({}): year '{}' is not a number",
                    line, name, raw_year
                ))
            })?;

            entries.push(WatchlistEntry::new(name, year));
        }

        if entries.is_empty() {
            return Err(AppError::InvalidInput(
                "Watchlist contains no entries".to_string(),
            ));
        }

        tracing::debug!(entries = entries.len(), "Parsed watchlist CSV");

        Ok(Self::new(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn column_index(headers: &csv::StringRecord, column: &str) -> AppResult<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}') == column)
        .ok_or_else(|| AppError::InvalidInput(format!("Missing '{}' column", column)))
}

/// Accepts "1999" as well as spreadsheet-style "1999.0"
fn parse_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    raw.parse::<i32>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|y| y.fract() == 0.0 && (i32::MIN as f64..=i32::MAX as f64).contains(y))
            .map(|y| y as i32)
    })
}

fn content_hash(entries: &[WatchlistEntry]) -> String {
    let mut hasher = blake3::Hasher::new();
    for entry in entries {
        hasher.update(entry.name.as_bytes());
        hasher.update(b"\x1f");
        hasher.update(entry.year.to_string().as_bytes());
        hasher.update(b"\x1e");
    }
    hasher.finalize().to_hex().to_string()
}
