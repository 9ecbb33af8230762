//! Timestamp-ordered record storage and the tabular read API.
//!
//! Producers emit lines in original-line order, which is not guaranteed
//! to be timestamp order when several sources interleave their output,
//! so every insertion re-establishes the ascending-by-timestamp
//! invariant. Near-monotonic input inserts at the tail in O(1).

use std::fs;
use std::path::Path;

use crate::error::Error;
use crate::parser::parse_line;
use crate::record::{
    Alignment, CellRole, CellValue, FieldKind, LogRecord, Rgb, SCHEMA, column,
};

/// Read-only tabular access to a rectangular set of cells. Implemented
/// by the full store and by the filtered view; external shells consume
/// the core exclusively through this interface.
pub trait TableModel {
    fn row_count(&self) -> usize;
    fn column_count(&self) -> usize;
    /// Column header name, `None` out of range.
    fn column_name(&self, column: usize) -> Option<&'static str>;
    /// Read one aspect of one cell. Out-of-range access yields
    /// [`CellValue::Empty`], never a panic.
    fn cell(&self, row: usize, column: usize, role: CellRole) -> CellValue;

    /// Opaque row identifier: the original source line number, for
    /// cross-referencing by external collaborators. `None` out of
    /// range.
    fn opaque_row_id(&self, row: usize) -> Option<u32> {
        match self.cell(row, 0, CellRole::RowId) {
            CellValue::RowId(id) => Some(id),
            _ => None,
        }
    }
}

/// An ordered sequence of [`LogRecord`], ascending by timestamp at all
/// times regardless of arrival order.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<LogRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, row: usize) -> Option<&LogRecord> {
        self.records.get(row)
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Insert one record at its sorted position.
    ///
    /// Scans backward from the tail and places the record immediately
    /// after the nearest predecessor with a strictly smaller timestamp,
    /// so equal timestamps keep arrival order relative to each other. A
    /// record earlier than everything stored lands at the head. The gap
    /// flag is fixed here, from the left neighbor in the final sorted
    /// position, and is not revisited by later insertions elsewhere.
    pub fn insert(&mut self, mut record: LogRecord) {
        if self.records.is_empty() {
            self.records.push(record);
            return;
        }
        for i in (0..self.records.len()).rev() {
            if self.records[i].timestamp < record.timestamp {
                record.gap = self.records[i].timestamp.secs_to(&record.timestamp) > 1;
                self.records.insert(i + 1, record);
                return;
            }
        }
        record.gap = false;
        self.records.insert(0, record);
    }

    /// Parse `path` line by line and insert every record that matches
    /// the log format. Non-matching lines are skipped with a
    /// diagnostic; an unreadable file is an error for the caller to
    /// soften.
    pub fn load_file(&mut self, path: &Path) -> Result<(), Error> {
        let text = fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        for (index, line) in text.lines().enumerate() {
            if let Some(record) = parse_line(index as u32 + 1, line) {
                self.insert(record);
            }
        }
        Ok(())
    }
}

impl TableModel for RecordStore {
    fn row_count(&self) -> usize {
        self.records.len()
    }

    fn column_count(&self) -> usize {
        SCHEMA.len()
    }

    fn column_name(&self, column: usize) -> Option<&'static str> {
        SCHEMA.get(column).map(|field| field.name)
    }

    fn cell(&self, row: usize, column: usize, role: CellRole) -> CellValue {
        let Some(record) = self.records.get(row) else {
            return CellValue::Empty;
        };
        if column >= SCHEMA.len() {
            return CellValue::Empty;
        }
        match role {
            CellRole::Display => match record.display_text(column) {
                Some(text) => CellValue::Text(text),
                None => CellValue::Empty,
            },
            CellRole::Alignment => match SCHEMA[column].kind {
                FieldKind::Integer => CellValue::Align(Alignment::Right),
                _ => CellValue::Align(Alignment::Left),
            },
            CellRole::Foreground => foreground(record, column),
            CellRole::Background => background(record, column),
            CellRole::RowId => CellValue::RowId(record.id),
            // Emphasis needs filter context; the filtered view supplies it.
            CellRole::Emphasis => CellValue::Empty,
        }
    }
}

fn foreground(record: &LogRecord, col: usize) -> CellValue {
    if col == column::TIMESTAMP && record.gap {
        CellValue::Color(Rgb::WHITE)
    } else if record.level == "ERROR" {
        CellValue::Color(Rgb::YELLOW)
    } else {
        CellValue::Empty
    }
}

fn background(record: &LogRecord, col: usize) -> CellValue {
    if col == column::TIMESTAMP && record.gap {
        CellValue::Color(Rgb::RED)
    } else if record.level == "ERROR" {
        CellValue::Color(Rgb::DARK_RED)
    } else if record.level == "WARN" {
        CellValue::Color(Rgb::YELLOW)
    } else {
        CellValue::Empty
    }
}
