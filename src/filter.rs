//! Multi-token filter queries over a record store.
//!
//! A filter is a whitespace-separated list of tokens combined with AND
//! semantics. `field:pattern` tokens target the schema column whose name
//! exactly matches `field` (case-sensitive — the query language depends
//! on this); any other token, colon or not, is a literal pattern against
//! the free-text `Message` column. Text columns match by
//! case-insensitive substring, integer columns by equality.

use tracing::warn;

use crate::record::{CellRole, CellValue, FieldKind, LogRecord, SCHEMA, column, column_by_name};
use crate::store::{RecordStore, TableModel};
use crate::timestamp::Timestamp;

/// How one token matches its resolved column.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Matcher {
    /// Case-insensitive substring containment; holds the lowercased
    /// pattern.
    Substring(String),
    /// Exact integer equality; garbage patterns compare as 0.
    Integer(i64),
    /// The resolved column's kind has no match rule; the token can
    /// never be satisfied.
    Unsupported,
}

/// One whitespace-delimited unit of a filter query, resolved against
/// the schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// Column index the token is evaluated against.
    pub column: usize,
    /// Pattern text as it applies to that column.
    pub pattern: String,
    matcher: Matcher,
}

impl Token {
    fn new(column: usize, pattern: String) -> Self {
        let matcher = match SCHEMA[column].kind {
            FieldKind::Text => Matcher::Substring(pattern.to_lowercase()),
            FieldKind::Integer => Matcher::Integer(pattern.parse().unwrap_or(0)),
            FieldKind::Timestamp => {
                warn!(field = SCHEMA[column].name, "field kind not supported in filters");
                Matcher::Unsupported
            }
        };
        Self { column, pattern, matcher }
    }

    /// Whether `record`'s value in this token's column satisfies it.
    fn satisfied_by(&self, record: &LogRecord) -> bool {
        match &self.matcher {
            Matcher::Substring(needle) => record
                .display_text(self.column)
                .is_some_and(|value| value.to_lowercase().contains(needle)),
            Matcher::Integer(wanted) => record.integer_value(self.column) == Some(*wanted),
            Matcher::Unsupported => false,
        }
    }
}

/// Split filter text into resolved tokens.
pub fn tokenize(text: &str) -> Vec<Token> {
    text.split_whitespace()
        .map(|word| match word.split_once(':') {
            Some((field, pattern)) => match column_by_name(field) {
                Some(column) => Token::new(column, pattern.to_string()),
                // Unknown field name: the whole original token, colon
                // included, is a literal pattern on the default column.
                None => Token::new(column::MESSAGE, word.to_string()),
            },
            None => Token::new(column::MESSAGE, word.to_string()),
        })
        .collect()
}

/// Derived accept/reject view over a record store.
///
/// Owns the filter text, optional inclusive timestamp bounds, and the
/// row set computed by the latest pass. It holds no reference to the
/// store; callers pass the store into each pass, and any setter
/// invalidates the previously computed rows until the next pass.
#[derive(Debug, Default)]
pub struct FilterModel {
    filter_text: String,
    tokens: Vec<Token>,
    start_bound: Option<Timestamp>,
    end_bound: Option<Timestamp>,
    accepted: Vec<usize>,
}

impl FilterModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn start_bound(&self) -> Option<&Timestamp> {
        self.start_bound.as_ref()
    }

    pub fn end_bound(&self) -> Option<&Timestamp> {
        self.end_bound.as_ref()
    }

    /// Replace the filter text. Returns false when unchanged.
    pub fn set_filter_text(&mut self, text: &str) -> bool {
        if self.filter_text == text {
            return false;
        }
        self.filter_text = text.to_string();
        self.tokens = tokenize(text);
        true
    }

    /// Replace the inclusive start bound. Returns false when unchanged.
    pub fn set_start_bound(&mut self, bound: Option<Timestamp>) -> bool {
        if self.start_bound == bound {
            return false;
        }
        self.start_bound = bound;
        true
    }

    /// Replace the inclusive end bound. Returns false when unchanged.
    pub fn set_end_bound(&mut self, bound: Option<Timestamp>) -> bool {
        if self.end_bound == bound {
            return false;
        }
        self.end_bound = bound;
        true
    }

    /// Whether one row passes the bounds and every token.
    pub fn accepts_row(&self, record: &LogRecord) -> bool {
        if let Some(start) = &self.start_bound
            && record.timestamp < *start
        {
            return false;
        }
        if let Some(end) = &self.end_bound
            && record.timestamp > *end
        {
            return false;
        }
        self.tokens.iter().all(|token| token.satisfied_by(record))
    }

    /// Whether a single cell satisfies any token that applies to its
    /// column. Always false while the filter text is empty.
    pub fn is_cell_emphasized(&self, record: &LogRecord, column: usize) -> bool {
        if self.filter_text.is_empty() {
            return false;
        }
        self.tokens
            .iter()
            .filter(|token| token.column == column)
            .any(|token| token.satisfied_by(record))
    }

    /// Run a full pass over the store, rebuilding the accepted row set.
    pub fn refresh(&mut self, store: &RecordStore) {
        self.refresh_with_progress(store, |_| {});
    }

    /// Full pass with a percent-complete checkpoint after each row.
    ///
    /// The divisor is captured once at pass start and held for the
    /// whole pass even if the store mutates underneath — the reported
    /// figure is a responsiveness hook, not a contract. A pass over a
    /// store of fewer than two rows reports against a divisor of 1.
    pub fn refresh_with_progress(&mut self, store: &RecordStore, mut on_progress: impl FnMut(u8)) {
        let divisor = store.len().saturating_sub(1).max(1);
        let mut last_reported = None;
        self.accepted.clear();
        for (row, record) in store.records().iter().enumerate() {
            let percent = (row * 100 / divisor) as u8;
            if last_reported != Some(percent) {
                on_progress(percent);
                last_reported = Some(percent);
            }
            if self.accepts_row(record) {
                self.accepted.push(row);
            }
        }
    }

    /// Store row indices accepted by the latest pass, ascending.
    pub fn accepted_rows(&self) -> &[usize] {
        &self.accepted
    }
}

/// The filtered table: the rows of one store accepted by one filter
/// model, in store order, plus per-cell emphasis.
pub struct FilteredView<'a> {
    store: &'a RecordStore,
    model: &'a FilterModel,
}

impl<'a> FilteredView<'a> {
    pub fn new(store: &'a RecordStore, model: &'a FilterModel) -> Self {
        Self { store, model }
    }

    /// Map a view row to its row in the underlying store.
    pub fn source_row(&self, row: usize) -> Option<usize> {
        self.model.accepted.get(row).copied()
    }

    pub fn record(&self, row: usize) -> Option<&'a LogRecord> {
        self.store.record(self.source_row(row)?)
    }

    /// Structured timestamp of a view row, read directly from the
    /// record rather than re-parsed from display text.
    pub fn timestamp(&self, row: usize) -> Option<&'a Timestamp> {
        self.record(row).map(|record| &record.timestamp)
    }
}

impl TableModel for FilteredView<'_> {
    fn row_count(&self) -> usize {
        self.model.accepted.len()
    }

    fn column_count(&self) -> usize {
        SCHEMA.len()
    }

    fn column_name(&self, column: usize) -> Option<&'static str> {
        self.store.column_name(column)
    }

    fn cell(&self, row: usize, column: usize, role: CellRole) -> CellValue {
        let Some(source_row) = self.source_row(row) else {
            return CellValue::Empty;
        };
        match role {
            CellRole::Emphasis => {
                if column >= SCHEMA.len() {
                    return CellValue::Empty;
                }
                let Some(record) = self.store.record(source_row) else {
                    return CellValue::Empty;
                };
                CellValue::Emphasis(self.model.is_cell_emphasized(record, column))
            }
            _ => self.store.cell(source_row, column, role),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Alignment;

    fn record(id: u32, timestamp: &str, level: &str, message: &str) -> LogRecord {
        LogRecord {
            id,
            gap: false,
            timestamp: Timestamp::parse(timestamp),
            pid: 4242,
            tid: "0xfeed".to_string(),
            level: level.to_string(),
            category: "core".to_string(),
            source: "gstbin.c".to_string(),
            line: 55,
            function: "gst_bin_add".to_string(),
            object: "<bin0>".to_string(),
            message: message.to_string(),
        }
    }

    fn store_with(records: Vec<LogRecord>) -> RecordStore {
        let mut store = RecordStore::new();
        for record in records {
            store.insert(record);
        }
        store
    }

    #[test]
    fn test_tokenize_resolution() {
        let tokens = tokenize("Level:ERROR boot Unknown:x");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].column, column::LEVEL);
        assert_eq!(tokens[0].pattern, "ERROR");
        assert_eq!(tokens[1].column, column::MESSAGE);
        assert_eq!(tokens[1].pattern, "boot");
        // Unknown field names keep the whole token as a literal.
        assert_eq!(tokens[2].column, column::MESSAGE);
        assert_eq!(tokens[2].pattern, "Unknown:x");
    }

    #[test]
    fn test_tokenize_field_names_are_case_sensitive() {
        let tokens = tokenize("level:ERROR");
        assert_eq!(tokens[0].column, column::MESSAGE);
        assert_eq!(tokens[0].pattern, "level:ERROR");
    }

    #[test]
    fn test_tokenize_pattern_may_contain_colons() {
        let tokens = tokenize("Level:a:b");
        assert_eq!(tokens[0].column, column::LEVEL);
        assert_eq!(tokens[0].pattern, "a:b");
    }

    #[test]
    fn test_conjunctive_acceptance() {
        let mut model = FilterModel::new();
        model.set_filter_text("Level:ERROR boot");

        let passing = record(1, "0:00:01.0", "error", "cold boot done");
        let wrong_message = record(2, "0:00:02.0", "ERROR", "shutting down");
        let wrong_level = record(3, "0:00:03.0", "DEBUG", "cold boot done");

        // Level value comparison is case-insensitive even though field
        // name resolution is not.
        assert!(model.accepts_row(&passing));
        assert!(!model.accepts_row(&wrong_message));
        assert!(!model.accepts_row(&wrong_level));
    }

    #[test]
    fn test_integer_token_equality() {
        let mut model = FilterModel::new();
        model.set_filter_text("Process:4242");
        assert!(model.accepts_row(&record(1, "0:00:01.0", "DEBUG", "m")));
        model.set_filter_text("Process:4243");
        assert!(!model.accepts_row(&record(1, "0:00:01.0", "DEBUG", "m")));
        // A garbage integer pattern compares as 0.
        model.set_filter_text("Line:junk");
        let mut zero_line = record(1, "0:00:01.0", "DEBUG", "m");
        zero_line.line = 0;
        assert!(model.accepts_row(&zero_line));
    }

    #[test]
    fn test_timestamp_token_rejects_row() {
        let mut model = FilterModel::new();
        model.set_filter_text("Timestamp:0:00:01");
        assert!(!model.accepts_row(&record(1, "0:00:01.0", "DEBUG", "m")));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let mut model = FilterModel::new();
        model.set_start_bound(Some(Timestamp::parse("0:00:02.000000000")));
        model.set_end_bound(Some(Timestamp::parse("0:00:04.000000000")));

        assert!(!model.accepts_row(&record(1, "0:00:01.999999999", "DEBUG", "m")));
        assert!(model.accepts_row(&record(2, "0:00:02.000000000", "DEBUG", "m")));
        assert!(model.accepts_row(&record(3, "0:00:04.000000000", "DEBUG", "m")));
        assert!(!model.accepts_row(&record(4, "0:00:04.000000001", "DEBUG", "m")));
    }

    #[test]
    fn test_setters_report_change() {
        let mut model = FilterModel::new();
        assert!(model.set_filter_text("boot"));
        assert!(!model.set_filter_text("boot"));
        let bound = Some(Timestamp::parse("0:00:01.0"));
        assert!(model.set_start_bound(bound.clone()));
        assert!(!model.set_start_bound(bound));
        assert!(model.set_end_bound(Some(Timestamp::parse("0:00:09.0"))));
    }

    #[test]
    fn test_refresh_builds_accepted_rows() {
        let store = store_with(vec![
            record(1, "0:00:01.0", "DEBUG", "starting up"),
            record(2, "0:00:02.0", "ERROR", "boot failed"),
            record(3, "0:00:03.0", "DEBUG", "boot ok"),
        ]);
        let mut model = FilterModel::new();
        model.set_filter_text("boot");
        model.refresh(&store);
        assert_eq!(model.accepted_rows(), [1, 2]);

        model.set_filter_text("");
        model.refresh(&store);
        assert_eq!(model.accepted_rows(), [0, 1, 2]);
    }

    #[test]
    fn test_refresh_progress_checkpoints() {
        let store = store_with(vec![
            record(1, "0:00:01.0", "DEBUG", "a"),
            record(2, "0:00:02.0", "DEBUG", "b"),
            record(3, "0:00:03.0", "DEBUG", "c"),
        ]);
        let mut model = FilterModel::new();
        let mut seen = Vec::new();
        model.refresh_with_progress(&store, |percent| seen.push(percent));
        assert_eq!(seen, [0, 50, 100]);
    }

    #[test]
    fn test_refresh_progress_single_row_store() {
        let store = store_with(vec![record(1, "0:00:01.0", "DEBUG", "a")]);
        let mut model = FilterModel::new();
        let mut seen = Vec::new();
        model.refresh_with_progress(&store, |percent| seen.push(percent));
        assert_eq!(seen, [0]);
    }

    #[test]
    fn test_emphasis_per_cell() {
        let mut model = FilterModel::new();
        model.set_filter_text("Level:ERROR boot");
        let row = record(1, "0:00:01.0", "ERROR", "boot failed");

        assert!(model.is_cell_emphasized(&row, column::LEVEL));
        assert!(model.is_cell_emphasized(&row, column::MESSAGE));
        // Tokens apply only to their resolved column.
        assert!(!model.is_cell_emphasized(&row, column::CATEGORY));

        model.set_filter_text("");
        assert!(!model.is_cell_emphasized(&row, column::LEVEL));
    }

    #[test]
    fn test_filtered_view_maps_rows() {
        let store = store_with(vec![
            record(1, "0:00:01.0", "DEBUG", "alpha"),
            record(2, "0:00:02.0", "DEBUG", "beta"),
            record(3, "0:00:03.0", "DEBUG", "alpha beta"),
        ]);
        let mut model = FilterModel::new();
        model.set_filter_text("beta");
        model.refresh(&store);

        let view = FilteredView::new(&store, &model);
        assert_eq!(view.row_count(), 2);
        assert_eq!(view.column_count(), 10);
        assert_eq!(view.source_row(0), Some(1));
        assert_eq!(view.source_row(1), Some(2));
        assert_eq!(
            view.cell(0, column::MESSAGE, CellRole::Display),
            CellValue::Text("beta".to_string())
        );
        assert_eq!(view.cell(0, 0, CellRole::RowId), CellValue::RowId(2));
        assert_eq!(view.cell(9, 0, CellRole::Display), CellValue::Empty);
        assert_eq!(
            view.cell(0, column::PROCESS, CellRole::Alignment),
            CellValue::Align(Alignment::Right)
        );
    }

    #[test]
    fn test_filtered_view_emphasis_role() {
        let store = store_with(vec![record(1, "0:00:01.0", "DEBUG", "boot ok")]);
        let mut model = FilterModel::new();
        model.set_filter_text("boot");
        model.refresh(&store);

        let view = FilteredView::new(&store, &model);
        assert_eq!(
            view.cell(0, column::MESSAGE, CellRole::Emphasis),
            CellValue::Emphasis(true)
        );
        assert_eq!(
            view.cell(0, column::LEVEL, CellRole::Emphasis),
            CellValue::Emphasis(false)
        );
        assert_eq!(view.cell(0, 99, CellRole::Emphasis), CellValue::Empty);
    }
}
