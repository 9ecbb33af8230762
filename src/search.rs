//! Positional search and navigation over a tabular model.
//!
//! Two mutually exclusive modes: a cell-by-cell substring scan with
//! direction and wrap, and a binary nearest-timestamp lookup over the
//! timestamp-ordered rows.

use std::cmp::Ordering;

use crate::filter::FilteredView;
use crate::record::{CellRole, CellValue};
use crate::store::{RecordStore, TableModel};
use crate::timestamp::Timestamp;

/// A cell position: row and column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellPos {
    pub row: usize,
    pub column: usize,
}

impl CellPos {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Scan direction for text search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// A text search over the cells of a model.
///
/// The scan starts just after `start` (which is never visited or
/// returned, even via wrap), advances column-first then row, and stops
/// on returning to the start cell, filling `max_hits`, or running off
/// the end with wrap disabled.
#[derive(Clone, Debug)]
pub struct SearchRequest {
    pub start: CellPos,
    /// Case-sensitive substring to look for in rendered display text.
    pub pattern: String,
    pub direction: Direction,
    pub wrap: bool,
    /// Hit cap; `None` collects every match.
    pub max_hits: Option<usize>,
}

impl SearchRequest {
    pub fn new(start: CellPos, pattern: impl Into<String>) -> Self {
        Self {
            start,
            pattern: pattern.into(),
            direction: Direction::Forward,
            wrap: false,
            max_hits: None,
        }
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn max_hits(mut self, max_hits: usize) -> Self {
        self.max_hits = Some(max_hits);
        self
    }
}

/// Row-to-timestamp access for nearest-timestamp lookup. Supplied by
/// the full store and the filtered view, both of which keep rows in
/// ascending timestamp order.
pub trait TimestampSource {
    fn row_timestamp(&self, row: usize) -> Option<&Timestamp>;
}

impl TimestampSource for RecordStore {
    fn row_timestamp(&self, row: usize) -> Option<&Timestamp> {
        self.record(row).map(|record| &record.timestamp)
    }
}

impl TimestampSource for FilteredView<'_> {
    fn row_timestamp(&self, row: usize) -> Option<&Timestamp> {
        self.timestamp(row)
    }
}

/// Find the row whose timestamp is nearest `target`. `None` on an
/// empty model.
///
/// Binary search over the ordered rows; the adjacent-pair base case
/// re-compares the two candidate deltas at seconds, then milliseconds,
/// microseconds, and nanoseconds resolution, returning the earlier row
/// only when its delta is strictly smaller. A total tie at nanosecond
/// resolution resolves to the later row — deterministic, not
/// arbitrary.
pub fn find_nearest<M>(model: &M, target: &Timestamp) -> Option<usize>
where
    M: TableModel + TimestampSource,
{
    let rows = model.row_count();
    if rows == 0 {
        return None;
    }
    nearest_in(model, 0, rows - 1, target)
}

fn nearest_in<M: TimestampSource>(
    model: &M,
    lo: usize,
    hi: usize,
    target: &Timestamp,
) -> Option<usize> {
    if lo == hi {
        return Some(lo);
    }
    if lo + 1 == hi {
        let earlier = model.row_timestamp(lo)?;
        let later = model.row_timestamp(hi)?;
        let mut former = earlier.secs_to(target);
        let mut latter = target.secs_to(later);
        if former == latter {
            former = earlier.msecs_to(target);
            latter = target.msecs_to(later);
        }
        if former == latter {
            former = earlier.usecs_to(target);
            latter = target.usecs_to(later);
        }
        if former == latter {
            former = earlier.nsecs_to(target);
            latter = target.nsecs_to(later);
        }
        return Some(if former < latter { lo } else { hi });
    }

    let mid = lo + (hi - lo) / 2;
    match target.cmp(model.row_timestamp(mid)?) {
        Ordering::Less => nearest_in(model, lo, mid, target),
        Ordering::Greater => nearest_in(model, mid, hi, target),
        Ordering::Equal => Some(mid),
    }
}

/// Collect cells whose display text contains the request pattern, in
/// visitation order.
pub fn search(model: &impl TableModel, request: &SearchRequest) -> Vec<CellPos> {
    let mut hits = Vec::new();
    let rows = model.row_count();
    let columns = model.column_count();
    if rows == 0 || columns == 0 {
        return hits;
    }
    if request.start.row >= rows || request.start.column >= columns {
        return hits;
    }

    let advance = |pos: CellPos| -> Option<CellPos> {
        match request.direction {
            Direction::Forward => {
                if pos.column + 1 < columns {
                    Some(CellPos::new(pos.row, pos.column + 1))
                } else if pos.row + 1 < rows {
                    Some(CellPos::new(pos.row + 1, 0))
                } else if request.wrap {
                    Some(CellPos::new(0, 0))
                } else {
                    None
                }
            }
            Direction::Backward => {
                if pos.column > 0 {
                    Some(CellPos::new(pos.row, pos.column - 1))
                } else if pos.row > 0 {
                    Some(CellPos::new(pos.row - 1, columns - 1))
                } else if request.wrap {
                    Some(CellPos::new(rows - 1, columns - 1))
                } else {
                    None
                }
            }
        }
    };

    let Some(mut pos) = advance(request.start) else {
        return hits;
    };
    // A single-cell model wraps straight back onto the excluded start.
    while pos != request.start {
        if request.max_hits.is_some_and(|max| hits.len() >= max) {
            break;
        }
        if let CellValue::Text(text) = model.cell(pos.row, pos.column, CellRole::Display)
            && text.contains(&request.pattern)
        {
            hits.push(pos);
        }
        match advance(pos) {
            Some(next) => pos = next,
            None => break,
        }
    }
    hits
}
