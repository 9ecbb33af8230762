//! Parsed log records and the static field schema.
//!
//! The original reflective field enumeration is replaced by an explicit
//! schema: an ordered list of `(name, kind)` pairs fixed at compile time.
//! The schema defines column indices for the tabular API and the field
//! names that `field:pattern` filter tokens resolve against (exact,
//! case-sensitive).

use crate::timestamp::Timestamp;

/// Declared type of a schema field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, matched by case-insensitive substring containment.
    Text,
    /// Integer, matched by exact equality.
    Integer,
    /// Sub-second timestamp; rendered via its retained text, not
    /// supported as a filter target.
    Timestamp,
}

/// One schema entry.
#[derive(Clone, Copy, Debug)]
pub struct Field {
    /// Column name, also the name `field:pattern` tokens match against.
    pub name: &'static str,
    pub kind: FieldKind,
}

/// The fixed record schema, in column order. `Message` is always last
/// and is the default target for bare filter tokens.
pub const SCHEMA: [Field; 10] = [
    Field { name: "Timestamp", kind: FieldKind::Timestamp },
    Field { name: "Process", kind: FieldKind::Integer },
    Field { name: "Thread", kind: FieldKind::Text },
    Field { name: "Level", kind: FieldKind::Text },
    Field { name: "Category", kind: FieldKind::Text },
    Field { name: "Source", kind: FieldKind::Text },
    Field { name: "Line", kind: FieldKind::Integer },
    Field { name: "Function", kind: FieldKind::Text },
    Field { name: "Object", kind: FieldKind::Text },
    Field { name: "Message", kind: FieldKind::Text },
];

/// Well-known column indices into [`SCHEMA`].
pub mod column {
    pub const TIMESTAMP: usize = 0;
    pub const PROCESS: usize = 1;
    pub const THREAD: usize = 2;
    pub const LEVEL: usize = 3;
    pub const CATEGORY: usize = 4;
    pub const SOURCE: usize = 5;
    pub const LINE: usize = 6;
    pub const FUNCTION: usize = 7;
    pub const OBJECT: usize = 8;
    pub const MESSAGE: usize = 9;
}

/// Resolve a field name to its column index, exact case-sensitive match.
pub fn column_by_name(name: &str) -> Option<usize> {
    SCHEMA.iter().position(|field| field.name == name)
}

/// One parsed log line. Immutable once inserted into a store.
#[derive(Clone, Debug)]
pub struct LogRecord {
    /// 1-based original line number; never reused or renumbered.
    pub id: u32,
    /// More than one second elapsed since the sorted predecessor that
    /// existed at insertion time.
    pub gap: bool,
    pub timestamp: Timestamp,
    pub pid: i64,
    pub tid: String,
    pub level: String,
    pub category: String,
    pub source: String,
    pub line: i64,
    pub function: String,
    pub object: String,
    pub message: String,
}

impl LogRecord {
    /// Rendered display text of one column.
    pub fn display_text(&self, column: usize) -> Option<String> {
        let text = match column {
            column::TIMESTAMP => self.timestamp.to_string(),
            column::PROCESS => self.pid.to_string(),
            column::THREAD => self.tid.clone(),
            column::LEVEL => self.level.clone(),
            column::CATEGORY => self.category.clone(),
            column::SOURCE => self.source.clone(),
            column::LINE => self.line.to_string(),
            column::FUNCTION => self.function.clone(),
            column::OBJECT => self.object.clone(),
            column::MESSAGE => self.message.clone(),
            _ => return None,
        };
        Some(text)
    }

    /// Integer value of an `Integer` column.
    pub fn integer_value(&self, column: usize) -> Option<i64> {
        match column {
            column::PROCESS => Some(self.pid),
            column::LINE => Some(self.line),
            _ => None,
        }
    }
}

/// Horizontal alignment hint for a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Right,
}

/// An RGB color used for cell decoration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const WHITE: Rgb = Rgb([255, 255, 255]);
    pub const YELLOW: Rgb = Rgb([255, 255, 0]);
    pub const RED: Rgb = Rgb([255, 0, 0]);
    pub const DARK_RED: Rgb = Rgb([128, 0, 0]);
}

/// The semantic aspect of a cell being read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellRole {
    /// Rendered display text.
    Display,
    /// Horizontal alignment hint.
    Alignment,
    /// Foreground decoration color.
    Foreground,
    /// Background decoration color.
    Background,
    /// Opaque row identifier: the original source line number.
    RowId,
    /// Whether the cell satisfies an applicable filter token (rendered
    /// bold by shells). Only meaningful on the filtered view.
    Emphasis,
}

/// The value read from a cell for a given role. `Empty` stands in for
/// out-of-range access and for roles with nothing to report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CellValue {
    Empty,
    Text(String),
    Align(Alignment),
    Color(Rgb),
    RowId(u32),
    Emphasis(bool),
}
