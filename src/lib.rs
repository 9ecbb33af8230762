//! Core engine for a GStreamer debug log viewer.
//!
//! The crate ingests GStreamer debug log text, parses each line into
//! typed fields, and keeps the records continuously ordered by their
//! embedded sub-second timestamps even when the file interleaves output
//! from several processes out of temporal order. On top of the ordered
//! store it answers two kinds of queries: multi-token filter predicates
//! and positional search (next matching cell, row nearest a target
//! timestamp).
//!
//! Everything is synchronous and single-threaded. Graphical shells,
//! preferences, and editors are external collaborators that consume the
//! [`store::TableModel`] read API and the [`session::LogSession`]
//! mutation and notification surface.

pub mod error;
pub mod filter;
pub mod parser;
pub mod record;
pub mod search;
pub mod session;
pub mod store;
pub mod timestamp;

pub use error::Error;
pub use filter::{FilterModel, FilteredView};
pub use record::{Alignment, CellRole, CellValue, LogRecord, Rgb};
pub use search::{CellPos, Direction, SearchRequest, find_nearest, search};
pub use session::{LogSession, ViewEvent};
pub use store::{RecordStore, TableModel};
pub use timestamp::Timestamp;
