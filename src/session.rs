//! One log session: a source file, its record store, and the filter
//! model derived from it.
//!
//! The session owns all mutation. Every mutator notifies registered
//! observers synchronously before returning, so the first read after
//! any mutator reflects the new state in full; no partially applied
//! state is ever observable. Single-threaded and non-reentrant by
//! construction.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::filter::{FilterModel, FilteredView};
use crate::search::{self, CellPos, SearchRequest};
use crate::store::RecordStore;
use crate::timestamp::Timestamp;

/// Change notifications delivered to session observers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewEvent {
    /// The filtered view is about to be rebuilt.
    AboutToChange,
    /// The filtered view finished rebuilding.
    Changed,
    /// Filtered row count after a rebuild.
    RowCountChanged(usize),
    /// The store rows `first..=last` are about to be dropped (reload).
    RowsAboutToBeRemoved { first: usize, last: usize },
    RowsRemoved,
    /// The store rows `first..=last` were inserted (reload).
    RowsInserted { first: usize, last: usize },
    /// Percent-complete checkpoint of a running filter pass.
    Progress(u8),
}

type Observer = Box<dyn FnMut(&ViewEvent)>;

/// A loaded log file plus the query state layered on top of it.
pub struct LogSession {
    path: PathBuf,
    store: RecordStore,
    filter: FilterModel,
    observers: Vec<Observer>,
}

impl LogSession {
    /// Open a session on `path` and run the initial load. An unreadable
    /// file yields a session over an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut session = Self {
            path: path.into(),
            store: RecordStore::new(),
            filter: FilterModel::new(),
            observers: Vec::new(),
        };
        session.reload();
        session
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Register a change observer. Events arrive synchronously on the
    /// mutating call, in emission order.
    pub fn add_observer(&mut self, observer: impl FnMut(&ViewEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Records in the store, before filtering.
    pub fn total_count(&self) -> usize {
        self.store.len()
    }

    /// Rows accepted by the current filter.
    pub fn filtered_count(&self) -> usize {
        self.filter.accepted_rows().len()
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// The filtered tabular view external shells render from.
    pub fn view(&self) -> FilteredView<'_> {
        FilteredView::new(&self.store, &self.filter)
    }

    pub fn filter_text(&self) -> &str {
        self.filter.filter_text()
    }

    pub fn start_bound(&self) -> Option<&Timestamp> {
        self.filter.start_bound()
    }

    pub fn end_bound(&self) -> Option<&Timestamp> {
        self.filter.end_bound()
    }

    /// Clear and rebuild the store from the source file, then re-derive
    /// the filtered view. Filter state survives a reload.
    pub fn reload(&mut self) {
        emit(&mut self.observers, &ViewEvent::AboutToChange);

        if !self.store.is_empty() {
            emit(
                &mut self.observers,
                &ViewEvent::RowsAboutToBeRemoved { first: 0, last: self.store.len() - 1 },
            );
            self.store.clear();
            emit(&mut self.observers, &ViewEvent::RowsRemoved);
        }

        if let Err(error) = self.store.load_file(&self.path) {
            // Soft failure: the session stays usable over an empty store.
            warn!(%error, "reload failed");
            self.store.clear();
        }

        if !self.store.is_empty() {
            emit(
                &mut self.observers,
                &ViewEvent::RowsInserted { first: 0, last: self.store.len() - 1 },
            );
        }

        self.refresh_filter();
    }

    /// Replace the filter text and re-evaluate every row. Setting the
    /// current value again is a no-op with no notifications.
    pub fn set_filter_text(&mut self, text: &str) {
        if !self.filter.set_filter_text(text) {
            return;
        }
        emit(&mut self.observers, &ViewEvent::AboutToChange);
        self.refresh_filter();
    }

    /// Replace the inclusive start bound; `None` removes it.
    pub fn set_start_bound(&mut self, bound: Option<Timestamp>) {
        if !self.filter.set_start_bound(bound) {
            return;
        }
        emit(&mut self.observers, &ViewEvent::AboutToChange);
        self.refresh_filter();
    }

    /// Replace the inclusive end bound; `None` removes it.
    pub fn set_end_bound(&mut self, bound: Option<Timestamp>) {
        if !self.filter.set_end_bound(bound) {
            return;
        }
        emit(&mut self.observers, &ViewEvent::AboutToChange);
        self.refresh_filter();
    }

    /// Filtered view row nearest the target timestamp.
    pub fn find_nearest(&self, target: &Timestamp) -> Option<usize> {
        search::find_nearest(&self.view(), target)
    }

    /// Substring search over the filtered view's cells.
    pub fn search(&self, request: &SearchRequest) -> Vec<CellPos> {
        search::search(&self.view(), request)
    }

    fn refresh_filter(&mut self) {
        let Self { store, filter, observers, .. } = self;
        filter.refresh_with_progress(store, |percent| {
            emit(observers, &ViewEvent::Progress(percent));
        });
        emit(&mut self.observers, &ViewEvent::Changed);
        emit(
            &mut self.observers,
            &ViewEvent::RowCountChanged(self.filter.accepted_rows().len()),
        );
    }
}

fn emit(observers: &mut [Observer], event: &ViewEvent) {
    for observer in observers.iter_mut() {
        observer(event);
    }
}
