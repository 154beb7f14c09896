use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

/// Interaction phase of the search box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Rendered as a button. No input field exists.
    #[default]
    Collapsed,
    /// Rendered as a focused input with the result list below it.
    Expanded,
}

/// The widget record observed by render layers.
///
/// Every mutation produces a fresh snapshot for subscribers; nothing in here
/// is persisted beyond the lifetime of the mounted widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchState {
    /// Current interaction phase.
    pub mode: Mode,
    /// Raw text as typed, not yet debounced.
    pub query: String,
    /// Matching items in source order.
    pub results: Vec<String>,
    /// True while a filter computation for the settled query is in flight.
    pub is_pending: bool,
    /// Highlighted index into `results` for keyboard selection.
    pub cursor: usize,
}

impl SearchState {
    /// Whether the input is currently shown.
    pub fn is_expanded(&self) -> bool {
        self.mode == Mode::Expanded
    }

    /// The result under the keyboard cursor, if any.
    pub fn highlighted(&self) -> Option<&str> {
        self.results.get(self.cursor).map(String::as_str)
    }

    /// Replace the result list and park the cursor on the first entry.
    pub(crate) fn set_results(&mut self, results: Vec<String>) {
        self.results = results;
        self.cursor = 0;
    }

    /// Move the cursor by `delta`, clamped to the result list.
    pub(crate) fn move_cursor(&mut self, delta: isize) -> bool {
        if self.results.is_empty() {
            return false;
        }
        let last = self.results.len() - 1;
        let next = self.cursor.saturating_add_signed(delta).min(last);
        let moved = next != self.cursor;
        self.cursor = next;
        moved
    }

    /// Collapse and drop everything the expanded phase accumulated.
    pub(crate) fn reset(&mut self) {
        self.mode = Mode::Collapsed;
        self.query.clear();
        self.results.clear();
        self.is_pending = false;
        self.cursor = 0;
    }
}

/// Shared cell holding the [`SearchState`] record.
///
/// A dirty flag is raised on every effective write so a render loop can skip
/// frames where nothing changed.
#[derive(Debug)]
pub(crate) struct StateCell {
    inner: RwLock<SearchState>,
    dirty: AtomicBool,
}

impl StateCell {
    pub(crate) fn new(value: SearchState) -> Self {
        Self {
            inner: RwLock::new(value),
            dirty: AtomicBool::new(false),
        }
    }

    /// Get a clone of the current record.
    pub(crate) fn get(&self) -> SearchState {
        self.inner
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Read through the lock without cloning the whole record.
    pub(crate) fn read<R>(&self, f: impl FnOnce(&SearchState) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Mutate the record. The closure's return value tells whether it
    /// actually changed anything; only then is the dirty flag raised.
    pub(crate) fn update<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut SearchState) -> bool,
    {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let changed = f(&mut guard);
        if changed {
            self.dirty.store(true, Ordering::SeqCst);
        }
        changed
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Raise the dirty flag for changes that live outside the record.
    pub(crate) fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    pub(crate) fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}
