//! The mounted widget: interaction state machine plus debounced filter
//! pipeline.
//!
//! Keystrokes are recorded immediately and restart a single quiet-period
//! timer. When the timer survives, the query "settles": an empty query clears
//! the results on the spot, anything else raises the pending flag and hands
//! the query to the [`SearchSource`]. Each settle gets its own child
//! [`CancellationToken`]; settling again, collapsing or unmounting cancels it,
//! and a computation only commits while its token is still live. Token checks
//! and cancellations both happen under the state lock, so a stale result can
//! never slip in between.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use log::{debug, trace, warn};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::capability::Compositing;
use crate::config::{Callback, SearchConfig};
use crate::error::{MountError, SearchError};
use crate::motion::MotionProfile;
use crate::source::{SearchSource, SimulatedSource};
use crate::state::{Mode, SearchState, StateCell};
use crate::wakeup::WakeupSender;

/// Callback receiving a snapshot after every state change.
pub type Observer = Arc<dyn Fn(&SearchState) + Send + Sync>;

/// Handle returned by [`GooeySearch::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A mounted search widget.
///
/// Owns the widget's lifetime: dropping it (or calling
/// [`unmount`](Self::unmount)) cancels the debounce timer and every in-flight
/// computation, after which nothing mutates the state any more.
///
/// All operations are synchronous and never fail; background work runs on
/// the tokio runtime that was current at [`mount`](Self::mount).
pub struct GooeySearch {
    shared: Arc<Shared>,
}

struct Shared {
    state: StateCell,
    items: RwLock<Arc<[String]>>,
    placeholder: String,
    on_search: Option<Callback>,
    on_select: Option<Callback>,
    source: Arc<dyn SearchSource>,
    search_delay: Duration,
    compositing: Compositing,
    disabled: AtomicBool,
    focus_requested: AtomicBool,
    observers: RwLock<Vec<(SubscriptionId, Observer)>>,
    next_subscription: AtomicU64,
    wakeup: Mutex<Option<WakeupSender>>,
    /// Bumped on every keystroke and on collapse. A debounce timer only
    /// settles if the generation it captured is still current.
    keystrokes: AtomicU64,
    timer: Mutex<Option<JoinHandle<()>>>,
    /// Last query that survived the quiet period.
    settled: Mutex<String>,
    /// Token of the computation for `settled`, if one was started.
    in_flight: Mutex<Option<CancellationToken>>,
    /// Parent of every computation token; cancelled on unmount.
    mounted: CancellationToken,
    runtime: Handle,
}

impl GooeySearch {
    /// Mount a widget.
    ///
    /// Evaluates the capability classifier exactly once. Fails only when no
    /// tokio runtime is reachable from the calling thread.
    pub fn mount(config: SearchConfig) -> Result<Self, MountError> {
        let runtime = Handle::try_current()?;

        let SearchConfig {
            items,
            placeholder,
            on_search,
            on_select,
            disabled,
            search_delay,
            latency,
            compositing,
            source,
        } = config;

        let compositing = compositing.map(|classify| classify()).unwrap_or_default();
        let source = source.unwrap_or_else(|| Arc::new(SimulatedSource::new(latency)));

        debug!(
            "GooeySearch::mount items={} delay={:?} compositing={:?} disabled={}",
            items.len(),
            search_delay,
            compositing,
            disabled
        );

        let shared = Shared {
            state: StateCell::new(SearchState::default()),
            items: RwLock::new(items.into()),
            placeholder,
            on_search,
            on_select,
            source,
            search_delay,
            compositing,
            disabled: AtomicBool::new(disabled),
            focus_requested: AtomicBool::new(false),
            observers: RwLock::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
            wakeup: Mutex::new(None),
            keystrokes: AtomicU64::new(0),
            timer: Mutex::new(None),
            settled: Mutex::new(String::new()),
            in_flight: Mutex::new(None),
            mounted: CancellationToken::new(),
            runtime,
        };

        Ok(Self {
            shared: Arc::new(shared),
        })
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// Expand the button into the input and request focus for it.
    ///
    /// Returns false (and changes nothing) when disabled, unmounted or
    /// already expanded.
    pub fn activate(&self) -> bool {
        let shared = &self.shared;
        if shared.is_inert() {
            trace!("GooeySearch::activate ignored (inert)");
            return false;
        }

        let changed = shared.state.update(|s| {
            if s.mode == Mode::Expanded {
                return false;
            }
            s.mode = Mode::Expanded;
            true
        });

        if changed {
            shared.focus_requested.store(true, Ordering::SeqCst);
            debug!("GooeySearch expanded");
            shared.notify();
        }
        changed
    }

    /// Collapse without a selection, clearing query, results and pending.
    pub fn dismiss(&self) -> bool {
        let shared = &self.shared;
        if shared.is_inert() {
            return false;
        }

        let changed = shared.collapse();
        if changed {
            debug!("GooeySearch dismissed");
            shared.notify();
        }
        changed
    }

    /// Activate when collapsed, dismiss when expanded.
    pub fn toggle(&self) -> bool {
        match self.mode() {
            Mode::Collapsed => self.activate(),
            Mode::Expanded => self.dismiss(),
        }
    }

    /// Pick `item` from the current results.
    ///
    /// Only items currently shown are accepted. On success the widget
    /// collapses first, then `on_select` runs, so the callback fires exactly
    /// once per pick.
    pub fn select(&self, item: &str) -> bool {
        let shared = &self.shared;
        if shared.is_inert() {
            return false;
        }

        let chosen = shared.state.update(|s| {
            if s.mode != Mode::Expanded || !s.results.iter().any(|r| r == item) {
                return false;
            }
            s.reset();
            shared.cancel_pipeline();
            true
        });

        if !chosen {
            trace!("GooeySearch::select ignored for {:?}", item);
            return false;
        }

        debug!("GooeySearch selected {:?}", item);
        if let Some(on_select) = &shared.on_select {
            on_select(item);
        }
        shared.notify();
        true
    }

    /// Pick the result at `index`.
    pub fn select_index(&self, index: usize) -> bool {
        let item = self.shared.state.read(|s| s.results.get(index).cloned());
        match item {
            Some(item) => self.select(&item),
            None => false,
        }
    }

    /// Pick the result under the keyboard cursor.
    pub fn select_highlighted(&self) -> bool {
        let item = self
            .shared
            .state
            .read(|s| s.highlighted().map(str::to_string));
        match item {
            Some(item) => self.select(&item),
            None => false,
        }
    }

    /// Move the keyboard cursor within the results, clamped at both ends.
    pub fn move_cursor(&self, delta: isize) -> bool {
        let shared = &self.shared;
        if shared.is_inert() {
            return false;
        }

        let moved = shared
            .state
            .update(|s| s.is_expanded() && s.move_cursor(delta));
        if moved {
            shared.notify();
        }
        moved
    }

    // -------------------------------------------------------------------------
    // Pipeline
    // -------------------------------------------------------------------------

    /// Feed the input's full text after a keystroke.
    ///
    /// Records the text, calls `on_search` synchronously and restarts the
    /// debounce timer. Ignored while collapsed (there is no input field) or
    /// inert.
    pub fn input(&self, text: impl Into<String>) {
        let shared = &self.shared;
        let text = text.into();
        if shared.is_inert() {
            trace!("GooeySearch::input ignored (inert)");
            return;
        }

        let recorded = shared.state.update(|s| {
            if s.mode != Mode::Expanded {
                return false;
            }
            s.query.clone_from(&text);
            if text.is_empty() {
                s.is_pending = false;
            }
            true
        });

        if !recorded {
            trace!("GooeySearch::input ignored while collapsed");
            return;
        }

        if let Some(on_search) = &shared.on_search {
            on_search(&text);
        }
        shared.notify();
        shared.schedule_settle(text);
    }

    /// Replace the candidate list.
    ///
    /// Results no longer in the list are dropped right away. If a non-empty
    /// query has settled it is recomputed against the new list without
    /// waiting for the quiet period.
    pub fn set_data<I, S>(&self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let shared = &self.shared;
        let items: Arc<[String]> = items.into_iter().map(Into::into).collect();
        *shared.items.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&items);

        if shared.mounted.is_cancelled() {
            return;
        }

        debug!("GooeySearch::set_data items={}", items.len());

        let pruned = shared.state.update(|s| {
            let before = s.results.len();
            s.results.retain(|r| items.contains(r));
            if s.results.len() == before {
                return false;
            }
            s.cursor = 0;
            true
        });

        let settled = lock(&shared.settled).clone();
        let refreshed = !settled.is_empty() && shared.settle(settled, Settle::Refresh);
        if pruned && !refreshed {
            shared.notify();
        }
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Enable or disable the widget. While disabled no transition fires and
    /// input is ignored; the current mode is kept.
    pub fn set_disabled(&self, disabled: bool) {
        let shared = &self.shared;
        let previous = shared.disabled.swap(disabled, Ordering::SeqCst);
        if previous != disabled {
            debug!("GooeySearch disabled={}", disabled);
            shared.state.mark_dirty();
            shared.notify();
        }
    }

    /// Tear the widget down. Idempotent; also runs on drop.
    ///
    /// Cancels the pending timer and every in-flight computation. The last
    /// state stays readable but never changes again.
    pub fn unmount(&self) {
        let shared = &self.shared;
        if shared.mounted.is_cancelled() {
            return;
        }

        shared.state.update(|_| {
            shared.mounted.cancel();
            shared.cancel_pipeline();
            false
        });
        debug!("GooeySearch unmounted");
    }

    /// Whether the widget is still mounted.
    pub fn is_mounted(&self) -> bool {
        !self.shared.mounted.is_cancelled()
    }

    // -------------------------------------------------------------------------
    // Observation
    // -------------------------------------------------------------------------

    /// Register an observer called with the full record after every change.
    ///
    /// Observers run on whichever thread made the change, with no internal
    /// lock held.
    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&SearchState) + Send + Sync + 'static,
    {
        let shared = &self.shared;
        let id = SubscriptionId(shared.next_subscription.fetch_add(1, Ordering::SeqCst));
        shared
            .observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(observer)));
        id
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self
            .shared
            .observers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    /// Install a wakeup sender for an event loop.
    ///
    /// Every change sends a wakeup after observers have run.
    pub fn install_wakeup(&self, sender: WakeupSender) {
        *lock(&self.shared.wakeup) = Some(sender);
    }

    /// Returns and clears the focus request raised by [`activate`](Self::activate).
    pub fn take_focus_request(&self) -> bool {
        self.shared.focus_requested.swap(false, Ordering::SeqCst)
    }

    /// Check if the state has been modified since last check
    pub fn is_dirty(&self) -> bool {
        self.shared.state.is_dirty()
    }

    /// Clear the dirty flag
    pub fn clear_dirty(&self) {
        self.shared.state.clear_dirty();
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// A copy of the full record.
    pub fn snapshot(&self) -> SearchState {
        self.shared.state.get()
    }

    pub fn mode(&self) -> Mode {
        self.shared.state.read(|s| s.mode)
    }

    pub fn query(&self) -> String {
        self.shared.state.read(|s| s.query.clone())
    }

    pub fn results(&self) -> Vec<String> {
        self.shared.state.read(|s| s.results.clone())
    }

    pub fn is_pending(&self) -> bool {
        self.shared.state.read(|s| s.is_pending)
    }

    pub fn is_disabled(&self) -> bool {
        self.shared.disabled.load(Ordering::SeqCst)
    }

    pub fn placeholder(&self) -> &str {
        &self.shared.placeholder
    }

    /// The current candidate list.
    pub fn items(&self) -> Vec<String> {
        self.shared
            .items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .to_vec()
    }

    pub fn search_delay(&self) -> Duration {
        self.shared.search_delay
    }

    /// Compositing class computed at mount.
    pub fn compositing(&self) -> Compositing {
        self.shared.compositing
    }

    /// Motion variant set for this widget's compositing class.
    pub fn motion(&self) -> MotionProfile {
        MotionProfile::for_compositing(self.shared.compositing)
    }
}

impl Drop for GooeySearch {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl fmt::Debug for GooeySearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GooeySearch")
            .field("state", &self.snapshot())
            .field("disabled", &self.is_disabled())
            .field("compositing", &self.shared.compositing)
            .field("mounted", &self.is_mounted())
            .finish_non_exhaustive()
    }
}

impl Shared {
    fn is_inert(&self) -> bool {
        self.disabled.load(Ordering::SeqCst) || self.mounted.is_cancelled()
    }

    fn items(&self) -> Arc<[String]> {
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*items)
    }

    /// Collapse from Expanded. No-op when already collapsed.
    fn collapse(&self) -> bool {
        self.state.update(|s| {
            if s.mode == Mode::Collapsed {
                return false;
            }
            s.reset();
            self.cancel_pipeline();
            true
        })
    }

    /// Drop the pending timer and the in-flight computation.
    ///
    /// Must be called with the state lock held.
    fn cancel_pipeline(&self) {
        self.keystrokes.fetch_add(1, Ordering::SeqCst);
        if let Some(timer) = lock(&self.timer).take() {
            timer.abort();
        }
        if let Some(token) = lock(&self.in_flight).take() {
            token.cancel();
        }
        lock(&self.settled).clear();
    }

    /// Restart the quiet-period timer for `text`.
    fn schedule_settle(self: &Arc<Self>, text: String) {
        let generation = self.keystrokes.fetch_add(1, Ordering::SeqCst) + 1;
        let delay = self.search_delay;
        let shared = Arc::clone(self);

        let timer = self.runtime.spawn(async move {
            tokio::select! {
                _ = shared.mounted.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
            if shared.keystrokes.load(Ordering::SeqCst) != generation {
                trace!("debounce timer {} superseded", generation);
                return;
            }
            shared.settle(text, Settle::Debounce);
        });

        if let Some(previous) = lock(&self.timer).replace(timer) {
            previous.abort();
        }
    }

    /// Apply a settled query. Returns true if the record changed.
    fn settle(self: &Arc<Self>, query: String, cause: Settle) -> bool {
        let mut token = None;

        let changed = self.state.update(|s| {
            if self.mounted.is_cancelled() || s.mode != Mode::Expanded {
                return false;
            }
            // A keystroke that landed after the timer fired owns the query now
            if cause == Settle::Debounce && s.query != query {
                return false;
            }

            if let Some(previous) = lock(&self.in_flight).take() {
                previous.cancel();
            }

            if cause == Settle::Refresh && s.query.is_empty() {
                // Input was cleared; its own quiet period will clear the results
                s.is_pending = false;
                return false;
            }

            *lock(&self.settled) = query.clone();
            if query.is_empty() {
                s.set_results(Vec::new());
                s.is_pending = false;
            } else {
                let child = self.mounted.child_token();
                *lock(&self.in_flight) = Some(child.clone());
                token = Some(child);
                s.is_pending = true;
            }
            true
        });

        if !changed {
            trace!("settle of {:?} skipped", query);
            return false;
        }

        debug!("query settled: {:?}", query);
        self.notify();

        if let Some(token) = token {
            self.spawn_search(query, token);
        }
        true
    }

    fn spawn_search(self: &Arc<Self>, query: String, token: CancellationToken) {
        let shared = Arc::clone(self);
        let items = self.items();

        self.runtime.spawn(async move {
            let outcome = tokio::select! {
                _ = token.cancelled() => Err(SearchError::Cancelled),
                outcome = shared.source.search(&query, &items) => outcome,
            };
            shared.finish(&query, &items, &token, outcome);
        });
    }

    /// Commit a computation's outcome unless it went stale.
    fn finish(
        &self,
        query: &str,
        items: &[String],
        token: &CancellationToken,
        outcome: Result<Vec<String>, SearchError>,
    ) {
        let committed = match outcome {
            Ok(mut results) => {
                let before = results.len();
                results.retain(|r| items.contains(r));
                if results.len() != before {
                    warn!(
                        "search for {:?} returned {} items outside the candidate list",
                        query,
                        before - results.len()
                    );
                }

                self.state.update(|s| {
                    if token.is_cancelled() {
                        return false;
                    }
                    s.set_results(results);
                    s.is_pending = false;
                    true
                })
            }
            Err(SearchError::Cancelled) => {
                trace!("search for {:?} cancelled", query);
                return;
            }
            Err(err) => {
                warn!("search for {:?} failed: {}", query, err);
                self.state.update(|s| {
                    if token.is_cancelled() {
                        return false;
                    }
                    s.is_pending = false;
                    true
                })
            }
        };

        if committed {
            debug!("search for {:?} committed", query);
            self.notify();
        } else {
            trace!("discarding stale outcome for {:?}", query);
        }
    }

    /// Push the current record to observers and wake the event loop.
    fn notify(&self) {
        if self.mounted.is_cancelled() {
            return;
        }

        let snapshot = self.state.get();
        let observers: Vec<Observer> = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();

        for observer in observers {
            observer(&snapshot);
        }

        if let Some(wakeup) = lock(&self.wakeup).as_ref() {
            wakeup.send();
        }
    }
}

/// What triggered a settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Settle {
    /// The quiet period after a keystroke elapsed.
    Debounce,
    /// The candidate list changed under the last settled query.
    Refresh,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
