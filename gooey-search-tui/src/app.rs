//! Demo application state around one mounted widget.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use gooey_search::prelude::*;
use log::{debug, trace};

use crate::events::Action;
use crate::input::InputLine;
use crate::render::HitMap;
use crate::skins;

/// Whether the event loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct DemoApp {
    pub(crate) search: GooeySearch,
    pub(crate) motion: MotionProfile,
    pub(crate) line: InputLine,
    pub(crate) skin: usize,
    /// Last item handed to `on_select`, written by the callback.
    pub(crate) last_pick: Arc<Mutex<Option<String>>>,
    pub(crate) hits: HitMap,
    /// Record as of the last [`sync`](Self::sync).
    pub(crate) seen: SearchState,
    pub(crate) mode_since: Instant,
    pub(crate) results_since: Instant,
    /// Results that just went away and are still animating out.
    pub(crate) leaving: Vec<String>,
    pub(crate) leaving_since: Instant,
}

impl DemoApp {
    pub fn new(search: GooeySearch, last_pick: Arc<Mutex<Option<String>>>) -> Self {
        let motion = search.motion();
        let seen = search.snapshot();
        let now = Instant::now();
        Self {
            search,
            motion,
            line: InputLine::default(),
            skin: 0,
            last_pick,
            hits: HitMap::default(),
            seen,
            mode_since: now,
            results_since: now,
            leaving: Vec::new(),
            leaving_since: now,
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.seen.is_expanded()
    }

    /// Pull the widget record and restart animation clocks for whatever
    /// changed since the previous frame.
    pub fn sync(&mut self, now: Instant) {
        let current = self.search.snapshot();

        if current.mode != self.seen.mode {
            self.mode_since = now;
            if !current.is_expanded() {
                self.line.clear();
            }
        }

        if current.results != self.seen.results {
            if current.results.is_empty() {
                self.leaving = std::mem::take(&mut self.seen.results);
                self.leaving_since = now;
            } else {
                self.leaving.clear();
            }
            self.results_since = now;
        }

        if self.search.take_focus_request() {
            debug!("input focused");
            self.line.clear();
        }

        self.seen = current;
    }

    /// Whether frames are still needed without further events.
    pub fn is_animating(&self, now: Instant) -> bool {
        let motion = &self.motion;
        let morph = motion
            .button
            .duration
            .max(motion.icon.delay + motion.icon.duration);
        let exit = motion.results_exit_delay + motion.results_exit_duration;

        self.seen.is_pending
            || since(self.mode_since, now) < morph
            || since(self.results_since, now) < motion.reveal_duration(self.seen.results.len())
            || (!self.leaving.is_empty() && since(self.leaving_since, now) < exit)
    }

    pub fn handle(&mut self, action: Action) -> Flow {
        trace!("action {:?}", action);
        match action {
            Action::Quit => return Flow::Quit,
            Action::Activate => {
                self.search.activate();
            }
            Action::Dismiss => {
                self.search.dismiss();
            }
            Action::Submit => {
                if !self.search.select_highlighted() {
                    trace!("nothing to select");
                }
            }
            Action::Insert(c) => self.edit(|line| {
                line.insert_char(c);
                true
            }),
            Action::Backspace => self.edit(InputLine::delete_back),
            Action::Delete => self.edit(InputLine::delete_forward),
            Action::Left => self.line.move_cursor(-1),
            Action::Right => self.line.move_cursor(1),
            Action::Home => self.line.move_to_start(),
            Action::End => self.line.move_to_end(),
            Action::Up => {
                self.search.move_cursor(-1);
            }
            Action::Down => {
                self.search.move_cursor(1);
            }
            Action::NextSkin => {
                self.skin = skins::next(self.skin);
                debug!("skin {}", skins::SKINS[self.skin].name);
            }
            Action::ToggleDisabled => {
                self.search.set_disabled(!self.search.is_disabled());
            }
            Action::Click { column, row } => self.click(column, row),
            Action::Resize => {}
        }
        Flow::Continue
    }

    /// Apply a text edit and feed the widget when the text changed.
    fn edit(&mut self, f: impl FnOnce(&mut InputLine) -> bool) {
        if self.search.is_disabled() {
            return;
        }
        if f(&mut self.line) {
            self.search.input(self.line.text.clone());
        }
    }

    fn click(&mut self, column: u16, row: u16) {
        if let Some(item) = self.hits.item_at(column, row) {
            let item = item.to_string();
            self.search.select(&item);
        } else if !self.is_expanded()
            && self.hits.button.is_some_and(|rect| rect.contains(column, row))
        {
            self.search.activate();
        }
    }

    pub fn last_pick(&self) -> Option<String> {
        self.last_pick.lock().ok().and_then(|pick| pick.clone())
    }
}

fn since(start: Instant, now: Instant) -> Duration {
    now.saturating_duration_since(start)
}
