//! Headless controller for a gooey search box.
//!
//! The widget morphs between a button and an input with a live-filtered
//! result list. This crate holds everything that is not drawing: the
//! collapsed/expanded state machine, the debounced filter pipeline with
//! stale-result suppression, the capability classification that picks a
//! motion set, and a subscribe/notify contract for render layers.

pub mod capability;
pub mod config;
pub mod error;
pub mod filter;
pub mod motion;
pub mod source;
pub mod state;
pub mod wakeup;

mod search;

pub use search::{GooeySearch, Observer, SubscriptionId};

pub mod prelude {
    pub use crate::GooeySearch;
    pub use crate::capability::{Compositing, classify_terminal, classify_user_agent};
    pub use crate::config::SearchConfig;
    pub use crate::error::{MountError, SearchError};
    pub use crate::motion::MotionProfile;
    pub use crate::source::{SearchSource, SimulatedSource};
    pub use crate::state::{Mode, SearchState};
    pub use crate::wakeup::{WakeupReceiver, WakeupSender};
}
