//! Widget configuration.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::warn;

use crate::capability::Compositing;
use crate::source::SearchSource;

/// Quiet period a query must survive before it settles.
pub const DEFAULT_SEARCH_DELAY: Duration = Duration::from_millis(500);

/// Simulated lookup latency of the default source.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(300);

pub const DEFAULT_PLACEHOLDER: &str = "Type to search...";

/// Candidates used when the embedder does not supply any.
pub const DEFAULT_ITEMS: [&str; 12] = [
    "React",
    "Vue",
    "Svelte",
    "Next.js",
    "Nuxt.js",
    "Gatsby",
    "Angular",
    "TypeScript",
    "JavaScript",
    "Tailwind CSS",
    "Framer Motion",
    "Eldora UI",
];

/// Callback receiving a query or a chosen item.
pub type Callback = Arc<dyn Fn(&str) + Send + Sync>;

/// Produces the compositing class. Called once, at mount.
pub type Classifier = Box<dyn FnOnce() -> Compositing + Send>;

/// Configuration for one mounted search widget.
///
/// # Example
///
/// ```ignore
/// let config = SearchConfig::new()
///     .data(["React", "Vue.js", "Angular"])
///     .placeholder("Search frameworks...")
///     .on_search(|query| log::info!("Searching for: {}", query))
///     .on_select(|item| log::info!("Selected: {}", item));
/// let search = GooeySearch::mount(config)?;
/// ```
pub struct SearchConfig {
    /// Candidates to filter, in display order.
    pub items: Vec<String>,

    /// Text shown while the input is empty.
    pub placeholder: String,

    /// Called with the raw text on every keystroke, before debouncing.
    pub on_search: Option<Callback>,

    /// Called once per successful pick.
    pub on_select: Option<Callback>,

    /// Suppress every transition while set.
    pub disabled: bool,

    /// Debounce quiet period.
    pub search_delay: Duration,

    /// Latency of the default [`SimulatedSource`](crate::source::SimulatedSource).
    /// Ignored when a custom source is set.
    pub latency: Duration,

    /// Capability classifier (None = [`Compositing::Standard`]).
    pub compositing: Option<Classifier>,

    /// Custom lookup (None = simulated latency + substring filter).
    pub source: Option<Arc<dyn SearchSource>>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            items: DEFAULT_ITEMS.iter().map(|s| s.to_string()).collect(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            on_search: None,
            on_select: None,
            disabled: false,
            search_delay: DEFAULT_SEARCH_DELAY,
            latency: DEFAULT_LATENCY,
            compositing: None,
            source: None,
        }
    }
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the candidate list.
    pub fn data<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }

    /// Set the placeholder text.
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Set the raw keystroke callback.
    pub fn on_search<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_search = Some(Arc::new(f));
        self
    }

    /// Set the selection callback.
    pub fn on_select<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_select = Some(Arc::new(f));
        self
    }

    /// Mount the widget disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Set the debounce quiet period.
    pub fn search_delay(mut self, delay: Duration) -> Self {
        self.search_delay = delay;
        self
    }

    /// Set the debounce quiet period in milliseconds. Negative values are
    /// clamped to zero (settle on the next timer tick).
    pub fn search_delay_millis(self, millis: i64) -> Self {
        let delay = clamp_millis("search_delay", millis);
        self.search_delay(delay)
    }

    /// Set the simulated lookup latency.
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Set the simulated lookup latency in milliseconds, clamping negatives
    /// to zero.
    pub fn latency_millis(self, millis: i64) -> Self {
        let latency = clamp_millis("latency", millis);
        self.latency(latency)
    }

    /// Inject the capability classifier.
    pub fn compositing<F>(mut self, classify: F) -> Self
    where
        F: FnOnce() -> Compositing + Send + 'static,
    {
        self.compositing = Some(Box::new(classify));
        self
    }

    /// Replace the default lookup.
    pub fn source(mut self, source: impl SearchSource + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("items", &self.items)
            .field("placeholder", &self.placeholder)
            .field("on_search", &self.on_search.is_some())
            .field("on_select", &self.on_select.is_some())
            .field("disabled", &self.disabled)
            .field("search_delay", &self.search_delay)
            .field("latency", &self.latency)
            .field("compositing", &self.compositing.is_some())
            .field("source", &self.source.is_some())
            .finish()
    }
}

fn clamp_millis(name: &str, millis: i64) -> Duration {
    if millis < 0 {
        warn!("{} of {}ms is negative, clamping to 0", name, millis);
        return Duration::ZERO;
    }
    Duration::from_millis(millis as u64)
}
