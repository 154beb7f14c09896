use std::time::Duration;

use async_trait::async_trait;

use crate::error::SearchError;
use crate::filter::filter_items;

/// Computes the result list for a settled query.
///
/// The pipeline calls this once per settled, non-empty query and applies the
/// outcome only if no newer query settled in the meantime. Returned items
/// that are not part of `items` are dropped before they reach the state.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use gooey_search::error::SearchError;
/// use gooey_search::source::SearchSource;
///
/// struct PrefixSource;
///
/// #[async_trait]
/// impl SearchSource for PrefixSource {
///     async fn search(&self, query: &str, items: &[String]) -> Result<Vec<String>, SearchError> {
///         let query = query.trim().to_lowercase();
///         Ok(items
///             .iter()
///             .filter(|item| item.to_lowercase().starts_with(&query))
///             .cloned()
///             .collect())
///     }
/// }
/// ```
#[async_trait]
pub trait SearchSource: Send + Sync {
    /// Filter `items` for `query`.
    async fn search(&self, query: &str, items: &[String]) -> Result<Vec<String>, SearchError>;
}

/// The default source: waits a fixed latency, then substring-filters.
///
/// The wait models a remote lookup and is part of the observable behavior
/// (the loading indicator depends on it).
#[derive(Debug, Clone)]
pub struct SimulatedSource {
    latency: Duration,
}

impl SimulatedSource {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for SimulatedSource {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_LATENCY)
    }
}

#[async_trait]
impl SearchSource for SimulatedSource {
    async fn search(&self, query: &str, items: &[String]) -> Result<Vec<String>, SearchError> {
        tokio::time::sleep(self.latency).await;
        Ok(filter_items(query, items))
    }
}
