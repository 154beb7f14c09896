//! Tests for the debounced filter pipeline, run against tokio's paused clock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use gooey_search::prelude::*;
use tokio::time::sleep;

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) + Send + Sync + 'static) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    (log, move |value: &str| sink.lock().unwrap().push(value.to_string()))
}

/// Substring source that records every query it is asked for and waits a
/// per-query latency (300ms unless overridden).
#[derive(Clone, Default)]
struct ScriptedSource {
    calls: Arc<Mutex<Vec<String>>>,
    latency: HashMap<String, Duration>,
    failing: Vec<String>,
}

impl ScriptedSource {
    fn with_latency(mut self, query: &str, latency: Duration) -> Self {
        self.latency.insert(query.to_string(), latency);
        self
    }

    fn failing_on(mut self, query: &str) -> Self {
        self.failing.push(query.to_string());
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchSource for ScriptedSource {
    async fn search(&self, query: &str, items: &[String]) -> Result<Vec<String>, SearchError> {
        self.calls.lock().unwrap().push(query.to_string());
        let latency = self.latency.get(query).copied().unwrap_or(ms(300));
        sleep(latency).await;
        if self.failing.iter().any(|q| q == query) {
            return Err(SearchError::failed("lookup unavailable"));
        }
        Ok(gooey_search::filter::filter_items(query, items))
    }
}

fn mount_with(source: ScriptedSource, data: &[&str]) -> GooeySearch {
    let search = GooeySearch::mount(
        SearchConfig::new()
            .data(data.iter().copied())
            .source(source),
    )
    .unwrap();
    search.activate();
    search
}

#[tokio::test(start_paused = true)]
async fn test_settles_after_delay_and_latency() {
    let search = GooeySearch::mount(SearchConfig::new().data(["React", "Vue.js", "Angular"]))
        .unwrap();
    search.activate();
    search.input("an");

    sleep(ms(490)).await;
    assert!(!search.is_pending());
    assert!(search.results().is_empty());

    sleep(ms(20)).await;
    assert!(search.is_pending());
    assert!(search.results().is_empty());

    sleep(ms(300)).await;
    assert!(!search.is_pending());
    assert_eq!(search.results(), vec!["Angular".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_debounce_coalesces_keystrokes() {
    let source = ScriptedSource::default();
    let (searches, on_search) = recorder();
    let search = GooeySearch::mount(
        SearchConfig::new()
            .data(["React", "Vue.js", "Angular"])
            .on_search(on_search)
            .source(source.clone()),
    )
    .unwrap();
    search.activate();

    search.input("re");
    sleep(ms(100)).await;
    search.input("rea");

    // Raw callback fires for every keystroke
    assert_eq!(*searches.lock().unwrap(), vec!["re", "rea"]);
    assert_eq!(search.query(), "rea");

    // "re" would have settled at 500ms
    sleep(ms(450)).await;
    assert!(source.calls().is_empty());
    assert!(!search.is_pending());

    sleep(ms(100)).await;
    assert!(search.is_pending());

    sleep(ms(350)).await;
    assert_eq!(source.calls(), vec!["rea"]);
    assert_eq!(search.results(), vec!["React".to_string()]);
    assert!(!search.is_pending());
}

#[tokio::test(start_paused = true)]
async fn test_burst_produces_single_settle() {
    let source = ScriptedSource::default();
    let search = mount_with(source.clone(), &["Svelte", "SvelteKit", "Vite"]);

    for text in ["s", "sv", "sve", "svel", "svelt"] {
        search.input(text);
        sleep(ms(200)).await;
    }
    sleep(ms(1000)).await;

    assert_eq!(source.calls(), vec!["svelt"]);
    assert_eq!(
        search.results(),
        vec!["Svelte".to_string(), "SvelteKit".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn test_stale_result_is_suppressed() {
    let source = ScriptedSource::default().with_latency("al", ms(1000));
    let search = mount_with(source.clone(), &["alpha", "beta"]);

    // "al" settles at 500 and resolves at 1500
    search.input("al");
    sleep(ms(600)).await;
    assert!(search.is_pending());

    // "be" settles at 1100 and resolves at 1400
    search.input("be");
    sleep(ms(850)).await;
    assert_eq!(search.results(), vec!["beta".to_string()]);
    assert!(!search.is_pending());

    // The older lookup would have landed at 1500
    sleep(ms(500)).await;
    assert_eq!(search.results(), vec!["beta".to_string()]);
    assert_eq!(search.query(), "be");
    assert_eq!(source.calls(), vec!["al", "be"]);
}

#[tokio::test(start_paused = true)]
async fn test_computation_survives_keystroke_until_next_settle() {
    let source = ScriptedSource::default();
    let search = mount_with(source.clone(), &["alpha", "beta"]);

    search.input("a");
    // Settled at 500, resolving at 800; keep typing in between
    sleep(ms(600)).await;
    search.input("al");
    sleep(ms(250)).await;

    // The "a" lookup was not superseded by a settle yet, so it lands
    assert_eq!(
        search.results(),
        vec!["alpha".to_string(), "beta".to_string()]
    );

    sleep(ms(700)).await;
    assert_eq!(search.results(), vec!["alpha".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_no_match_scenario() {
    let search = GooeySearch::mount(SearchConfig::new()).unwrap();
    search.activate();
    search.input("xyz");

    sleep(ms(500 + 300 + 50)).await;
    assert!(search.results().is_empty());
    assert!(!search.is_pending());
    assert_eq!(search.query(), "xyz");
}

#[tokio::test(start_paused = true)]
async fn test_empty_query_short_circuits() {
    let source = ScriptedSource::default();
    let search = mount_with(source.clone(), &["alpha", "beta"]);

    search.input("a");
    sleep(ms(100)).await;
    search.input("");
    assert!(!search.is_pending());

    sleep(ms(1000)).await;
    assert!(source.calls().is_empty());
    assert!(search.results().is_empty());
    assert!(!search.is_pending());
}

#[tokio::test(start_paused = true)]
async fn test_clearing_query_clears_results() {
    let source = ScriptedSource::default();
    let search = mount_with(source.clone(), &["alpha", "beta"]);

    search.input("be");
    sleep(ms(850)).await;
    assert_eq!(search.results(), vec!["beta".to_string()]);

    search.input("");
    assert!(!search.is_pending());
    sleep(ms(510)).await;
    assert!(search.results().is_empty());
    assert!(!search.is_pending());
    assert_eq!(source.calls(), vec!["be"]);
}

#[tokio::test(start_paused = true)]
async fn test_failure_keeps_previous_results() {
    let source = ScriptedSource::default().failing_on("boom");
    let search = mount_with(source.clone(), &["alpha", "boomerang"]);

    search.input("al");
    sleep(ms(850)).await;
    assert_eq!(search.results(), vec!["alpha".to_string()]);

    search.input("boom");
    sleep(ms(550)).await;
    assert!(search.is_pending());

    sleep(ms(300)).await;
    assert!(!search.is_pending());
    assert_eq!(search.results(), vec!["alpha".to_string()]);
    assert_eq!(search.mode(), Mode::Expanded);
}

#[tokio::test(start_paused = true)]
async fn test_selection_fires_once_and_resets() {
    let (selected, on_select) = recorder();
    let search = GooeySearch::mount(
        SearchConfig::new()
            .data(["React", "Vue.js", "Angular"])
            .on_select(on_select),
    )
    .unwrap();
    search.activate();
    search.input("vue");
    sleep(ms(850)).await;
    assert_eq!(search.results(), vec!["Vue.js".to_string()]);

    assert!(search.select("Vue.js"));
    assert!(!search.select("Vue.js"));
    assert_eq!(*selected.lock().unwrap(), vec!["Vue.js"]);

    let state = search.snapshot();
    assert_eq!(state.mode, Mode::Collapsed);
    assert!(state.query.is_empty());
    assert!(state.results.is_empty());
    assert!(!state.is_pending);
}

#[tokio::test(start_paused = true)]
async fn test_keyboard_selection() {
    let (selected, on_select) = recorder();
    let search = GooeySearch::mount(
        SearchConfig::new()
            .data(["Next.js", "Nuxt.js", "Vue.js"])
            .on_select(on_select),
    )
    .unwrap();
    search.activate();
    search.input(".js");
    sleep(ms(850)).await;
    assert_eq!(search.results().len(), 3);
    assert_eq!(search.snapshot().highlighted(), Some("Next.js"));

    assert!(search.move_cursor(1));
    assert!(search.move_cursor(5));
    assert_eq!(search.snapshot().cursor, 2);
    assert!(!search.move_cursor(1));
    assert!(search.move_cursor(-1));
    assert_eq!(search.snapshot().highlighted(), Some("Nuxt.js"));

    assert!(search.select_highlighted());
    assert_eq!(*selected.lock().unwrap(), vec!["Nuxt.js"]);
}

#[tokio::test(start_paused = true)]
async fn test_select_index() {
    let (selected, on_select) = recorder();
    let search = GooeySearch::mount(
        SearchConfig::new()
            .data(["Gatsby", "Angular", "Astro"])
            .on_select(on_select),
    )
    .unwrap();
    search.activate();
    search.input("a");
    sleep(ms(850)).await;

    assert!(!search.select_index(10));
    assert!(search.select_index(1));
    assert_eq!(*selected.lock().unwrap(), vec!["Angular"]);
}

#[tokio::test(start_paused = true)]
async fn test_collapse_discards_in_flight_work() {
    let source = ScriptedSource::default();
    let search = mount_with(source.clone(), &["alpha", "beta"]);

    search.input("al");
    sleep(ms(600)).await;
    assert!(search.is_pending());

    search.dismiss();
    search.activate();
    sleep(ms(1000)).await;

    let state = search.snapshot();
    assert!(state.results.is_empty());
    assert!(!state.is_pending);
    assert!(state.query.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_collapse_cancels_pending_timer() {
    let source = ScriptedSource::default();
    let search = mount_with(source.clone(), &["alpha", "beta"]);

    search.input("al");
    sleep(ms(100)).await;
    search.dismiss();
    search.activate();
    sleep(ms(1000)).await;

    assert!(source.calls().is_empty());
    assert!(!search.is_pending());
}

#[tokio::test(start_paused = true)]
async fn test_unmount_stops_all_mutation() {
    let source = ScriptedSource::default();
    let search = mount_with(source.clone(), &["alpha", "beta"]);
    let changes = Arc::new(Mutex::new(0usize));
    let sink = Arc::clone(&changes);
    search.subscribe(move |_| *sink.lock().unwrap() += 1);

    search.input("al");
    sleep(ms(600)).await;
    assert!(search.is_pending());
    let before = search.snapshot();
    let notified = *changes.lock().unwrap();

    search.unmount();
    search.input("alp");
    sleep(ms(2000)).await;

    assert_eq!(search.snapshot(), before);
    assert_eq!(*changes.lock().unwrap(), notified);
}

#[tokio::test(start_paused = true)]
async fn test_unmount_before_settle() {
    let source = ScriptedSource::default();
    let search = mount_with(source.clone(), &["alpha"]);
    search.input("al");
    drop(search);

    sleep(ms(2000)).await;
    assert!(source.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_set_data_recomputes_settled_query() {
    let source = ScriptedSource::default();
    let search = mount_with(source.clone(), &["React", "Vue.js"]);

    search.input("re");
    sleep(ms(850)).await;
    assert_eq!(search.results(), vec!["React".to_string()]);

    search.set_data(["Redux", "Preact", "Vue"]);
    // "React" is gone from the list, so it is gone from the results
    assert!(search.results().is_empty());
    assert!(search.is_pending());

    sleep(ms(350)).await;
    assert_eq!(
        search.results(),
        vec!["Redux".to_string(), "Preact".to_string()]
    );
    assert_eq!(source.calls(), vec!["re", "re"]);
}

#[tokio::test(start_paused = true)]
async fn test_set_data_after_clearing_input_stays_idle() {
    let source = ScriptedSource::default();
    let search = mount_with(source.clone(), &["React", "Vue.js"]);

    search.input("re");
    sleep(ms(850)).await;
    assert_eq!(search.results(), vec!["React".to_string()]);

    search.input("");
    search.set_data(["React", "Redux"]);
    assert_eq!(search.query(), "");
    assert!(!search.is_pending());

    // The cleared input settles on its own and empties the list
    sleep(ms(600)).await;
    assert!(!search.is_pending());
    assert!(search.results().is_empty());
    assert_eq!(source.calls(), vec!["re"]);
}

#[tokio::test(start_paused = true)]
async fn test_set_data_without_query_does_not_search() {
    let source = ScriptedSource::default();
    let search = mount_with(source.clone(), &["React"]);
    search.set_data(["Solid"]);
    sleep(ms(1000)).await;
    assert!(source.calls().is_empty());
    assert_eq!(search.items(), vec!["Solid".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_results_stay_within_candidates() {
    struct Inventing;

    #[async_trait]
    impl SearchSource for Inventing {
        async fn search(&self, _query: &str, items: &[String]) -> Result<Vec<String>, SearchError> {
            let mut results = items.to_vec();
            results.push("Not a candidate".to_string());
            Ok(results)
        }
    }

    let search = GooeySearch::mount(
        SearchConfig::new()
            .data(["Turbo", "Remix"])
            .source(Inventing),
    )
    .unwrap();
    search.activate();
    search.input("x");
    sleep(ms(600)).await;

    assert_eq!(
        search.results(),
        vec!["Turbo".to_string(), "Remix".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn test_custom_delay() {
    let source = ScriptedSource::default();
    let search = GooeySearch::mount(
        SearchConfig::new()
            .data(["Rollup"])
            .search_delay(ms(50))
            .source(source.clone()),
    )
    .unwrap();
    search.activate();
    search.input("roll");

    sleep(ms(60)).await;
    assert!(search.is_pending());
    assert_eq!(source.calls(), vec!["roll"]);
}

#[tokio::test(start_paused = true)]
async fn test_zero_latency_default_source() {
    let search = GooeySearch::mount(
        SearchConfig::new()
            .data(["ESBuild", "Webpack"])
            .latency_millis(-5),
    )
    .unwrap();
    search.activate();
    search.input("build");

    sleep(ms(510)).await;
    assert_eq!(search.results(), vec!["ESBuild".to_string()]);
    assert!(!search.is_pending());
}

#[tokio::test(start_paused = true)]
async fn test_observer_sees_pending_then_results() {
    let search = GooeySearch::mount(SearchConfig::new().data(["Astro"])).unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    search.subscribe(move |state| {
        sink.lock()
            .unwrap()
            .push((state.is_pending, state.results.len()))
    });

    search.activate();
    search.input("as");
    sleep(ms(900)).await;

    let seen = seen.lock().unwrap().clone();
    // activate, keystroke, settle, commit
    assert_eq!(seen, vec![(false, 0), (false, 0), (true, 0), (false, 1)]);
}
