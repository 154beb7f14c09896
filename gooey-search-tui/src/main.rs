mod app;
mod events;
mod input;
mod render;
mod runtime;
mod skins;
mod terminal;

use std::env;
use std::fs::File;
use std::sync::{Arc, Mutex};

use gooey_search::prelude::*;
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::app::DemoApp;
use crate::runtime::RuntimeError;

const FRAMEWORKS: [&str; 20] = [
    "React",
    "Vue.js",
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
    "Vite",
    "Webpack",
    "Rollup",
    "ESBuild",
    "Turbo",
    "Remix",
    "Astro",
    "SvelteKit",
];

#[tokio::main]
async fn main() {
    match File::create("gooey-search-tui.log") {
        Ok(log_file) => {
            if let Err(e) = WriteLogger::init(LevelFilter::Debug, Config::default(), log_file) {
                eprintln!("Failed to initialize logger: {}", e);
            }
        }
        Err(e) => eprintln!("Failed to create log file: {}", e),
    }

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
    }
}

async fn run() -> Result<(), RuntimeError> {
    let last_pick = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&last_pick);

    let term = env::var("TERM").ok();
    let colorterm = env::var("COLORTERM").ok();

    let config = SearchConfig::new()
        .data(FRAMEWORKS)
        .placeholder("Search frameworks...")
        .on_search(|query| info!("Searching for: {}", query))
        .on_select(move |item| {
            info!("Selected: {}", item);
            if let Ok(mut pick) = sink.lock() {
                *pick = Some(item.to_string());
            }
        })
        .compositing(move || classify_terminal(term.as_deref(), colorterm.as_deref()));

    let search = GooeySearch::mount(config)?;
    runtime::run(DemoApp::new(search, last_pick)).await
}
