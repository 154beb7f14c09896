//! Event loop: terminal input, widget wakeups and animation ticks.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::EventStream;
use futures::StreamExt;
use gooey_search::error::MountError;
use gooey_search::wakeup;
use log::{debug, error, info, trace};
use tokio::time::MissedTickBehavior;

use crate::app::{DemoApp, Flow};
use crate::events::convert_event;
use crate::render;
use crate::terminal::TerminalGuard;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("Terminal error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to mount search widget: {0}")]
    Mount(#[from] MountError),
}

/// Run the demo until the user quits or the terminal closes.
pub async fn run(mut app: DemoApp) -> Result<(), RuntimeError> {
    let mut terminal = TerminalGuard::new()?;

    let (wakeup_tx, mut wakeup_rx) = wakeup::channel();
    app.search.install_wakeup(wakeup_tx);

    let mut events = EventStream::new();
    let mut frames = tokio::time::interval(FRAME_INTERVAL);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut force_render = true;
    info!("Event loop started");

    loop {
        let now = Instant::now();
        app.sync(now);

        let animating = app.is_animating(now);
        if force_render || animating || app.search.is_dirty() {
            app.search.clear_dirty();
            let size = terminal.size()?;
            app.hits = render::draw(terminal.out(), &app, size, now)?;
            terminal.flush()?;
            force_render = false;
        }

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(event)) => {
                    trace!("Crossterm event: {:?}", event);
                    if let Some(action) = convert_event(event, app.is_expanded()) {
                        if app.handle(action) == Flow::Quit {
                            break;
                        }
                        force_render = true;
                    }
                }
                Some(Err(e)) => {
                    error!("Event stream error: {}", e);
                    return Err(e.into());
                }
                None => {
                    debug!("Event stream closed");
                    break;
                }
            },

            Some(()) = wakeup_rx.recv() => {
                // Multiple wakeups collapse into a single render
                wakeup_rx.drain();
                force_render = true;
            }

            _ = frames.tick(), if animating => {}
        }
    }

    info!("Event loop stopped");
    app.search.unmount();
    Ok(())
}
