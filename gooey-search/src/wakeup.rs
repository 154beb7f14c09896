//! Wakeup channel for passive rendering.
//!
//! A render loop that blocks while idle installs a [`WakeupSender`] on the
//! widget. Every state mutation (a keystroke, a settled query, a finished
//! computation) sends a signal so the loop knows to re-read the record.

use tokio::sync::mpsc;

/// Sender half of the wakeup channel.
///
/// Clone-able, can be moved into async tasks.
#[derive(Debug, Clone)]
pub struct WakeupSender {
    tx: mpsc::Sender<()>,
}

impl WakeupSender {
    /// Send a wakeup signal.
    ///
    /// Non-blocking. Errors are ignored: a full buffer already guarantees a
    /// pending wakeup, a dropped receiver means the loop is gone.
    pub fn send(&self) {
        let _ = self.tx.try_send(());
    }
}

/// Receiver half of the wakeup channel.
#[derive(Debug)]
pub struct WakeupReceiver {
    rx: mpsc::Receiver<()>,
}

impl WakeupReceiver {
    /// Wait for a wakeup signal.
    pub async fn recv(&mut self) -> Option<()> {
        self.rx.recv().await
    }

    /// Drain signals that piled up while the loop was busy.
    ///
    /// Returns true if at least one signal was pending.
    pub fn drain(&mut self) -> bool {
        let mut any = false;
        while self.rx.try_recv().is_ok() {
            any = true;
        }
        any
    }
}

/// Create a new wakeup channel pair.
pub fn channel() -> (WakeupSender, WakeupReceiver) {
    // Small buffer - we just need to wake up, not queue many signals
    let (tx, rx) = mpsc::channel(16);
    (WakeupSender { tx }, WakeupReceiver { rx })
}
