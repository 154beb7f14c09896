//! Terminal setup and teardown with panic safety.

use std::io::{self, Stdout, Write};
use std::panic;

use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};

/// Raw-mode alternate screen that restores the terminal when dropped.
pub struct TerminalGuard {
    stdout: Stdout,
}

impl TerminalGuard {
    /// Initialize the terminal for TUI rendering.
    pub fn new() -> io::Result<Self> {
        // Set up panic hook to restore terminal on panic
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = restore_terminal();
            original_hook(panic_info);
        }));

        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;

        Ok(Self { stdout })
    }

    /// Writer for queued drawing commands. Call [`flush`](Self::flush) once
    /// a frame is complete.
    pub fn out(&mut self) -> &mut Stdout {
        &mut self.stdout
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }

    /// Terminal size as (columns, rows).
    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

/// Restore the terminal to its original state.
fn restore_terminal() -> io::Result<()> {
    terminal::disable_raw_mode()?;
    execute!(
        io::stdout(),
        cursor::Show,
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    Ok(())
}
