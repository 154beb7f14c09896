//! Rendering capability classification.
//!
//! The merge/split effect needs a compositor that can blur and threshold
//! alpha. Hosts that cannot do that get a flatter motion set. The
//! classification is injected at mount and evaluated exactly once, so nothing
//! here reads the environment on its own.

use serde::{Deserialize, Serialize};

/// Whether the host can render the full gooey effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compositing {
    /// Blur filters and the goo threshold are available.
    #[default]
    Standard,
    /// No filter effects; items animate without blur.
    Fallback,
}

impl Compositing {
    pub fn is_fallback(self) -> bool {
        self == Self::Fallback
    }
}

/// Classify a browser user agent string.
///
/// WebKit engines mishandle the SVG goo filter: desktop and mobile Safari,
/// and Chrome on iOS (which is WebKit underneath).
pub fn classify_user_agent(user_agent: &str) -> Compositing {
    let ua = user_agent.to_lowercase();
    let is_safari = ua.contains("safari")
        && !ua.contains("chrome")
        && !ua.contains("chromium")
        && !ua.contains("android")
        && !ua.contains("firefox");
    let is_chrome_on_ios = ua.contains("crios");

    if is_safari || is_chrome_on_ios {
        Compositing::Fallback
    } else {
        Compositing::Standard
    }
}

/// Classify a terminal from its `TERM` and `COLORTERM` values.
///
/// Truecolor terminals can shade the dim "blur" frames; the Linux console,
/// dumb terminals and unknown hosts get the fallback set.
pub fn classify_terminal(term: Option<&str>, colorterm: Option<&str>) -> Compositing {
    if let Some(colorterm) = colorterm {
        let colorterm = colorterm.to_lowercase();
        if colorterm == "truecolor" || colorterm == "24bit" {
            return Compositing::Standard;
        }
    }

    match term.map(str::to_lowercase) {
        Some(term) if term == "dumb" || term == "linux" => Compositing::Fallback,
        Some(term) if term.contains("256color") || term.contains("direct") => {
            Compositing::Standard
        }
        _ => Compositing::Fallback,
    }
}
