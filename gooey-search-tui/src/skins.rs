//! Demo pages. Each one reskins the container around the same widget.

use crossterm::style::Color;

/// Colors and copy for one demo page.
#[derive(Debug, Clone, Copy)]
pub struct Skin {
    pub name: &'static str,
    pub title: &'static str,
    pub tagline: &'static str,
    pub background: Color,
    /// Fill of the button, icon and result blobs.
    pub blob: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
}

pub const SKINS: [Skin; 3] = [
    Skin {
        name: "gray",
        title: "Gooey Search",
        tagline: "A fluid search component with smooth gooey animations",
        background: Color::Rgb {
            r: 229,
            g: 231,
            b: 235,
        },
        blob: Color::Rgb { r: 0, g: 0, b: 0 },
        text: Color::Rgb {
            r: 209,
            g: 213,
            b: 219,
        },
        muted: Color::Rgb {
            r: 107,
            g: 114,
            b: 128,
        },
        accent: Color::Rgb {
            r: 255,
            g: 255,
            b: 255,
        },
    },
    Skin {
        name: "midnight",
        title: "Gooey Search / Midnight",
        tagline: "Same blobs, darker room",
        background: Color::Rgb {
            r: 15,
            g: 23,
            b: 42,
        },
        blob: Color::Rgb {
            r: 30,
            g: 41,
            b: 59,
        },
        text: Color::Rgb {
            r: 226,
            g: 232,
            b: 240,
        },
        muted: Color::Rgb {
            r: 100,
            g: 116,
            b: 139,
        },
        accent: Color::Rgb {
            r: 56,
            g: 189,
            b: 248,
        },
    },
    Skin {
        name: "sunset",
        title: "Gooey Search / Sunset",
        tagline: "Warm container, same search",
        background: Color::Rgb {
            r: 254,
            g: 215,
            b: 170,
        },
        blob: Color::Rgb {
            r: 124,
            g: 45,
            b: 18,
        },
        text: Color::Rgb {
            r: 255,
            g: 237,
            b: 213,
        },
        muted: Color::Rgb {
            r: 154,
            g: 52,
            b: 18,
        },
        accent: Color::Rgb {
            r: 251,
            g: 191,
            b: 36,
        },
    },
];

/// Skin after `index`, wrapping around.
pub fn next(index: usize) -> usize {
    (index + 1) % SKINS.len()
}
