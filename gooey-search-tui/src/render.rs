//! Frame drawing with queued crossterm commands.
//!
//! Motion distances are layout units; one terminal column is [`COLUMN_UNITS`]
//! wide and one row is [`ROW_UNITS`] tall. Blobs are drawn back to front so
//! the button covers items and the icon while they are still tucked under it.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::DemoApp;
use crate::skins::{SKINS, Skin};

pub const COLUMN_UNITS: f32 = 5.0;
pub const ROW_UNITS: f32 = 25.0;

const BUTTON_HEIGHT: i32 = 3;
const ICON_WIDTH: i32 = 5;
const SEARCH_ICON: &str = "⌕";
const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];
const SPINNER_FRAME: Duration = Duration::from_millis(120);

/// Screen rectangle in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn contains(&self, column: u16, row: u16) -> bool {
        let (column, row) = (i32::from(column), i32::from(row));
        column >= self.x
            && column < self.x + self.width
            && row >= self.y
            && row < self.y + self.height
    }
}

/// Clickable areas of the last frame.
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    pub button: Option<Rect>,
    pub items: Vec<(Rect, String)>,
}

impl HitMap {
    /// Item under a click. Later items are drawn on top.
    pub fn item_at(&self, column: u16, row: u16) -> Option<&str> {
        self.items
            .iter()
            .rev()
            .find(|(rect, _)| rect.contains(column, row))
            .map(|(_, item)| item.as_str())
    }
}

/// Clipping canvas over a writer.
struct Canvas<'a, W: Write> {
    out: &'a mut W,
    width: i32,
    height: i32,
}

impl<W: Write> Canvas<'_, W> {
    fn fill(&mut self, rect: Rect, color: Color) -> io::Result<()> {
        let blank = " ".repeat(rect.width.max(0) as usize);
        for row in rect.y..rect.y + rect.height {
            self.text(rect.x, row, &blank, color, color, &[])?;
        }
        Ok(())
    }

    fn text(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        fg: Color,
        bg: Color,
        attributes: &[Attribute],
    ) -> io::Result<()> {
        if y < 0 || y >= self.height || x >= self.width {
            return Ok(());
        }

        let skip = (-x).max(0) as usize;
        let room = (self.width - x.max(0)) as usize;
        let visible = clip(text, skip, room);
        if visible.is_empty() {
            return Ok(());
        }

        queue!(
            self.out,
            MoveTo(x.max(0) as u16, y as u16),
            SetForegroundColor(fg),
            SetBackgroundColor(bg)
        )?;
        for attribute in attributes {
            queue!(self.out, SetAttribute(*attribute))?;
        }
        queue!(self.out, Print(visible), SetAttribute(Attribute::Reset), ResetColor)?;
        Ok(())
    }

    fn centered(
        &mut self,
        y: i32,
        text: &str,
        fg: Color,
        bg: Color,
        attributes: &[Attribute],
    ) -> io::Result<()> {
        let x = (self.width - text.width() as i32) / 2;
        self.text(x, y, text, fg, bg, attributes)
    }
}

/// Draw one frame and return its clickable areas.
pub fn draw<W: Write>(out: &mut W, app: &DemoApp, size: (u16, u16), now: Instant) -> io::Result<HitMap> {
    let skin = &SKINS[app.skin];
    let mut canvas = Canvas {
        out,
        width: i32::from(size.0),
        height: i32::from(size.1),
    };
    let mut hits = HitMap::default();

    canvas.fill(
        Rect {
            x: 0,
            y: 0,
            width: canvas.width,
            height: canvas.height,
        },
        skin.background,
    )?;

    canvas.centered(1, skin.title, skin.blob, skin.background, &[Attribute::Bold])?;
    canvas.centered(2, skin.tagline, skin.muted, skin.background, &[])?;

    let motion = &app.motion;
    let expanded = app.seen.is_expanded();
    let morph = now.saturating_duration_since(app.mode_since);
    let t = motion.button_progress(morph);

    let center = canvas.width / 2;
    let anchor = (canvas.height / 4).max(5);
    let button_width = to_columns(motion.button_width(expanded, morph));
    let shift_progress = if expanded { t } else { 1.0 - t };
    let shift = to_columns(f32::from(motion.button.expanded_shift) * shift_progress);
    let button = Rect {
        x: center - button_width / 2 + shift,
        y: anchor - BUTTON_HEIGHT / 2,
        width: button_width,
        height: BUTTON_HEIGHT,
    };

    draw_results(&mut canvas, app, skin, center, anchor, now, &mut hits)?;

    if expanded {
        let icon_t = motion.icon_progress(morph);
        let offset = lerp(
            f32::from(motion.icon.hidden_offset),
            f32::from(motion.icon.visible_offset),
            icon_t,
        );
        let icon = Rect {
            x: button.x + button.width + to_columns(offset),
            y: button.y,
            width: ICON_WIDTH,
            height: BUTTON_HEIGHT,
        };
        canvas.fill(icon, skin.blob)?;
        let glyph = if app.seen.is_pending {
            let frame = (now.saturating_duration_since(app.results_since).as_millis()
                / SPINNER_FRAME.as_millis()) as usize;
            SPINNER[frame % SPINNER.len()]
        } else {
            SEARCH_ICON
        };
        canvas.text(icon.x + ICON_WIDTH / 2, anchor, glyph, skin.text, skin.blob, &[])?;
    }

    canvas.fill(button, skin.blob)?;
    hits.button = Some(button);
    draw_button_content(&mut canvas, app, skin, button, anchor)?;

    draw_footer(&mut canvas, app, skin)?;

    canvas.out.flush()?;
    Ok(hits)
}

fn draw_button_content<W: Write>(
    canvas: &mut Canvas<'_, W>,
    app: &DemoApp,
    skin: &Skin,
    button: Rect,
    anchor: i32,
) -> io::Result<()> {
    let disabled = app.search.is_disabled();
    let fg = if disabled { skin.muted } else { skin.text };

    if !app.seen.is_expanded() {
        let label = if disabled { "Disabled" } else { "Search" };
        let x = button.x + (button.width - label.width() as i32) / 2;
        return canvas.text(x, anchor, label, fg, skin.blob, &[]);
    }

    let field_x = button.x + 2;
    let field_width = (button.width - 4).max(0) as usize;

    if app.line.text.is_empty() {
        canvas.text(field_x, anchor, app.search.placeholder(), skin.muted, skin.blob, &[])?;
        if !disabled {
            canvas.text(field_x, anchor, " ", skin.text, skin.blob, &[Attribute::Reverse])?;
        }
        return Ok(());
    }

    // Keep the cursor in view by scrolling the text to its tail
    let before: String = app.line.text.chars().take(app.line.cursor).collect();
    let scroll = (before.width() + 1).saturating_sub(field_width);
    let shown = clip(&app.line.text, scroll, field_width);
    canvas.text(field_x, anchor, &shown, fg, skin.blob, &[])?;

    if !disabled {
        let cursor_x = field_x + before.width().saturating_sub(scroll) as i32;
        let under = app
            .line
            .text
            .chars()
            .nth(app.line.cursor)
            .map(String::from)
            .unwrap_or_else(|| " ".to_string());
        canvas.text(cursor_x, anchor, &under, skin.text, skin.blob, &[Attribute::Reverse])?;
    }
    Ok(())
}

fn draw_results<W: Write>(
    canvas: &mut Canvas<'_, W>,
    app: &DemoApp,
    skin: &Skin,
    center: i32,
    anchor: i32,
    now: Instant,
    hits: &mut HitMap,
) -> io::Result<()> {
    let motion = &app.motion;
    let full_width = to_columns(f32::from(motion.button.expanded_width));
    let shift = to_columns(f32::from(motion.button.expanded_shift));
    let padding = if motion.items.compact { 1 } else { 2 };

    if app.seen.results.is_empty() {
        // Departing items hold their place, then shrink away
        let elapsed = now.saturating_duration_since(app.leaving_since);
        let Some(exiting) = elapsed.checked_sub(motion.results_exit_delay) else {
            return draw_leaving(canvas, app, skin, center + shift, anchor, full_width, 1.0);
        };
        if exiting >= motion.results_exit_duration {
            return Ok(());
        }
        let t = exiting.as_secs_f32() / motion.results_exit_duration.as_secs_f32();
        let scale = lerp(1.0, motion.items.exit_scale, t);
        return draw_leaving(canvas, app, skin, center + shift, anchor, full_width, scale);
    }

    let elapsed = now.saturating_duration_since(app.results_since);
    let highlighted = app.seen.cursor;

    for (index, item) in app.seen.results.iter().enumerate() {
        let p = motion.item_progress(index, elapsed);
        if p <= 0.0 {
            continue;
        }

        let width = to_columns(f32::from(motion.button.expanded_width) * lerp(motion.items.initial_scale, 1.0, p));
        let y = anchor + (motion.item_offset(index) as f32 * p / ROW_UNITS).round() as i32;
        let rect = Rect {
            x: center + shift - width / 2,
            y,
            width,
            height: 1,
        };
        canvas.fill(rect, skin.blob)?;
        hits.items.push((rect, item.clone()));

        if !motion.label_visible(index, elapsed) {
            continue;
        }

        let mut attributes = Vec::new();
        let fg = if index == highlighted {
            attributes.push(Attribute::Bold);
            skin.accent
        } else {
            skin.text
        };
        if motion.items.blur && p < 1.0 {
            attributes.push(Attribute::Dim);
        }
        let room = (width - 2 * padding).max(0) as usize;
        let label = clip(item, 0, room);
        canvas.text(rect.x + padding, y, &label, fg, skin.blob, &attributes)?;
    }
    Ok(())
}

fn draw_leaving<W: Write>(
    canvas: &mut Canvas<'_, W>,
    app: &DemoApp,
    skin: &Skin,
    center: i32,
    anchor: i32,
    full_width: i32,
    scale: f32,
) -> io::Result<()> {
    let motion = &app.motion;
    let lift = (f32::from(motion.items.exit_lift) * (1.0 - scale) / ROW_UNITS).round() as i32;
    for (index, item) in app.leaving.iter().enumerate() {
        let width = (full_width as f32 * scale).round() as i32;
        let y = anchor + (motion.item_offset(index) as f32 / ROW_UNITS).round() as i32 + lift;
        let rect = Rect {
            x: center - width / 2,
            y,
            width,
            height: 1,
        };
        canvas.fill(rect, skin.blob)?;
        let label = clip(item, 0, (width - 2).max(0) as usize);
        canvas.text(rect.x + 1, y, &label, skin.muted, skin.blob, &[Attribute::Dim])?;
    }
    Ok(())
}

fn draw_footer<W: Write>(canvas: &mut Canvas<'_, W>, app: &DemoApp, skin: &Skin) -> io::Result<()> {
    let help = if app.seen.is_expanded() {
        "type to search  ↑/↓ move  Enter pick  Esc close  Tab skin  Ctrl+D disable  Ctrl+Q quit"
    } else {
        "Enter/Space open  Tab skin  Ctrl+D disable  q quit"
    };
    let status = format!(
        "skin: {}  compositing: {:?}  last pick: {}",
        skin.name,
        app.search.compositing(),
        app.last_pick().as_deref().unwrap_or("-")
    );
    let bottom = canvas.height - 1;
    canvas.centered(bottom - 1, help, skin.muted, skin.background, &[])?;
    canvas.centered(bottom, &status, skin.muted, skin.background, &[])
}

fn to_columns(units: f32) -> i32 {
    (units / COLUMN_UNITS).round() as i32
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Drop `skip` columns from the front of `text`, then keep at most `room`
/// columns. Wide characters that straddle either edge are dropped.
fn clip(text: &str, skip: usize, room: usize) -> String {
    let mut column = 0;
    let mut out = String::new();
    for c in text.chars() {
        let width = c.width().unwrap_or(0);
        let start = column;
        column += width;
        if start < skip {
            continue;
        }
        if column - skip > room {
            break;
        }
        out.push(c);
    }
    out
}
