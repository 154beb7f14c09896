//! Motion variant sets.
//!
//! Distances are in abstract layout units (the web rendering uses CSS pixels,
//! the terminal demo divides by a cell size). Timings are absolute. Which set
//! applies depends on the [`Compositing`] class computed at mount.

use std::time::Duration;

use crate::capability::Compositing;

/// Button morph between the collapsed pill and the expanded input.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonMotion {
    pub collapsed_width: u16,
    pub expanded_width: u16,
    /// Horizontal shift applied when expanded, so the icon blob fits on the right.
    pub expanded_shift: i16,
    pub duration: Duration,
    pub bounce: f32,
}

/// The search/loading icon blob that splits off the expanded input.
#[derive(Debug, Clone, PartialEq)]
pub struct IconMotion {
    pub hidden_offset: i16,
    pub visible_offset: i16,
    pub delay: Duration,
    pub duration: Duration,
}

/// Result items dropping out of the input one after another.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemMotion {
    /// Vertical distance between consecutive items.
    pub offset_step: u16,
    pub initial_scale: f32,
    pub exit_scale: f32,
    /// Vertical lift while an item exits.
    pub exit_lift: i16,
    /// Items start blurred and sharpen while they travel.
    pub blur: bool,
    /// Tighter padding for hosts without the goo filter.
    pub compact: bool,
    /// Delay added per item index on enter.
    pub stagger: Duration,
    pub duration: Duration,
    /// Exit duration per item index.
    pub exit_stagger: Duration,
    /// Extra delay before an item's label fades in.
    pub label_delay: Duration,
    pub bounce: f32,
}

/// Complete motion set for one compositing class.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionProfile {
    pub compositing: Compositing,
    pub button: ButtonMotion,
    pub icon: IconMotion,
    pub items: ItemMotion,
    /// How long the results container lingers before it is removed.
    pub results_exit_delay: Duration,
    pub results_exit_duration: Duration,
}

impl MotionProfile {
    /// Select the variant set for a compositing class.
    pub fn for_compositing(compositing: Compositing) -> Self {
        let fallback = compositing.is_fallback();

        Self {
            compositing,
            button: ButtonMotion {
                collapsed_width: 100,
                expanded_width: 180,
                expanded_shift: -30,
                duration: Duration::from_millis(750),
                bounce: 0.15,
            },
            icon: IconMotion {
                hidden_offset: -50,
                visible_offset: 16,
                delay: Duration::from_millis(100),
                duration: Duration::from_millis(850),
            },
            items: ItemMotion {
                offset_step: 50,
                initial_scale: 0.3,
                exit_scale: 0.8,
                exit_lift: if fallback { 0 } else { -4 },
                blur: !fallback,
                compact: fallback,
                stagger: Duration::from_millis(120),
                duration: Duration::from_millis(750),
                exit_stagger: Duration::from_millis(100),
                label_delay: Duration::from_millis(300),
                bounce: 0.35,
            },
            results_exit_delay: if fallback {
                Duration::from_millis(500)
            } else {
                Duration::from_millis(1250)
            },
            results_exit_duration: Duration::from_millis(500),
        }
    }

    /// Resting vertical offset of the item at `index`.
    pub fn item_offset(&self, index: usize) -> u32 {
        (index as u32 + 1) * self.items.offset_step as u32
    }

    /// Enter delay of the item at `index`.
    pub fn item_delay(&self, index: usize) -> Duration {
        self.items.stagger * index as u32
    }

    /// Delay before the label of the item at `index` fades in.
    pub fn label_delay(&self, index: usize) -> Duration {
        self.item_delay(index) + self.items.label_delay
    }

    /// Exit duration of the item at `index`.
    pub fn item_exit_duration(&self, index: usize) -> Duration {
        self.items.exit_stagger * index as u32
    }

    /// Eased enter progress in `[0, 1]` for the item at `index`, `elapsed`
    /// after the result list appeared.
    pub fn item_progress(&self, index: usize, elapsed: Duration) -> f32 {
        progress(elapsed, self.item_delay(index), self.items.duration)
    }

    /// Whether the label of the item at `index` is visible yet.
    pub fn label_visible(&self, index: usize, elapsed: Duration) -> bool {
        elapsed >= self.label_delay(index)
    }

    /// Eased progress in `[0, 1]` of the button morph.
    pub fn button_progress(&self, elapsed: Duration) -> f32 {
        progress(elapsed, Duration::ZERO, self.button.duration)
    }

    /// Button width `elapsed` after switching towards `expanded`.
    pub fn button_width(&self, expanded: bool, elapsed: Duration) -> f32 {
        let (from, to) = if expanded {
            (self.button.collapsed_width, self.button.expanded_width)
        } else {
            (self.button.expanded_width, self.button.collapsed_width)
        };
        let t = self.button_progress(elapsed);
        from as f32 + (to as f32 - from as f32) * t
    }

    /// Eased progress in `[0, 1]` of the icon blob splitting off.
    pub fn icon_progress(&self, elapsed: Duration) -> f32 {
        progress(elapsed, self.icon.delay, self.icon.duration)
    }

    /// Time until a list of `count` items has fully entered.
    pub fn reveal_duration(&self, count: usize) -> Duration {
        if count == 0 {
            return Duration::ZERO;
        }
        let last = count - 1;
        (self.item_delay(last) + self.items.duration).max(self.label_delay(last))
    }
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self::for_compositing(Compositing::default())
    }
}

/// Quadratic ease-out.
fn ease_out(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

fn progress(elapsed: Duration, delay: Duration, duration: Duration) -> f32 {
    let Some(active) = elapsed.checked_sub(delay) else {
        return 0.0;
    };
    if duration.is_zero() {
        return 1.0;
    }
    let t = (active.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0);
    ease_out(t)
}
