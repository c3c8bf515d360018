//! Atomic layer: decide whether and how a viewport scrolls
//!
//! Pure functions of plain numbers so they can be tested without anything on
//! screen.

use std::time::Duration;

use super::measure::Dimensions;
use super::timing::{lerp, progress};

/// Scroll time for content one viewport height taller than the viewport
pub const MS_PER_VIEWPORT: f64 = 12_000.0;

/// Reading time before the content starts moving
pub const INITIAL_DELAY: Duration = Duration::from_millis(4_000);

/// Longest scroll the engine will play; larger computed durations are capped
pub const MAX_DURATION: Duration = Duration::from_secs(u32::MAX as u64);

/// Blank gap below short content is the viewport height divided by this
pub const EMPTY_SPACE_DIVISOR: f64 = 3.0;

/// One top-to-bottom scroll of a viewport's content
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    /// Time spent moving
    pub duration: Duration,
    /// Time spent at the top before moving
    pub initial_delay: Duration,
    /// Final vertical offset in pixels (negative: content moves up)
    pub translate_y: f64,
}

impl ScrollAnimation {
    /// Delay plus movement; the loop re-measures after this long
    pub fn cycle(&self) -> Duration {
        self.initial_delay + self.duration
    }

    /// Vertical offset `elapsed` after the animation was started.
    ///
    /// Zero while waiting, linear towards `translate_y` while moving, and back
    /// to zero once finished (the animation does not hold its end state).
    pub fn offset_at(&self, elapsed: Duration) -> f64 {
        if elapsed < self.initial_delay || elapsed >= self.cycle() {
            return 0.0;
        }
        let t = progress(elapsed - self.initial_delay, self.duration);
        lerp(0.0, self.translate_y, t)
    }
}

/// Outcome of [`evaluate`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollPlan {
    /// Content fits; nothing to animate
    Idle,
    Scroll(ScrollAnimation),
}

impl ScrollPlan {
    pub fn animation(&self) -> Option<&ScrollAnimation> {
        match self {
            ScrollPlan::Idle => None,
            ScrollPlan::Scroll(animation) => Some(animation),
        }
    }
}

/// Compute the scroll for a viewport of `viewport_height` pixels showing
/// `content_height` pixels of content.
///
/// The content moves at one viewport height per 12 seconds. `min_duration`
/// stretches short scrolls so the movement never takes less than that.
/// Durations are capped at [`MAX_DURATION`].
pub fn evaluate(
    viewport_height: f64,
    content_height: f64,
    min_duration: Option<Duration>,
) -> ScrollPlan {
    if !viewport_height.is_finite() || viewport_height <= 0.0 || !content_height.is_finite() {
        return ScrollPlan::Idle;
    }
    if content_height <= viewport_height {
        return ScrollPlan::Idle;
    }

    let delta = content_height - viewport_height;
    let ratio = delta / viewport_height;
    let natural_ms = ratio * MS_PER_VIEWPORT;
    let duration_ms = match min_duration {
        Some(min) => natural_ms.max(min.as_secs_f64() * 1000.0),
        None => natural_ms,
    };
    let duration = Duration::try_from_secs_f64(duration_ms / 1000.0)
        .map_or(MAX_DURATION, |d| d.min(MAX_DURATION));

    ScrollPlan::Scroll(ScrollAnimation {
        duration,
        initial_delay: INITIAL_DELAY,
        translate_y: -delta,
    })
}

/// Height of the blank gap reserved below the content, if any.
///
/// Only short content gets a gap, and only when the mode is enabled. The gap
/// is never part of the measured content, so it does not change [`evaluate`].
pub fn empty_space(dimensions: Dimensions, enabled: bool) -> Option<f64> {
    if enabled && dimensions.content_height < dimensions.viewport_height {
        Some(dimensions.viewport_height / EMPTY_SPACE_DIVISOR)
    } else {
        None
    }
}
