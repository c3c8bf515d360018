//! Molecular layer: per-slide scroll loop
//!
//! Measures the viewport, plays a scroll if the content overflows, and comes
//! back after the scroll (or after a short recheck interval) to measure and
//! decide again. The loop only runs while the slide is both mounted and
//! visible; leaving either state cancels the pending timer on the spot.

use std::time::Duration;

use narrowcast_core::timer::{Timer, TimerId, TimerSlot};
use tracing::{debug, trace};

use super::evaluate::{empty_space, evaluate, ScrollAnimation, ScrollPlan};
use super::measure::{ContentMeasure, Dimensions, ScrollSurface};
use crate::viewport::ViewportConfig;

/// Timer slot used when the shell does not pick one
pub const DEFAULT_SLOT: u32 = 1;

/// Shortest allowed recheck interval
const MIN_RECHECK: Duration = Duration::from_millis(50);

/// Auto-scrolling viewport of one slide
pub struct VerticalScroll<M, S> {
    measure: M,
    surface: S,
    config: ViewportConfig,
    recheck: Duration,
    mounted: bool,
    /// Loop timer; its generation is invalidated on every restart and halt
    slot: TimerSlot,
    /// Heights seen by the latest measurement of the current visible period
    last: Option<Dimensions>,
    /// Animation currently playing on the surface
    current: Option<ScrollAnimation>,
    iteration: u64,
}

impl<M: ContentMeasure, S: ScrollSurface> VerticalScroll<M, S> {
    pub fn new(measure: M, surface: S, config: ViewportConfig, recheck: Duration) -> Self {
        Self {
            measure,
            surface,
            config,
            recheck: recheck.max(MIN_RECHECK),
            mounted: false,
            slot: TimerSlot::new(DEFAULT_SLOT),
            last: None,
            current: None,
            iteration: 0,
        }
    }

    /// Use a specific timer slot, for shells that share one timer between slides
    pub fn with_slot(mut self, slot: u32) -> Self {
        self.slot = TimerSlot::new(slot);
        self
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Whether the loop is allowed to run
    #[inline]
    pub fn is_active(&self) -> bool {
        self.mounted && self.config.visible
    }

    /// Pending loop timer, if any
    pub fn pending_timer(&self) -> Option<TimerId> {
        self.slot.live()
    }

    /// Latest measurement of this visible period
    pub fn dimensions(&self) -> Option<Dimensions> {
        self.last
    }

    pub fn current_animation(&self) -> Option<&ScrollAnimation> {
        self.current.as_ref()
    }

    /// Number of loop iterations completed since creation
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Blank gap to draw below the content, if the empty-space mode applies
    pub fn spacer_height(&self) -> Option<f64> {
        self.last
            .and_then(|d| empty_space(d, self.config.scroll_empty_space))
    }

    /// The slide was attached to the screen
    pub fn mount<T: Timer + ?Sized>(&mut self, timer: &mut T) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        if self.config.visible {
            self.restart(timer);
        }
    }

    /// The slide was detached; nothing may run against it afterwards
    pub fn unmount<T: Timer + ?Sized>(&mut self, timer: &mut T) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.halt(timer);
    }

    /// Show or hide the slide. Every visible period starts with a fresh measurement.
    pub fn set_visible<T: Timer + ?Sized>(&mut self, visible: bool, timer: &mut T) {
        if self.config.visible == visible {
            return;
        }
        self.config.visible = visible;

        if self.is_active() {
            self.restart(timer);
        } else {
            self.halt(timer);
        }
    }

    /// Change the minimum scroll duration; a running loop starts over with it
    pub fn set_timeout<T: Timer + ?Sized>(&mut self, timeout: Option<Duration>, timer: &mut T) {
        if self.config.timeout == timeout {
            return;
        }
        self.config.timeout = timeout;
        if self.is_active() {
            self.restart(timer);
        }
    }

    /// The content inside the viewport changed (e.g. a different number of items)
    pub fn content_changed<T: Timer + ?Sized>(&mut self, timer: &mut T) {
        if self.is_active() {
            self.restart(timer);
        }
    }

    /// Handle a fired timer. Returns true if it belonged to this loop.
    pub fn on_timer<T: Timer + ?Sized>(&mut self, id: TimerId, timer: &mut T) -> bool {
        if !self.slot.accept(id) {
            trace!(generation = id.generation(), "Ignoring stale scroll timer");
            return false;
        }
        if !self.is_active() {
            return false;
        }

        self.iteration += 1;
        self.step(timer);
        true
    }

    fn restart<T: Timer + ?Sized>(&mut self, timer: &mut T) {
        self.last = None;
        self.step(timer);
    }

    /// Measure, play if needed, and arm the next iteration
    fn step<T: Timer + ?Sized>(&mut self, timer: &mut T) {
        let dimensions = self.measure.measure();
        self.last = dimensions;

        let plan = match dimensions {
            Some(d) => evaluate(d.viewport_height, d.content_height, self.config.timeout),
            None => {
                debug!("Viewport not laid out yet, deferring scroll");
                ScrollPlan::Idle
            }
        };

        match plan {
            ScrollPlan::Scroll(animation) => {
                debug!(
                    duration_ms = animation.duration.as_millis() as u64,
                    translate_y = animation.translate_y,
                    "Starting scroll"
                );
                self.surface.play(&animation);
                self.current = Some(animation);
                self.slot.rearm(timer, animation.cycle());
            }
            ScrollPlan::Idle => {
                if self.current.take().is_some() {
                    self.surface.stop();
                }
                self.slot.rearm(timer, self.recheck);
            }
        }
    }

    fn halt<T: Timer + ?Sized>(&mut self, timer: &mut T) {
        self.slot.cancel(timer);
        if self.current.take().is_some() {
            self.surface.stop();
        }
        self.last = None;
    }
}
