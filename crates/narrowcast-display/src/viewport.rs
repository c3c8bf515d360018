//! Per-slide viewport settings

use std::time::Duration;

// Re-export config types from core
pub use narrowcast_core::{Poster, ScrollConfig};

/// Settings of one slide's scrolling viewport
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewportConfig {
    /// The scroll loop only runs while the slide is visible
    pub visible: bool,
    /// Minimum scroll duration hint
    pub timeout: Option<Duration>,
    /// Keep a blank gap below content shorter than the viewport
    pub scroll_empty_space: bool,
}

impl ViewportConfig {
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_empty_space(mut self, enabled: bool) -> Self {
        self.scroll_empty_space = enabled;
        self
    }
}

/// Extension trait for ScrollConfig with viewport helpers
pub trait ScrollConfigExt {
    /// Viewport settings for showing `poster`
    fn viewport_for(&self, poster: &Poster, visible: bool) -> ViewportConfig;
}

impl ScrollConfigExt for ScrollConfig {
    fn viewport_for(&self, poster: &Poster, visible: bool) -> ViewportConfig {
        let timeout = if self.use_poster_timeout {
            poster.advance_after()
        } else {
            None
        };

        ViewportConfig {
            visible,
            timeout,
            scroll_empty_space: self.scroll_empty_space,
        }
    }
}
