//! Atomic layer: capabilities the presentation shell provides to the scroll engine

use super::evaluate::ScrollAnimation;

/// Rendered heights of a viewport and of the content inside it, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub viewport_height: f64,
    pub content_height: f64,
}

impl Dimensions {
    pub fn new(viewport_height: f64, content_height: f64) -> Self {
        Self {
            viewport_height,
            content_height,
        }
    }

    /// Whether the content is taller than the viewport
    pub fn overflows(&self) -> bool {
        self.content_height > self.viewport_height
    }
}

/// Reports the current layout of one slide's viewport
pub trait ContentMeasure {
    /// `None` while the viewport has not been laid out yet
    fn measure(&self) -> Option<Dimensions>;
}

impl<F> ContentMeasure for F
where
    F: Fn() -> Option<Dimensions>,
{
    fn measure(&self) -> Option<Dimensions> {
        self()
    }
}

/// Draws scroll animations onto the slide's content
pub trait ScrollSurface {
    /// Start `animation` from the top, replacing any running one
    fn play(&mut self, animation: &ScrollAnimation);

    /// Stop moving and return the content to the top
    fn stop(&mut self);
}
