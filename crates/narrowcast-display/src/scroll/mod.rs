//! Auto-scrolling for slides whose content is taller than the screen
//!
//! A slide that overflows its viewport is scrolled from top to bottom after a
//! short reading delay, then measured again and scrolled again for as long as
//! it stays visible.
//!
//! # Layers
//!
//! ## Atomic
//! - `evaluate` - Pure scroll plan computation from two heights
//! - `timing` - Progress and interpolation helpers
//! - `measure` - Measurement and drawing capabilities supplied by the shell
//!
//! ## Molecular
//! - `engine` - Per-slide scroll loop tying the atoms to a timer
//!
//! # Usage
//!
//! ```ignore
//! use narrowcast_display::scroll::VerticalScroll;
//!
//! let mut scroll = VerticalScroll::new(measure, surface, viewport, recheck);
//! scroll.mount(&mut timer);
//!
//! // Whenever the shell's timer reports a fired id
//! scroll.on_timer(id, &mut timer);
//!
//! // Slide leaves the screen
//! scroll.set_visible(false, &mut timer);
//! ```

// Atomic
pub mod evaluate;
pub mod measure;
pub mod timing;

// Molecular
pub mod engine;

pub use engine::VerticalScroll;
pub use evaluate::{empty_space, evaluate, ScrollAnimation, ScrollPlan};
pub use measure::{ContentMeasure, Dimensions, ScrollSurface};
