pub mod scroll;
pub mod viewport;

pub use scroll::{evaluate, ScrollAnimation, ScrollPlan, VerticalScroll};
pub use viewport::{ScrollConfigExt, ViewportConfig};
