mod service;
pub mod state;

pub use service::{PlaybackCommand, PlaybackEvent, PlaybackHandle, PlaybackService};
pub use state::{
    Countdown, PlaybackMode, PlaybackSnapshot, PlaybackState, Selection, SelectionCause,
};
