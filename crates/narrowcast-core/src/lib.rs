pub mod config;
pub mod error;
pub mod playback;
pub mod poster;
pub mod source;
pub mod timer;

pub use config::{AppConfig, PlaybackConfig, ScrollConfig};
pub use error::{Error, Result};
pub use playback::{PlaybackHandle, PlaybackService, PlaybackSnapshot};
pub use poster::{FooterMode, Poster, PosterContent, PosterList};
pub use source::{HttpPosterSource, Photo, PosterSource};
