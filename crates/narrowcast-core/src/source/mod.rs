mod http;

pub use http::HttpPosterSource;

use serde::{Deserialize, Serialize};

use crate::poster::PosterList;
use crate::Result;

/// A photo picked from one of a poster's albums
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub url: String,
    pub label: String,
}

/// Where posters and photos come from.
///
/// Implementations do not retry; a failed call is reported to the caller as is.
#[async_trait::async_trait]
pub trait PosterSource: Send + Sync {
    /// Fetch the complete poster rotation and the current borrel mode
    async fn get_posters(&self) -> Result<PosterList>;

    /// Pick a photo from the given albums
    async fn get_photo(&self, album_ids: &[u64]) -> Result<Photo>;
}
