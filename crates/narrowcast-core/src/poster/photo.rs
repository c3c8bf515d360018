//! Photo posters: pick a photo from the poster's albums and caption the footer with it

use crate::source::{Photo, PosterSource};
use crate::Result;

/// A photo poster together with the photo it resolved to
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoPoster {
    albums: Vec<u64>,
    photo: Option<Photo>,
}

impl PhotoPoster {
    pub fn new(albums: Vec<u64>) -> Self {
        Self {
            albums,
            photo: None,
        }
    }

    pub fn albums(&self) -> &[u64] {
        &self.albums
    }

    /// Fetch a photo for this poster's albums.
    ///
    /// A failed lookup keeps whatever photo was loaded before.
    pub async fn load<S: PosterSource + ?Sized>(&mut self, source: &S) -> Result<&Photo> {
        let photo = source.get_photo(&self.albums).await?;
        tracing::debug!(url = %photo.url, label = %photo.label, "Photo resolved");
        Ok(self.photo.insert(photo))
    }

    /// Image URL to draw; empty until a photo is loaded
    pub fn url(&self) -> &str {
        self.photo.as_ref().map_or("", |p| p.url.as_str())
    }

    /// Footer title. Only a visible poster captions the footer.
    pub fn title(&self, visible: bool) -> Option<&str> {
        if !visible {
            return None;
        }
        self.photo.as_ref().map(|p| p.label.as_str())
    }
}
