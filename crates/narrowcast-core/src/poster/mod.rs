mod models;
pub mod photo;

pub use models::{FooterMode, Poster, PosterContent, PosterList};
pub use photo::PhotoPoster;
