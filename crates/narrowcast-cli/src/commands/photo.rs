use anyhow::Result;

use narrowcast_core::{poster::PhotoPoster, AppConfig, HttpPosterSource};

pub async fn run(config: &AppConfig, albums: Vec<u64>) -> Result<()> {
    let source = HttpPosterSource::new(config)?;
    let mut poster = PhotoPoster::new(albums);

    let photo = poster.load(&source).await?;

    println!("URL:   {}", photo.url);
    println!("Label: {}", photo.label);

    Ok(())
}
