use anyhow::Result;

use narrowcast_core::{AppConfig, HttpPosterSource, PosterContent, PosterSource};

pub async fn run(config: &AppConfig) -> Result<()> {
    let source = HttpPosterSource::new(config)?;
    let list = source.get_posters().await?;

    if list.posters.is_empty() {
        println!("No posters configured at {}", config.api.base_url);
        return Ok(());
    }

    let mode = if list.borrel_mode { " [borrel mode]" } else { "" };
    println!("Posters ({}){}:\n", list.posters.len(), mode);

    for (index, poster) in list.posters.iter().enumerate() {
        let kind = describe(&poster.content);

        let timeout = match poster.advance_after() {
            Some(after) => format!("{:.1}s", after.as_secs_f64()),
            None => "holds".to_string(),
        };

        println!("  {:>2}. {} - {} ({})", index, poster.id, kind, timeout);
    }

    Ok(())
}

/// One-line description of a poster's payload
fn describe(content: &PosterContent) -> String {
    match content {
        PosterContent::Image { source } => format!("image {}", source.join(", ")),
        PosterContent::Photo { albums } => format!("photo from albums {:?}", albums),
        PosterContent::Video { source } => format!("video {}", source.join(", ")),
        PosterContent::External { source } => format!("external {}", source.join(", ")),
        PosterContent::Unknown => "(unknown type)".to_string(),
    }
}
