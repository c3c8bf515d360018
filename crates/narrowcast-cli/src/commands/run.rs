use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use narrowcast_core::{
    playback::PlaybackEvent,
    poster::PhotoPoster,
    AppConfig, HttpPosterSource, PlaybackService,
};
use narrowcast_display::ScrollConfigExt;

pub async fn run(config: AppConfig) -> Result<()> {
    let source = Arc::new(HttpPosterSource::new(&config)?);

    println!("Playing posters from {} (Ctrl-C to stop)...", config.api.base_url);

    // Create shutdown channel
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
        let _ = shutdown_tx.send(true);
    });

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (service, _handle) = PlaybackService::new(Arc::clone(&source), &config);
    let service = service.with_event_sender(event_tx);
    let service_task = tokio::spawn(service.run(shutdown_rx));

    // The channel closes once the service has stopped
    while let Some(event) = event_rx.recv().await {
        match event {
            PlaybackEvent::Selected { selection, poster } => {
                let viewport = config.scroll.viewport_for(&poster, true);
                info!(
                    index = selection.index,
                    id = %poster.id,
                    cause = ?selection.cause,
                    footer = ?poster.footer,
                    scroll_hint_secs = viewport.timeout.map(|t| t.as_secs_f64()),
                    "Showing poster"
                );

                if let Some(albums) = poster.photo_albums() {
                    let mut photo = PhotoPoster::new(albums.to_vec());
                    match photo.load(source.as_ref()).await {
                        Ok(p) => info!(url = %p.url, label = %p.label, "Photo poster resolved"),
                        Err(e) => warn!("Failed to resolve photo poster {}: {}", poster.id, e),
                    }
                }
            }
            PlaybackEvent::PostersRefreshed {
                posters,
                borrel_mode,
            } => {
                info!(posters, borrel_mode, "Poster list refreshed");
            }
            PlaybackEvent::Paused => info!("Playback paused"),
            PlaybackEvent::Resumed => info!("Playback resumed"),
            PlaybackEvent::Error { task, message } => {
                warn!("{} failed: {}", task, message);
            }
        }
    }

    service_task.await?;
    println!("Playback stopped.");

    Ok(())
}
