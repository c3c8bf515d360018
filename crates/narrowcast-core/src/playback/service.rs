use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use super::state::{PlaybackSnapshot, PlaybackState, Selection};
use crate::config::AppConfig;
use crate::poster::{Poster, PosterList};
use crate::source::PosterSource;
use crate::timer::{TimerId, TokioTimer};
use crate::{Error, Result};

/// Viewer controls accepted by the running service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    Next,
    Pause,
    Resume,
    Refresh,
}

/// Events emitted by the playback service to notify the shell of changes
#[derive(Debug, Clone)]
pub enum PlaybackEvent {
    /// A poster was put on screen
    Selected { selection: Selection, poster: Poster },
    /// The poster list was replaced
    PostersRefreshed { posters: usize, borrel_mode: bool },
    Paused,
    Resumed,
    /// A background task failed
    Error { task: String, message: String },
}

/// Shell-side handle: send controls, read the latest snapshot
#[derive(Clone)]
pub struct PlaybackHandle {
    commands: mpsc::UnboundedSender<PlaybackCommand>,
    snapshot: watch::Receiver<PlaybackSnapshot>,
}

impl PlaybackHandle {
    pub fn next(&self) -> Result<()> {
        self.send(PlaybackCommand::Next)
    }

    pub fn pause(&self) -> Result<()> {
        self.send(PlaybackCommand::Pause)
    }

    pub fn resume(&self) -> Result<()> {
        self.send(PlaybackCommand::Resume)
    }

    pub fn refresh(&self) -> Result<()> {
        self.send(PlaybackCommand::Refresh)
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.snapshot.borrow().clone()
    }

    /// A receiver that is notified on every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.snapshot.clone()
    }

    fn send(&self, command: PlaybackCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| Error::ServiceStopped)
    }
}

/// Drives a [`PlaybackState`] on the tokio runtime
///
/// All state changes happen inside [`PlaybackService::run`]; the shell only
/// ever sees snapshots and sends commands.
pub struct PlaybackService<S: PosterSource + 'static> {
    source: Arc<S>,
    state: PlaybackState,
    timer: TokioTimer,
    fired_rx: mpsc::UnboundedReceiver<TimerId>,
    commands_rx: mpsc::UnboundedReceiver<PlaybackCommand>,
    refresh_tx: mpsc::UnboundedSender<Result<PosterList>>,
    refresh_rx: mpsc::UnboundedReceiver<Result<PosterList>>,
    snapshot_tx: watch::Sender<PlaybackSnapshot>,
    event_tx: Option<mpsc::UnboundedSender<PlaybackEvent>>,
    rng: StdRng,
}

impl<S: PosterSource + 'static> PlaybackService<S> {
    /// Create a new playback service and the handle used to control it
    pub fn new(source: Arc<S>, config: &AppConfig) -> (Self, PlaybackHandle) {
        let (timer, fired_rx) = TokioTimer::new();
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (refresh_tx, refresh_rx) = mpsc::unbounded_channel();
        let state = PlaybackState::new().with_random_start(config.playback.random_start);
        let (snapshot_tx, snapshot_rx) = watch::channel(state.snapshot());

        let service = Self {
            source,
            state,
            timer,
            fired_rx,
            commands_rx,
            refresh_tx,
            refresh_rx,
            snapshot_tx,
            event_tx: None,
            rng: StdRng::from_os_rng(),
        };
        let handle = PlaybackHandle {
            commands: commands_tx,
            snapshot: snapshot_rx,
        };
        (service, handle)
    }

    /// Set the event sender for shell notifications
    pub fn with_event_sender(mut self, tx: mpsc::UnboundedSender<PlaybackEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// Use a seeded random generator for start index selection
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Send an event to the shell (if event channel is configured)
    fn send_event(&self, event: PlaybackEvent) {
        if let Some(ref tx) = self.event_tx {
            if tx.send(event).is_err() {
                warn!("Failed to send playback event: receiver dropped");
            }
        }
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.state.snapshot());
    }

    /// Fetch the poster list and wait for it, returning the fetch error if any
    pub async fn refresh_now(&mut self) -> Result<()> {
        if !self.state.begin_refresh() {
            debug!("Refresh already in flight");
            return Ok(());
        }
        self.publish();

        let result = self.source.get_posters().await;
        self.apply_refresh(result)
    }

    /// Start a refresh in the background; the result comes back through the run loop
    fn spawn_refresh(&mut self) {
        if !self.state.begin_refresh() {
            debug!("Refresh already in flight, skipping");
            return;
        }

        let source = Arc::clone(&self.source);
        let tx = self.refresh_tx.clone();
        tokio::spawn(async move {
            let result = source.get_posters().await;
            let _ = tx.send(result);
        });
    }

    fn apply_refresh(&mut self, result: Result<PosterList>) -> Result<()> {
        match self.state.finish_refresh(result, &mut self.timer) {
            Ok(()) => {
                self.publish();
                self.send_event(PlaybackEvent::PostersRefreshed {
                    posters: self.state.posters().len(),
                    borrel_mode: self.state.borrel_mode(),
                });
                self.settle();
                Ok(())
            }
            Err(e) => {
                self.publish();
                Err(e)
            }
        }
    }

    /// Report a selection and kick off the refresh it asks for.
    ///
    /// The snapshot is published before the event goes out, so a shell reacting
    /// to the event never reads the previous state.
    fn on_selection(&mut self, selection: Option<Selection>) {
        let Some(selection) = selection else {
            return;
        };
        self.publish();

        if let Some(poster) = self.state.posters().get(selection.index) {
            info!(
                index = selection.index,
                poster = %poster.id,
                cause = ?selection.cause,
                "Showing poster"
            );
            self.send_event(PlaybackEvent::Selected {
                selection,
                poster: poster.clone(),
            });
        }
        if selection.refresh {
            self.spawn_refresh();
        }
    }

    /// Run the idle check and publish the resulting state
    fn settle(&mut self) {
        let selection = self.state.select_if_idle(&mut self.timer, &mut self.rng);
        self.on_selection(selection);
        self.publish();
    }

    fn handle_command(&mut self, command: PlaybackCommand) {
        debug!(?command, "Playback command");
        match command {
            PlaybackCommand::Next => {
                let selection = self.state.next(&mut self.timer);
                self.on_selection(selection);
            }
            PlaybackCommand::Pause => {
                if !self.state.is_paused() {
                    self.state.pause(&mut self.timer);
                    self.send_event(PlaybackEvent::Paused);
                }
            }
            PlaybackCommand::Resume => {
                if self.state.is_paused() {
                    self.send_event(PlaybackEvent::Resumed);
                    let selection = self.state.resume(&mut self.timer, &mut self.rng);
                    self.on_selection(selection);
                }
            }
            PlaybackCommand::Refresh => self.spawn_refresh(),
        }
        self.settle();
    }

    /// Run playback until shutdown signal
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("Playback service started");

        self.spawn_refresh();
        self.publish();

        loop {
            tokio::select! {
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        info!("Playback service received shutdown signal");
                        break;
                    }
                }

                Some(id) = self.fired_rx.recv() => {
                    let selection = self.state.on_timer(id, &mut self.timer);
                    self.on_selection(selection);
                    self.settle();
                }

                Some(result) = self.refresh_rx.recv() => {
                    if let Err(e) = self.apply_refresh(result) {
                        error!("Poster refresh failed: {}", e);
                        self.send_event(PlaybackEvent::Error {
                            task: "refresh".to_string(),
                            message: e.to_string(),
                        });
                    }
                }

                Some(command) = self.commands_rx.recv() => {
                    self.handle_command(command);
                }
            }
        }

        self.state.stop(&mut self.timer);
        self.publish();
        info!("Playback service stopped");
    }
}
