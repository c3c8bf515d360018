use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::poster::{FooterMode, Poster, PosterList};
use crate::timer::{Timer, TimerId, TimerSlot};
use crate::Result;

/// Slot number of the advance timeline
const ADVANCE_SLOT: u32 = 0;

/// What the scheduler is doing with the current poster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMode {
    /// Nothing running; the next idle check picks a start index
    Idle,
    /// Advance timer armed for the current poster
    Running,
    /// Showing a poster that must not auto-advance
    Holding,
    /// Paused by the viewer; the current poster stays up
    Paused,
}

/// Why a poster was selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionCause {
    Start,
    Timeout,
    Manual,
}

/// Result of entering a poster index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub index: usize,
    pub cause: SelectionCause,
    /// The caller should refresh the poster list (index 0 was entered)
    pub refresh: bool,
}

/// Countdown of the running poster, used for the progress footer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub total: Duration,
    pub deadline: Instant,
}

impl Countdown {
    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }
}

/// Read-only view of playback handed to the presentation shell
#[derive(Debug, Clone)]
pub struct PlaybackSnapshot {
    pub posters: Arc<[Poster]>,
    pub current_index: Option<usize>,
    pub borrel_mode: bool,
    pub is_paused: bool,
    pub is_loading: bool,
    pub countdown: Option<Countdown>,
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self {
            posters: Arc::from(Vec::new()),
            current_index: None,
            borrel_mode: false,
            is_paused: false,
            is_loading: false,
            countdown: None,
        }
    }
}

impl PlaybackSnapshot {
    /// The poster on screen, if any
    pub fn current_poster(&self) -> Option<&Poster> {
        self.current_index.and_then(|i| self.posters.get(i))
    }

    /// Seconds left on the current poster; `None` while paused or not auto-advancing
    pub fn seconds_remaining(&self, now: Instant) -> Option<f64> {
        self.countdown.map(|c| c.remaining(now).as_secs_f64())
    }

    /// Full display time of the running poster (length of the progress bar)
    pub fn timeout_seconds(&self) -> Option<f64> {
        self.countdown.map(|c| c.total.as_secs_f64())
    }

    /// Footer mode of the current poster
    pub fn current_footer(&self) -> Option<FooterMode> {
        self.current_poster().map(|p| p.footer)
    }
}

/// Poster rotation state machine
///
/// All timing goes through an injected [`Timer`]; the state itself never
/// sleeps. Every path that changes the current index cancels the advance
/// timer before arming a new one.
#[derive(Debug)]
pub struct PlaybackState {
    posters: Arc<[Poster]>,
    current_index: Option<usize>,
    borrel_mode: bool,
    is_loading: bool,
    mode: PlaybackMode,
    random_start: bool,
    advance: TimerSlot,
    countdown: Option<Countdown>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackState {
    pub fn new() -> Self {
        Self {
            posters: Arc::from(Vec::new()),
            current_index: None,
            borrel_mode: false,
            is_loading: false,
            mode: PlaybackMode::Idle,
            random_start: true,
            advance: TimerSlot::new(ADVANCE_SLOT),
            countdown: None,
        }
    }

    /// Start at index 0 instead of a random poster
    pub fn with_random_start(mut self, random_start: bool) -> Self {
        self.random_start = random_start;
        self
    }

    pub fn posters(&self) -> &[Poster] {
        &self.posters
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn borrel_mode(&self) -> bool {
        self.borrel_mode
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_paused(&self) -> bool {
        self.mode == PlaybackMode::Paused
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    /// Pending advance timer, if playback is running
    pub fn pending_timer(&self) -> Option<TimerId> {
        self.advance.live()
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            posters: Arc::clone(&self.posters),
            current_index: self.current_index,
            borrel_mode: self.borrel_mode,
            is_paused: self.is_paused(),
            is_loading: self.is_loading,
            countdown: self.countdown,
        }
    }

    /// Mark a refresh as started. Returns false if one is already in flight.
    pub fn begin_refresh(&mut self) -> bool {
        if self.is_loading {
            return false;
        }
        self.is_loading = true;
        true
    }

    /// Apply the outcome of a refresh.
    ///
    /// On success the poster list and borrel mode are replaced wholesale and the
    /// current index is kept. If the new list no longer contains the current
    /// index, playback goes idle so the next idle check restarts it. On failure
    /// nothing but the loading flag changes and the error is returned.
    pub fn finish_refresh<T: Timer + ?Sized>(
        &mut self,
        result: Result<PosterList>,
        timer: &mut T,
    ) -> Result<()> {
        self.is_loading = false;
        let list = result?;

        info!(
            posters = list.posters.len(),
            borrel_mode = list.borrel_mode,
            "Poster list refreshed"
        );
        self.posters = Arc::from(list.posters);
        self.borrel_mode = list.borrel_mode;

        if self.posters.is_empty() {
            warn!("Poster list is empty, nothing to display");
            self.stop_timer(timer);
            if self.mode != PlaybackMode::Paused {
                self.mode = PlaybackMode::Idle;
            }
        } else if let Some(index) = self.current_index {
            if index >= self.posters.len() && self.mode != PlaybackMode::Paused {
                debug!(index, "Current poster no longer exists, restarting playback");
                self.stop_timer(timer);
                self.current_index = None;
                self.mode = PlaybackMode::Idle;
            }
        }

        Ok(())
    }

    /// Start playback if there is something to show and nothing is running.
    ///
    /// This is the only way playback starts: on first load, after the list goes
    /// from empty to non-empty, and after [`PlaybackState::resume`].
    pub fn select_if_idle<T, R>(&mut self, timer: &mut T, rng: &mut R) -> Option<Selection>
    where
        T: Timer + ?Sized,
        R: Rng,
    {
        if self.mode != PlaybackMode::Idle
            || self.is_loading
            || self.posters.is_empty()
            || self.advance.is_armed()
        {
            return None;
        }

        let index = if self.random_start {
            rng.random_range(0..self.posters.len())
        } else {
            0
        };
        Some(self.enter(index, SelectionCause::Start, timer))
    }

    /// Handle a fired advance timer. Stale ids are ignored.
    pub fn on_timer<T: Timer + ?Sized>(&mut self, id: TimerId, timer: &mut T) -> Option<Selection> {
        if !self.advance.accept(id) {
            debug!(generation = id.generation(), "Ignoring stale advance timer");
            return None;
        }

        self.countdown = None;
        if self.posters.is_empty() {
            self.mode = PlaybackMode::Idle;
            return None;
        }

        let next = self.next_index();
        Some(self.enter(next, SelectionCause::Timeout, timer))
    }

    /// Skip to the next poster right away. Also ends a pause.
    pub fn next<T: Timer + ?Sized>(&mut self, timer: &mut T) -> Option<Selection> {
        if self.posters.is_empty() {
            return None;
        }
        let next = self.next_index();
        Some(self.enter(next, SelectionCause::Manual, timer))
    }

    /// Stop the advance timer and keep the current poster on screen
    pub fn pause<T: Timer + ?Sized>(&mut self, timer: &mut T) {
        if self.mode == PlaybackMode::Paused {
            return;
        }
        self.stop_timer(timer);
        self.mode = PlaybackMode::Paused;
        info!(index = ?self.current_index, "Playback paused");
    }

    /// Leave the paused state.
    ///
    /// Resuming does not continue the paused poster's remaining time: playback
    /// goes idle and restarts from a freshly picked start index.
    pub fn resume<T, R>(&mut self, timer: &mut T, rng: &mut R) -> Option<Selection>
    where
        T: Timer + ?Sized,
        R: Rng,
    {
        if self.mode != PlaybackMode::Paused {
            return None;
        }
        self.mode = PlaybackMode::Idle;
        info!("Playback resumed");
        self.select_if_idle(timer, rng)
    }

    /// Cancel the advance timer for good (screen teardown)
    pub fn stop<T: Timer + ?Sized>(&mut self, timer: &mut T) {
        self.stop_timer(timer);
        self.mode = PlaybackMode::Idle;
    }

    fn next_index(&self) -> usize {
        self.current_index
            .map_or(0, |index| (index + 1) % self.posters.len())
    }

    fn stop_timer<T: Timer + ?Sized>(&mut self, timer: &mut T) {
        self.advance.cancel(timer);
        self.countdown = None;
    }

    fn enter<T: Timer + ?Sized>(
        &mut self,
        index: usize,
        cause: SelectionCause,
        timer: &mut T,
    ) -> Selection {
        self.stop_timer(timer);
        self.current_index = Some(index);

        let poster = &self.posters[index];
        let now = timer.now();
        let deadline = poster
            .advance_after()
            .and_then(|after| now.checked_add(after).map(|deadline| (after, deadline)));
        match deadline {
            Some((after, deadline)) => {
                self.advance.rearm(timer, after);
                self.countdown = Some(Countdown {
                    total: after,
                    deadline,
                });
                self.mode = PlaybackMode::Running;
            }
            None => {
                warn!(
                    poster = %poster.id,
                    timeout = poster.timeout_seconds,
                    "Poster has no usable timeout, holding it on screen"
                );
                self.mode = PlaybackMode::Holding;
            }
        }

        debug!(index, poster = %poster.id, ?cause, "Poster selected");
        Selection {
            index,
            cause,
            refresh: index == 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poster::PosterContent;
    use crate::timer::ManualTimer;
    use crate::Error;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn poster(id: &str, timeout: f64) -> Poster {
        Poster {
            id: id.to_string(),
            timeout_seconds: timeout,
            footer: FooterMode::Normal,
            content: PosterContent::Image { source: Vec::new() },
        }
    }

    fn list(timeouts: &[f64]) -> PosterList {
        PosterList {
            posters: timeouts
                .iter()
                .enumerate()
                .map(|(i, t)| poster(&format!("p{}", i), *t))
                .collect(),
            borrel_mode: false,
        }
    }

    /// Loaded state that already started at index `start`
    fn started(timeouts: &[f64], start: usize, timer: &mut ManualTimer) -> PlaybackState {
        let mut state = PlaybackState::new().with_random_start(false);
        assert!(state.begin_refresh());
        state.finish_refresh(Ok(list(timeouts)), timer).unwrap();
        state.select_if_idle(timer, &mut StdRng::seed_from_u64(0)).unwrap();
        // Jump to the requested start the way a viewer would
        while state.current_index() != Some(start) {
            state.next(timer);
        }
        state
    }

    /// Advance virtual time, feeding fired ids into the state
    fn run_for(
        state: &mut PlaybackState,
        timer: &mut ManualTimer,
        by: Duration,
    ) -> Vec<Selection> {
        let mut selections = Vec::new();
        timer.advance(by, |timer, id| {
            if let Some(selection) = state.on_timer(id, timer) {
                selections.push(selection);
            }
        });
        selections
    }

    #[test]
    fn test_empty_list_selects_nothing() {
        let mut timer = ManualTimer::new();
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = PlaybackState::new();

        state.begin_refresh();
        state.finish_refresh(Ok(PosterList::default()), &mut timer).unwrap();

        assert_eq!(state.select_if_idle(&mut timer, &mut rng), None);
        assert_eq!(state.current_index(), None);
        assert_eq!(timer.pending(), 0);
        assert!(state.snapshot().current_poster().is_none());
    }

    #[test]
    fn test_no_selection_while_loading() {
        let mut timer = ManualTimer::new();
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = PlaybackState::new();

        state.begin_refresh();
        state.finish_refresh(Ok(list(&[5.0, 5.0])), &mut timer).unwrap();
        state.begin_refresh();

        assert_eq!(state.select_if_idle(&mut timer, &mut rng), None);
        assert_eq!(timer.pending(), 0);
    }

    #[test]
    fn test_random_start_is_in_range_and_varies() {
        let mut seen = std::collections::HashSet::new();
        for seed in 0..64 {
            let mut timer = ManualTimer::new();
            let mut rng = StdRng::seed_from_u64(seed);
            let mut state = PlaybackState::new();
            state.begin_refresh();
            state.finish_refresh(Ok(list(&[1.0; 4])), &mut timer).unwrap();

            let selection = state.select_if_idle(&mut timer, &mut rng).unwrap();
            assert!(selection.index < 4);
            assert_eq!(selection.cause, SelectionCause::Start);
            seen.insert(selection.index);
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_round_robin_advance() {
        let mut timer = ManualTimer::new();
        let mut state = started(&[2.0, 3.0, 4.0], 1, &mut timer);

        // 3s on p1, 4s on p2, 2s on p0, 3s on p1, then p2 until 15s
        let visited: Vec<usize> = run_for(&mut state, &mut timer, Duration::from_secs(15))
            .iter()
            .map(|s| s.index)
            .collect();

        assert_eq!(visited, vec![2, 0, 1, 2]);
        assert!(visited.iter().all(|s| *s < 3));
        assert_eq!(state.current_index(), Some(2));
    }

    #[test]
    fn test_advance_does_not_fire_early() {
        let mut timer = ManualTimer::new();
        let mut state = started(&[10.0, 10.0], 0, &mut timer);

        assert!(run_for(&mut state, &mut timer, Duration::from_millis(9_999)).is_empty());
        assert_eq!(state.current_index(), Some(0));

        let selections = run_for(&mut state, &mut timer, Duration::from_millis(1));
        assert_eq!(selections.len(), 1);
        assert_eq!(state.current_index(), Some(1));
    }

    #[test]
    fn test_refresh_requested_once_per_entry_into_zero() {
        let mut timer = ManualTimer::new();
        let mut state = started(&[1.0, 1.0, 1.0], 1, &mut timer);

        let selections = run_for(&mut state, &mut timer, Duration::from_secs(6));
        let refreshes: Vec<usize> = selections
            .iter()
            .filter(|s| s.refresh)
            .map(|s| s.index)
            .collect();

        // 1 -> 2 -> 0 -> 1 -> 2 -> 0 -> 1
        assert_eq!(selections.len(), 6);
        assert_eq!(refreshes, vec![0, 0]);
    }

    #[test]
    fn test_refresh_keeps_current_index_and_timer() {
        let mut timer = ManualTimer::new();
        let mut state = started(&[5.0, 5.0, 5.0], 2, &mut timer);
        let pending = state.pending_timer();

        assert!(state.begin_refresh());
        assert!(state.is_loading());
        let mut fresh = list(&[7.0, 7.0, 7.0]);
        fresh.borrel_mode = true;
        state.finish_refresh(Ok(fresh), &mut timer).unwrap();

        assert!(!state.is_loading());
        assert!(state.borrel_mode());
        assert_eq!(state.current_index(), Some(2));
        assert_eq!(state.pending_timer(), pending);
        assert_eq!(timer.pending(), 1);
    }

    #[test]
    fn test_refresh_failure_keeps_previous_posters() {
        let mut timer = ManualTimer::new();
        let mut state = started(&[5.0, 5.0], 0, &mut timer);
        let before = state.posters().to_vec();

        state.begin_refresh();
        let result = state.finish_refresh(Err(Error::Other("backend down".into())), &mut timer);

        assert!(result.is_err());
        assert!(!state.is_loading());
        assert_eq!(state.posters(), &before[..]);
        assert_eq!(state.current_index(), Some(0));
        assert_eq!(timer.pending(), 1);
    }

    #[test]
    fn test_begin_refresh_is_not_reentrant() {
        let mut state = PlaybackState::new();
        assert!(state.begin_refresh());
        assert!(!state.begin_refresh());
    }

    #[test]
    fn test_shrinking_list_restarts_playback() {
        let mut timer = ManualTimer::new();
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = started(&[5.0, 5.0, 5.0, 5.0], 3, &mut timer);

        state.begin_refresh();
        state.finish_refresh(Ok(list(&[5.0, 5.0])), &mut timer).unwrap();
        assert_eq!(state.current_index(), None);
        assert_eq!(timer.pending(), 0);

        let selection = state.select_if_idle(&mut timer, &mut rng).unwrap();
        assert!(selection.index < 2);
        assert_eq!(timer.pending(), 1);
    }

    #[test]
    fn test_emptied_list_stops_timer_and_restarts_when_posters_return() {
        let mut timer = ManualTimer::new();
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = started(&[5.0, 5.0], 1, &mut timer);

        state.begin_refresh();
        state.finish_refresh(Ok(PosterList::default()), &mut timer).unwrap();
        assert_eq!(timer.pending(), 0);
        assert!(state.snapshot().current_poster().is_none());
        assert!(run_for(&mut state, &mut timer, Duration::from_secs(60)).is_empty());

        state.begin_refresh();
        state.finish_refresh(Ok(list(&[5.0, 5.0])), &mut timer).unwrap();
        assert!(state.select_if_idle(&mut timer, &mut rng).is_some());
        assert_eq!(timer.pending(), 1);
    }

    #[test]
    fn test_pause_stops_advancing() {
        let mut timer = ManualTimer::new();
        let mut state = started(&[5.0, 5.0], 0, &mut timer);

        state.pause(&mut timer);
        assert!(state.is_paused());
        assert_eq!(state.pending_timer(), None);
        assert_eq!(timer.pending(), 0);

        assert!(run_for(&mut state, &mut timer, Duration::from_secs(60)).is_empty());
        assert_eq!(state.current_index(), Some(0));

        let snapshot = state.snapshot();
        assert!(snapshot.is_paused);
        assert_eq!(snapshot.seconds_remaining(timer.now()), None);
        assert_eq!(snapshot.timeout_seconds(), None);
    }

    #[test]
    fn test_paused_state_is_not_restarted_by_idle_check() {
        let mut timer = ManualTimer::new();
        let mut rng = StdRng::seed_from_u64(9);
        let mut state = started(&[5.0, 5.0], 1, &mut timer);

        state.pause(&mut timer);
        assert_eq!(state.select_if_idle(&mut timer, &mut rng), None);
        assert_eq!(state.current_index(), Some(1));
    }

    #[test]
    fn test_resume_restarts_at_a_fresh_start_index() {
        let mut timer = ManualTimer::new();
        let mut state = started(&[5.0, 8.0, 5.0], 1, &mut timer);

        run_for(&mut state, &mut timer, Duration::from_secs(2));
        state.pause(&mut timer);

        // Deterministic start to observe the restart
        let mut rng = StdRng::seed_from_u64(0);
        let selection = state.resume(&mut timer, &mut rng).unwrap();
        assert_eq!(selection.cause, SelectionCause::Start);
        assert_eq!(selection.index, 0);
        assert_eq!(state.mode(), PlaybackMode::Running);

        // The full timeout of the new poster is armed, not the 6s left on p1
        let snapshot = state.snapshot();
        assert_eq!(snapshot.seconds_remaining(timer.now()), Some(5.0));
    }

    #[test]
    fn test_resume_with_random_start_picks_from_whole_list() {
        let mut indices = std::collections::HashSet::new();
        for seed in 0..64 {
            let mut timer = ManualTimer::new();
            let mut state = PlaybackState::new();
            state.begin_refresh();
            state.finish_refresh(Ok(list(&[5.0; 3])), &mut timer).unwrap();
            state.select_if_idle(&mut timer, &mut StdRng::seed_from_u64(0));
            state.pause(&mut timer);

            let mut rng = StdRng::seed_from_u64(seed);
            indices.insert(state.resume(&mut timer, &mut rng).unwrap().index);
        }
        assert_eq!(indices.len(), 3);
    }

    #[test]
    fn test_resume_without_pause_is_noop() {
        let mut timer = ManualTimer::new();
        let mut rng = StdRng::seed_from_u64(0);
        let mut state = started(&[5.0, 5.0], 1, &mut timer);
        let pending = state.pending_timer();

        assert_eq!(state.resume(&mut timer, &mut rng), None);
        assert_eq!(state.pending_timer(), pending);
    }

    #[test]
    fn test_next_wraps_and_ends_pause() {
        let mut timer = ManualTimer::new();
        let mut state = started(&[5.0, 5.0, 5.0], 2, &mut timer);

        state.pause(&mut timer);
        let selection = state.next(&mut timer).unwrap();

        assert_eq!(selection.index, 0);
        assert_eq!(selection.cause, SelectionCause::Manual);
        assert!(selection.refresh);
        assert!(!state.is_paused());
        assert_eq!(timer.pending(), 1);
    }

    #[test]
    fn test_next_before_any_selection_starts_at_zero() {
        let mut timer = ManualTimer::new();
        let mut state = PlaybackState::new();
        state.begin_refresh();
        state.finish_refresh(Ok(list(&[5.0, 5.0])), &mut timer).unwrap();

        assert_eq!(state.next(&mut timer).map(|s| s.index), Some(0));
    }

    #[test]
    fn test_next_on_empty_list_is_noop() {
        let mut timer = ManualTimer::new();
        let mut state = PlaybackState::new();
        assert_eq!(state.next(&mut timer), None);
        assert_eq!(timer.armed_count(), 0);
    }

    #[test]
    fn test_single_poster_loops_and_refreshes_every_cycle() {
        let mut timer = ManualTimer::new();
        let mut state = started(&[3.0], 0, &mut timer);

        let selections = run_for(&mut state, &mut timer, Duration::from_secs(9));
        assert_eq!(selections.len(), 3);
        assert!(selections.iter().all(|s| s.index == 0 && s.refresh));
    }

    #[test]
    fn test_non_positive_timeout_holds_poster() {
        let mut timer = ManualTimer::new();
        let mut rng = StdRng::seed_from_u64(0);
        let mut state = started(&[2.0, 0.0, 2.0], 0, &mut timer);

        run_for(&mut state, &mut timer, Duration::from_secs(2));
        assert_eq!(state.current_index(), Some(1));
        assert_eq!(state.mode(), PlaybackMode::Holding);
        assert_eq!(timer.pending(), 0);

        // Holding is not idle: no random restart, no advance
        assert_eq!(state.select_if_idle(&mut timer, &mut rng), None);
        assert!(run_for(&mut state, &mut timer, Duration::from_secs(600)).is_empty());
        assert_eq!(state.current_index(), Some(1));

        // A viewer can still skip past it
        assert_eq!(state.next(&mut timer).map(|s| s.index), Some(2));
        assert_eq!(state.mode(), PlaybackMode::Running);
    }

    #[test]
    fn test_out_of_range_timeout_holds_poster() {
        let mut timer = ManualTimer::new();
        let mut rng = StdRng::seed_from_u64(0);
        let mut state = PlaybackState::new().with_random_start(false);

        let list: PosterList = serde_json::from_str(
            r#"{ "posters": [
                { "id": 1, "type": "image", "timeout": 1e20 },
                { "id": 2, "type": "image", "timeout": 1.8e19 },
                { "id": 3, "type": "image", "timeout": 3 }
            ] }"#,
        )
        .unwrap();
        state.begin_refresh();
        state.finish_refresh(Ok(list), &mut timer).unwrap();

        // Too large for a Duration
        assert_eq!(state.select_if_idle(&mut timer, &mut rng).map(|s| s.index), Some(0));
        assert_eq!(state.mode(), PlaybackMode::Holding);
        assert_eq!(timer.pending(), 0);

        // Fits a Duration but not a deadline
        assert_eq!(state.next(&mut timer).map(|s| s.index), Some(1));
        assert_eq!(state.mode(), PlaybackMode::Holding);
        assert!(state.snapshot().countdown.is_none());
        assert_eq!(timer.pending(), 0);

        assert_eq!(state.next(&mut timer).map(|s| s.index), Some(2));
        assert_eq!(state.mode(), PlaybackMode::Running);
        assert_eq!(timer.pending(), 1);
    }

    #[test]
    fn test_at_most_one_pending_timer_under_mixed_operations() {
        let mut timer = ManualTimer::new();
        let mut rng = StdRng::seed_from_u64(42);
        let mut state = started(&[1.0, 2.0, 3.0, 1.5], 0, &mut timer);

        for step in 0..200u32 {
            match step % 7 {
                0 | 3 => {
                    state.next(&mut timer);
                }
                1 => state.pause(&mut timer),
                2 => {
                    state.resume(&mut timer, &mut rng);
                }
                4 => {
                    state.select_if_idle(&mut timer, &mut rng);
                }
                _ => {
                    run_for(&mut state, &mut timer, Duration::from_millis(700 * step as u64 % 4000));
                }
            }
            assert!(timer.pending() <= 1, "step {}", step);
            assert_eq!(state.pending_timer().is_some(), timer.pending() == 1, "step {}", step);
        }

        assert_eq!(timer.max_pending(), 1);
    }

    #[test]
    fn test_stale_timer_is_ignored() {
        let mut timer = ManualTimer::new();
        let mut state = started(&[5.0, 5.0, 5.0], 0, &mut timer);
        let stale = state.pending_timer().unwrap();

        state.next(&mut timer);
        assert_eq!(state.on_timer(stale, &mut timer), None);
        assert_eq!(state.current_index(), Some(1));
        assert_eq!(timer.pending(), 1);
    }

    #[test]
    fn test_stop_cancels_timer() {
        let mut timer = ManualTimer::new();
        let mut state = started(&[5.0, 5.0], 0, &mut timer);

        state.stop(&mut timer);
        assert_eq!(timer.pending(), 0);
        assert!(run_for(&mut state, &mut timer, Duration::from_secs(60)).is_empty());
    }

    #[test]
    fn test_snapshot_countdown_and_footer() {
        let mut timer = ManualTimer::new();
        let mut state = PlaybackState::new().with_random_start(false);
        let mut posters = list(&[10.0, 5.0]);
        posters.posters[0].footer = FooterMode::Hidden;
        state.begin_refresh();
        state.finish_refresh(Ok(posters), &mut timer).unwrap();
        state.select_if_idle(&mut timer, &mut StdRng::seed_from_u64(0));

        run_for(&mut state, &mut timer, Duration::from_secs(4));
        let snapshot = state.snapshot();
        assert_eq!(snapshot.current_footer(), Some(FooterMode::Hidden));
        assert_eq!(snapshot.timeout_seconds(), Some(10.0));
        assert_eq!(snapshot.seconds_remaining(timer.now()), Some(6.0));
    }
}
