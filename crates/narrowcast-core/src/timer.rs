//! One-shot timer plumbing shared by the playback scheduler and the scroll engine.
//!
//! Every timeline (the poster advance timer, each slide's scroll loop) owns a
//! [`TimerSlot`]. The slot is the only thing allowed to arm a timer, and it
//! always disarms its previous timer first, so a timeline never has more than
//! one pending callback. Fired ids are handed back to the slot through
//! [`TimerSlot::accept`], which drops anything from an older generation.
//!
//! The actual waiting is done by a [`Timer`] implementation:
//! - [`TokioTimer`] sleeps on the tokio runtime and reports fired ids over a channel
//! - [`ManualTimer`] keeps a virtual clock that callers advance explicitly

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio::time::Instant;

/// Identity of one armed callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId {
    slot: u32,
    generation: u64,
}

impl TimerId {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Capability to wait for a duration and report back which id fired
pub trait Timer {
    /// Current time on this timer's clock
    fn now(&self) -> Instant;

    /// Deliver `id` once `after` has elapsed
    fn arm(&mut self, id: TimerId, after: Duration);

    /// Forget `id`. Disarming an id that already fired, or was never armed, is a no-op.
    fn disarm(&mut self, id: TimerId);
}

/// Holds at most one live timer for a single timeline
#[derive(Debug)]
pub struct TimerSlot {
    slot: u32,
    generation: u64,
    live: Option<TimerId>,
}

impl TimerSlot {
    /// Create a slot. `slot` distinguishes timelines that share one [`Timer`].
    pub fn new(slot: u32) -> Self {
        Self {
            slot,
            generation: 0,
            live: None,
        }
    }

    /// Whether a callback is currently pending
    #[inline]
    pub fn is_armed(&self) -> bool {
        self.live.is_some()
    }

    /// The pending callback, if any
    pub fn live(&self) -> Option<TimerId> {
        self.live
    }

    /// Current generation; bumped on every arm and cancel
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Cancel the pending callback (if any), then arm a fresh one
    pub fn rearm<T: Timer + ?Sized>(&mut self, timer: &mut T, after: Duration) -> TimerId {
        self.cancel(timer);
        self.generation += 1;
        let id = TimerId {
            slot: self.slot,
            generation: self.generation,
        };
        timer.arm(id, after);
        self.live = Some(id);
        id
    }

    /// Cancel the pending callback and invalidate the current generation
    pub fn cancel<T: Timer + ?Sized>(&mut self, timer: &mut T) {
        if let Some(id) = self.live.take() {
            timer.disarm(id);
        }
        self.generation += 1;
    }

    /// Claim a fired id. Returns false for ids this slot no longer owns.
    pub fn accept(&mut self, id: TimerId) -> bool {
        if self.live == Some(id) {
            self.live = None;
            true
        } else {
            false
        }
    }
}

/// Timer running on the tokio runtime
///
/// Each armed id gets its own sleeping task; when it wakes it sends the id
/// down the channel returned by [`TokioTimer::new`].
pub struct TokioTimer {
    tx: mpsc::UnboundedSender<TimerId>,
    tasks: HashMap<TimerId, AbortHandle>,
}

impl TokioTimer {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TimerId>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                tasks: HashMap::new(),
            },
            rx,
        )
    }

    /// Number of sleeping tasks that have not fired or been aborted
    pub fn pending(&self) -> usize {
        self.tasks.values().filter(|h| !h.is_finished()).count()
    }
}

impl Timer for TokioTimer {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn arm(&mut self, id: TimerId, after: Duration) {
        self.tasks.retain(|_, handle| !handle.is_finished());

        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let _ = tx.send(id);
        });
        self.tasks.insert(id, handle.abort_handle());
    }

    fn disarm(&mut self, id: TimerId) {
        if let Some(handle) = self.tasks.remove(&id) {
            handle.abort();
        }
    }
}

impl Drop for TokioTimer {
    fn drop(&mut self) {
        for handle in self.tasks.values() {
            handle.abort();
        }
    }
}

/// Deadline used by [`ManualTimer`] for delays past the end of the clock
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Deterministic timer with a virtual clock
///
/// Nothing fires on its own; [`ManualTimer::advance`] walks the clock forward
/// and hands each due id to a callback in deadline order. Counters of armed
/// and disarmed ids make leaked or overlapping timers visible.
#[derive(Debug)]
pub struct ManualTimer {
    now: Instant,
    pending: Vec<(Instant, TimerId)>,
    armed: usize,
    disarmed: usize,
    max_pending: usize,
}

impl Default for ManualTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualTimer {
    pub fn new() -> Self {
        Self {
            now: Instant::now(),
            pending: Vec::new(),
            armed: 0,
            disarmed: 0,
            max_pending: 0,
        }
    }

    /// Number of callbacks waiting to fire
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Total number of `arm` calls
    pub fn armed_count(&self) -> usize {
        self.armed
    }

    /// Number of `disarm` calls that removed a pending callback
    pub fn disarmed_count(&self) -> usize {
        self.disarmed
    }

    /// Highest number of simultaneously pending callbacks seen so far
    pub fn max_pending(&self) -> usize {
        self.max_pending
    }

    /// Deadline of the earliest pending callback
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|(deadline, _)| *deadline).min()
    }

    /// Move the clock forward by `by`, firing due callbacks one at a time.
    ///
    /// `fire` may arm new timers; those fire within the same call if their
    /// deadline is still inside the window.
    pub fn advance<F>(&mut self, by: Duration, mut fire: F)
    where
        F: FnMut(&mut Self, TimerId),
    {
        let until = self.now + by;
        while let Some(index) = self.next_due(until) {
            let (deadline, id) = self.pending.remove(index);
            self.now = deadline;
            fire(self, id);
        }
        self.now = until;
    }

    fn next_due(&self, until: Instant) -> Option<usize> {
        self.pending
            .iter()
            .enumerate()
            .filter(|(_, (deadline, _))| *deadline <= until)
            .min_by_key(|(_, (deadline, id))| (*deadline, *id))
            .map(|(index, _)| index)
    }
}

impl Timer for ManualTimer {
    fn now(&self) -> Instant {
        self.now
    }

    fn arm(&mut self, id: TimerId, after: Duration) {
        self.armed += 1;
        let deadline = self
            .now
            .checked_add(after)
            .unwrap_or_else(|| self.now + FAR_FUTURE);
        self.pending.push((deadline, id));
        self.max_pending = self.max_pending.max(self.pending.len());
    }

    fn disarm(&mut self, id: TimerId) {
        let before = self.pending.len();
        self.pending.retain(|(_, pending)| *pending != id);
        if self.pending.len() < before {
            self.disarmed += 1;
        }
    }
}
