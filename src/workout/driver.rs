//! Async session driver
//!
//! Wraps a [`WorkoutSession`] in `Arc<Mutex<_>>` and owns the two tokio
//! timers that move it forward: the single-shot move timer and the repeating
//! one-second workout clock. After every command and every timer fire the
//! driver reconciles the timers against the session's generations. A timer
//! whose generation is outdated is aborted before a new one is armed, so at
//! most one of each is ever pending.

use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, Instrument};

use super::session::{ClockAdvance, SessionSnapshot, WorkoutSession};
use super::playback::PlaybackState;
use crate::announce::{self, Announcer, Herald};
use crate::config::ShadowDrillConfig;
use crate::moves::{Move, MoveId, Quantity, Sequence, SequenceId};
use crate::telemetry::{create_session_span, generate_session_id};

const CLOCK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Default)]
struct TimerSet {
    move_timer: Option<(u64, JoinHandle<()>)>,
    clock: Option<(u64, JoinHandle<()>)>,
}

impl TimerSet {
    fn cancel_move_timer(&mut self) {
        if let Some((generation, handle)) = self.move_timer.take() {
            debug!(generation, "Cancelling move timer");
            handle.abort();
        }
    }

    fn cancel_clock(&mut self) {
        if let Some((generation, handle)) = self.clock.take() {
            debug!(generation, "Cancelling workout clock");
            handle.abort();
        }
    }

    fn cancel_all(&mut self) {
        self.cancel_move_timer();
        self.cancel_clock();
    }
}

impl Drop for TimerSet {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

struct Shared {
    session: WorkoutSession,
    timers: TimerSet,
    herald: Herald,
    announced_generation: Option<u64>,
    updates: watch::Sender<SessionSnapshot>,
    span: tracing::Span,
}

/// Cloneable handle to a running workout session
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<Shared>>,
    updates: watch::Receiver<SessionSnapshot>,
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("session_id", &self.updates.borrow().session_id)
            .finish()
    }
}

impl SessionHandle {
    pub fn new(session: WorkoutSession, announcer: Arc<dyn Announcer>) -> Self {
        let span = create_session_span(session.session_id());
        let (updates, receiver) = watch::channel(session.snapshot());
        let shared = Shared {
            session,
            timers: TimerSet::default(),
            herald: Herald::new(announcer),
            announced_generation: None,
            updates,
            span,
        };
        Self {
            inner: Arc::new(Mutex::new(shared)),
            updates: receiver,
        }
    }

    /// Fresh session with the default catalog, configured announcer and a new
    /// session id
    pub fn from_config(config: &ShadowDrillConfig) -> Self {
        let session = WorkoutSession::new(&generate_session_id(), &config.workout);
        Self::new(session, announce::from_config(&config.announcer))
    }

    /// Receiver that observes a snapshot after every change
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.updates.clone()
    }

    // ---- commands ----

    pub async fn toggle_selection(&self, id: MoveId) -> bool {
        self.mutate(|s| s.toggle_selection(id)).await
    }

    pub async fn clear_selection(&self) {
        self.mutate(|s| s.clear_selection()).await
    }

    pub async fn add_custom_move(&self, name: &str, duration_secs: u32) -> Option<MoveId> {
        self.mutate(|s| s.add_custom_move(name, duration_secs)).await
    }

    pub async fn set_move_goal(&self, id: MoveId, quantity: Quantity) -> bool {
        self.mutate(|s| s.set_move_goal(id, quantity)).await
    }

    pub async fn set_playback_speed(&self, speed: f64) -> bool {
        self.mutate(|s| s.set_playback_speed(speed)).await
    }

    pub async fn set_workout_duration(&self, minutes: u32) -> bool {
        self.mutate(|s| s.set_workout_duration(minutes)).await
    }

    pub async fn start_workout(&self) -> bool {
        self.mutate(|s| s.start_workout()).await
    }

    pub async fn pause_workout(&self) -> bool {
        self.mutate(|s| s.pause_workout()).await
    }

    pub async fn reset_workout(&self) {
        self.mutate(|s| s.reset_workout()).await
    }

    pub async fn save_as_sequence(&self, name: &str) -> Option<SequenceId> {
        self.mutate(|s| s.save_as_sequence(name)).await
    }

    pub async fn load_sequence(&self, id: SequenceId) -> bool {
        self.mutate(|s| s.load_sequence(id)).await
    }

    /// Speak the move on screen again
    pub async fn announce_current(&self) -> bool {
        let mut shared = self.inner.lock().await;
        let Some(name) = shared.session.current_move().map(|m| m.name.clone()) else {
            return false;
        };
        shared.herald.announce(&name);
        true
    }

    /// Stop both timers and any speech and return the session to idle
    pub async fn teardown(&self) {
        let mut shared = self.inner.lock().await;
        shared.timers.cancel_all();
        shared.herald.cancel();
        shared.announced_generation = None;
        shared.session.reset_workout();
        let snapshot = shared.session.snapshot();
        shared.updates.send_replace(snapshot);
    }

    // ---- queries ----

    pub async fn read<T>(&self, f: impl FnOnce(&WorkoutSession) -> T) -> T {
        let shared = self.inner.lock().await;
        f(&shared.session)
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.read(|s| s.snapshot()).await
    }

    pub async fn available_moves(&self) -> Vec<Move> {
        self.read(|s| s.available_moves().to_vec()).await
    }

    pub async fn selected_moves(&self) -> Vec<Move> {
        self.read(|s| s.selected_moves()).await
    }

    pub async fn current_move(&self) -> Option<Move> {
        self.read(|s| s.current_move().cloned()).await
    }

    pub async fn is_playing(&self) -> bool {
        self.read(|s| s.is_playing()).await
    }

    pub async fn playback_state(&self) -> PlaybackState {
        self.read(|s| s.playback_state()).await
    }

    pub async fn elapsed_seconds(&self) -> u32 {
        self.read(|s| s.elapsed_seconds()).await
    }

    pub async fn remaining_seconds(&self) -> u32 {
        self.read(|s| s.remaining_seconds()).await
    }

    pub async fn workout_duration_minutes(&self) -> u32 {
        self.read(|s| s.workout_duration_minutes()).await
    }

    pub async fn playback_speed(&self) -> f64 {
        self.read(|s| s.playback_speed()).await
    }

    pub async fn saved_sequences(&self) -> Vec<Sequence> {
        self.read(|s| s.saved_sequences().to_vec()).await
    }

    pub async fn completion_count(&self, id: MoveId) -> u32 {
        self.read(|s| s.completion_count(id)).await
    }

    // ---- internals ----

    async fn mutate<T>(&self, f: impl FnOnce(&mut WorkoutSession) -> T) -> T {
        let mut shared = self.inner.lock().await;
        let out = f(&mut shared.session);
        reconcile(&mut shared, &self.inner);
        out
    }

    #[cfg(test)]
    async fn pending_timers(&self) -> (bool, bool) {
        let shared = self.inner.lock().await;
        (
            shared.timers.move_timer.is_some(),
            shared.timers.clock.is_some(),
        )
    }
}

/// Bring timers, speech and observers in line with the session's state
fn reconcile(shared: &mut Shared, inner: &Arc<Mutex<Shared>>) {
    let playing = shared.session.is_playing();
    let move_generation = shared.session.move_generation();
    let clock_generation = shared.session.clock_generation();
    let hold = shared.session.current_hold();

    match (playing, hold) {
        (true, Some(hold)) => {
            let armed = shared.timers.move_timer.as_ref().map(|(g, _)| *g);
            if armed != Some(move_generation) {
                shared.timers.cancel_move_timer();
                debug!(
                    generation = move_generation,
                    hold_ms = hold.as_millis() as u64,
                    "Arming move timer"
                );
                let handle = spawn_move_timer(Arc::downgrade(inner), move_generation, hold, &shared.span);
                shared.timers.move_timer = Some((move_generation, handle));
            }
        }
        _ => shared.timers.cancel_move_timer(),
    }

    if playing {
        let armed = shared.timers.clock.as_ref().map(|(g, _)| *g);
        if armed != Some(clock_generation) {
            shared.timers.cancel_clock();
            let handle = spawn_clock(Arc::downgrade(inner), clock_generation, &shared.span);
            shared.timers.clock = Some((clock_generation, handle));
        }
    } else {
        shared.timers.cancel_clock();
    }

    let current_name = shared.session.current_move().map(|m| m.name.clone());
    match (playing, current_name) {
        (true, Some(name)) => {
            if shared.announced_generation != Some(move_generation) {
                shared.herald.announce(&name);
                shared.announced_generation = Some(move_generation);
            }
        }
        _ => {
            shared.herald.cancel();
            shared.announced_generation = None;
        }
    }

    let snapshot = shared.session.snapshot();
    shared.updates.send_replace(snapshot);
}

fn spawn_move_timer(
    inner: Weak<Mutex<Shared>>,
    generation: u64,
    hold: Duration,
    span: &tracing::Span,
) -> JoinHandle<()> {
    tokio::spawn(
        async move {
            tokio::time::sleep(hold).await;
            let Some(inner) = inner.upgrade() else {
                return;
            };
            let mut shared = inner.lock().await;
            if matches!(shared.timers.move_timer, Some((g, _)) if g == generation) {
                shared.timers.move_timer = None;
            }
            let advance = shared.session.on_move_timer(generation);
            debug!(generation, ?advance, "Move timer fired");
            reconcile(&mut shared, &inner);
        }
        .instrument(span.clone()),
    )
}

fn spawn_clock(inner: Weak<Mutex<Shared>>, generation: u64, span: &tracing::Span) -> JoinHandle<()> {
    tokio::spawn(
        async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + CLOCK_PERIOD, CLOCK_PERIOD);
            loop {
                ticker.tick().await;
                let Some(inner) = inner.upgrade() else {
                    return;
                };
                let mut shared = inner.lock().await;
                match shared.session.on_clock_tick(generation) {
                    ClockAdvance::Running { .. } => {
                        let snapshot = shared.session.snapshot();
                        shared.updates.send_replace(snapshot);
                    }
                    ClockAdvance::Completed => {
                        if matches!(shared.timers.clock, Some((g, _)) if g == generation) {
                            shared.timers.clock = None;
                        }
                        reconcile(&mut shared, &inner);
                        return;
                    }
                    ClockAdvance::Stale => return,
                }
            }
        }
        .instrument(span.clone()),
    )
}
