//! Synchronous workout session core
//!
//! `WorkoutSession` owns every piece of live state and exposes the commands
//! and queries UI collaborators use. It knows nothing about real time: the
//! driver calls [`WorkoutSession::on_move_timer`] and
//! [`WorkoutSession::on_clock_tick`] when its timers fire, passing the
//! generation the timer was armed with. A fire whose generation no longer
//! matches is ignored, so callbacks always act on current state.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::{debug, info};

use super::clock::{ClockTick, WorkoutClock};
use super::playback::{PlaybackEvent, PlaybackMachine, PlaybackState};
use super::rotation::{hold_duration, RotationPicker};
use crate::config::WorkoutConfig;
use crate::moves::{Move, MoveCatalog, MoveId, Quantity, Sequence, SequenceId, SequenceLibrary};

pub const MIN_SPEED: f64 = 0.5;
pub const MAX_SPEED: f64 = 2.0;

/// Result of a move timer firing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveAdvance {
    /// The timer was armed for an older generation
    Stale,
    Advanced { completed: MoveId, next: MoveId },
    /// Nothing left to draw; playback stopped
    Exhausted { completed: MoveId },
}

/// Result of a clock tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockAdvance {
    Stale,
    Running { elapsed: u32 },
    Completed,
}

/// Point-in-time view of a session for rendering collaborators
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub state: PlaybackState,
    pub current_move: Option<Move>,
    pub move_generation: u64,
    pub elapsed_seconds: u32,
    pub remaining_seconds: u32,
    pub workout_duration_minutes: u32,
    pub playback_speed: f64,
    pub selected_moves: Vec<Move>,
    pub completion_counts: BTreeMap<MoveId, u32>,
}

impl SessionSnapshot {
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn completion_count(&self, id: MoveId) -> u32 {
        self.completion_counts.get(&id).copied().unwrap_or(0)
    }
}

#[derive(Debug)]
pub struct WorkoutSession {
    session_id: String,
    catalog: MoveCatalog,
    library: SequenceLibrary,
    playback: PlaybackMachine,
    picker: RotationPicker,
    clock: WorkoutClock,
    current_move: Option<Move>,
    move_generation: u64,
    clock_generation: u64,
    playback_speed: f64,
    completion_counts: HashMap<MoveId, u32>,
    min_minutes: u32,
    max_minutes: u32,
}

impl WorkoutSession {
    pub fn new(session_id: &str, config: &WorkoutConfig) -> Self {
        let catalog = MoveCatalog::default();
        let library = SequenceLibrary::with_defaults(&catalog);
        let minutes = config
            .default_minutes
            .clamp(config.min_minutes, config.max_minutes.max(config.min_minutes));
        let speed = if is_valid_speed(config.default_speed) {
            config.default_speed
        } else {
            1.0
        };

        Self {
            session_id: session_id.to_string(),
            catalog,
            library,
            playback: PlaybackMachine::new(session_id),
            picker: RotationPicker::from_seed(config.rng_seed),
            clock: WorkoutClock::new(minutes),
            current_move: None,
            move_generation: 0,
            clock_generation: 0,
            playback_speed: speed,
            completion_counts: HashMap::new(),
            min_minutes: config.min_minutes,
            max_minutes: config.max_minutes,
        }
    }

    pub fn with_catalog(mut self, catalog: MoveCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_library(mut self, library: SequenceLibrary) -> Self {
        self.library = library;
        self
    }

    pub fn with_picker(mut self, picker: RotationPicker) -> Self {
        self.picker = picker;
        self
    }

    // ---- catalog commands ----

    pub fn toggle_selection(&mut self, id: MoveId) -> bool {
        self.catalog.toggle(id)
    }

    /// Deselect everything and return to a clean idle session
    pub fn clear_selection(&mut self) {
        self.catalog.deselect_all();
        self.reset_workout();
    }

    pub fn add_custom_move(&mut self, name: &str, duration_secs: u32) -> Option<MoveId> {
        self.catalog.add_custom(name, duration_secs)
    }

    pub fn set_move_goal(&mut self, id: MoveId, quantity: Quantity) -> bool {
        self.catalog.set_goal(id, quantity)
    }

    // ---- sequence commands ----

    pub fn save_as_sequence(&mut self, name: &str) -> Option<SequenceId> {
        let selected = self.catalog.selected();
        self.library.save(name, selected)
    }

    pub fn load_sequence(&mut self, id: SequenceId) -> bool {
        if !self.library.apply(id, &mut self.catalog) {
            return false;
        }
        self.reset_workout();
        true
    }

    // ---- settings ----

    /// Applies to the next armed move; a move already on screen keeps its hold
    pub fn set_playback_speed(&mut self, speed: f64) -> bool {
        if !is_valid_speed(speed) {
            debug!(speed, "Rejecting playback speed outside [0.5, 2.0]");
            return false;
        }
        self.playback_speed = speed;
        debug!(speed, "Playback speed updated");
        true
    }

    pub fn set_workout_duration(&mut self, minutes: u32) -> bool {
        if minutes < self.min_minutes || minutes > self.max_minutes {
            debug!(
                minutes,
                min = self.min_minutes,
                max = self.max_minutes,
                "Rejecting workout duration"
            );
            return false;
        }
        if self.clock.set_duration_minutes(minutes) {
            info!(minutes, "New duration already elapsed, completing workout");
            self.complete();
        }
        true
    }

    // ---- playback commands ----

    pub fn start_workout(&mut self) -> bool {
        let selected = self.catalog.selected();
        if selected.is_empty() {
            debug!("Ignoring start with no moves selected");
            return false;
        }
        if self.playback.is_playing() {
            return false;
        }

        self.playback.handle(PlaybackEvent::Start);
        if self.current_move.is_none() {
            self.current_move = self.picker.pick(&selected, None);
            if let Some(m) = &self.current_move {
                info!(move_id = %m.id, name = %m.name, "Initial move");
            }
        }
        // A resumed move is held for its full duration again
        self.move_generation += 1;
        self.clock_generation += 1;
        info!(
            selected = selected.len(),
            elapsed = self.clock.elapsed_seconds(),
            "Playing workout"
        );
        true
    }

    pub fn pause_workout(&mut self) -> bool {
        if !self.playback.is_playing() {
            return false;
        }
        self.playback.handle(PlaybackEvent::Pause);
        self.move_generation += 1;
        self.clock_generation += 1;
        true
    }

    pub fn reset_workout(&mut self) {
        self.playback.handle(PlaybackEvent::Stop);
        self.current_move = None;
        self.clock.reset();
        self.completion_counts.clear();
        self.move_generation += 1;
        self.clock_generation += 1;
        info!(session_id = %self.session_id, "Workout reset");
    }

    // ---- timer callbacks ----

    pub fn on_move_timer(&mut self, generation: u64) -> MoveAdvance {
        if generation != self.move_generation || !self.playback.is_playing() {
            return MoveAdvance::Stale;
        }
        let Some(finished) = self.current_move.take() else {
            return MoveAdvance::Stale;
        };

        let count = self.completion_counts.entry(finished.id).or_insert(0);
        *count += 1;
        let target = finished.quantity;
        info!(
            move_id = %finished.id,
            name = %finished.name,
            completed = *count,
            target = %target,
            "Move completed"
        );

        let selected = self.catalog.selected();
        self.move_generation += 1;
        match self.picker.pick(&selected, Some(finished.id)) {
            Some(next) => {
                info!(move_id = %next.id, name = %next.name, "Next move");
                let next_id = next.id;
                self.current_move = Some(next);
                MoveAdvance::Advanced {
                    completed: finished.id,
                    next: next_id,
                }
            }
            None => {
                info!("No moves selected, stopping workout");
                self.playback.handle(PlaybackEvent::Stop);
                self.clock_generation += 1;
                MoveAdvance::Exhausted {
                    completed: finished.id,
                }
            }
        }
    }

    pub fn on_clock_tick(&mut self, generation: u64) -> ClockAdvance {
        if generation != self.clock_generation || !self.playback.is_playing() {
            return ClockAdvance::Stale;
        }
        match self.clock.tick() {
            ClockTick::Running { elapsed } => ClockAdvance::Running { elapsed },
            ClockTick::Completed => {
                info!(
                    minutes = self.clock.duration_minutes(),
                    "Workout complete"
                );
                self.complete();
                ClockAdvance::Completed
            }
        }
    }

    /// Completion returns to a clean idle state; counts are kept for review
    fn complete(&mut self) {
        self.playback.handle(PlaybackEvent::Stop);
        self.current_move = None;
        self.clock.reset();
        self.move_generation += 1;
        self.clock_generation += 1;
    }

    // ---- queries ----

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn available_moves(&self) -> &[Move] {
        self.catalog.moves()
    }

    pub fn selected_moves(&self) -> Vec<Move> {
        self.catalog.selected()
    }

    pub fn catalog(&self) -> &MoveCatalog {
        &self.catalog
    }

    pub fn saved_sequences(&self) -> &[Sequence] {
        self.library.sequences()
    }

    pub fn library(&self) -> &SequenceLibrary {
        &self.library
    }

    pub fn current_move(&self) -> Option<&Move> {
        self.current_move.as_ref()
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback.state()
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    pub fn playback_speed(&self) -> f64 {
        self.playback_speed
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.clock.elapsed_seconds()
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.clock.remaining_seconds()
    }

    pub fn progress_percent(&self) -> f64 {
        self.clock.progress_percent()
    }

    pub fn workout_duration_minutes(&self) -> u32 {
        self.clock.duration_minutes()
    }

    pub fn completion_count(&self, id: MoveId) -> u32 {
        self.completion_counts.get(&id).copied().unwrap_or(0)
    }

    /// Completed count against the move's goal
    pub fn goal_progress(&self, id: MoveId) -> Option<(u32, Quantity)> {
        self.catalog
            .get(id)
            .map(|m| (self.completion_count(id), m.quantity))
    }

    pub fn goal_reached(&self, id: MoveId) -> bool {
        match self.goal_progress(id) {
            Some((count, Quantity::Goal(target))) => count >= target,
            _ => false,
        }
    }

    pub fn move_generation(&self) -> u64 {
        self.move_generation
    }

    pub fn clock_generation(&self) -> u64 {
        self.clock_generation
    }

    /// Hold for the move on screen at the current speed
    pub fn current_hold(&self) -> Option<Duration> {
        self.current_move
            .as_ref()
            .map(|m| hold_duration(m.duration_secs, self.playback_speed))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id.clone(),
            state: self.playback.state(),
            current_move: self.current_move.clone(),
            move_generation: self.move_generation,
            elapsed_seconds: self.clock.elapsed_seconds(),
            remaining_seconds: self.clock.remaining_seconds(),
            workout_duration_minutes: self.clock.duration_minutes(),
            playback_speed: self.playback_speed,
            selected_moves: self.catalog.selected(),
            completion_counts: self
                .completion_counts
                .iter()
                .map(|(id, count)| (*id, *count))
                .collect(),
        }
    }
}

fn is_valid_speed(speed: f64) -> bool {
    speed.is_finite() && (MIN_SPEED..=MAX_SPEED).contains(&speed)
}
