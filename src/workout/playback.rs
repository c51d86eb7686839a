use serde::{Deserialize, Serialize};
use statig::prelude::*;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    Start,
    Pause,
    /// Reset or completion; always returns to idle
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Idle,
    Playing,
    Paused,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "idle"),
            PlaybackState::Playing => write!(f, "playing"),
            PlaybackState::Paused => write!(f, "paused"),
        }
    }
}

#[derive(Default)]
pub struct Playback {
    pub session_id: String,
}

#[state_machine(initial = "State::idle()", state(derive(Debug, Clone, PartialEq, Eq)))]
impl Playback {
    #[state]
    fn idle(&mut self, event: &PlaybackEvent) -> Outcome<State> {
        match event {
            PlaybackEvent::Start => {
                tracing::info!(session_id = %self.session_id, "Workout started");
                Transition(State::playing())
            }
            _ => Handled,
        }
    }

    #[state]
    fn playing(&mut self, event: &PlaybackEvent) -> Outcome<State> {
        match event {
            PlaybackEvent::Pause => {
                tracing::info!(session_id = %self.session_id, "Workout paused");
                Transition(State::paused())
            }
            PlaybackEvent::Stop => {
                tracing::info!(session_id = %self.session_id, "Workout stopped");
                Transition(State::idle())
            }
            PlaybackEvent::Start => Handled,
        }
    }

    #[state]
    fn paused(&mut self, event: &PlaybackEvent) -> Outcome<State> {
        match event {
            PlaybackEvent::Start => {
                tracing::info!(session_id = %self.session_id, "Workout resumed");
                Transition(State::playing())
            }
            PlaybackEvent::Stop => {
                tracing::info!(session_id = %self.session_id, "Workout stopped while paused");
                Transition(State::idle())
            }
            PlaybackEvent::Pause => Handled,
        }
    }
}

/// Idle → Playing ⇄ Paused → Idle
pub struct PlaybackMachine {
    machine: StateMachine<Playback>,
}

impl fmt::Debug for PlaybackMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackMachine")
            .field("state", &self.state())
            .finish()
    }
}

impl PlaybackMachine {
    pub fn new(session_id: &str) -> Self {
        let machine = Playback {
            session_id: session_id.to_string(),
        }
        .state_machine();
        Self { machine }
    }

    pub fn handle(&mut self, event: PlaybackEvent) -> PlaybackState {
        self.machine.handle(&event);
        self.state()
    }

    pub fn state(&self) -> PlaybackState {
        match self.machine.state() {
            State::Idle {} => PlaybackState::Idle,
            State::Playing {} => PlaybackState::Playing,
            State::Paused {} => PlaybackState::Paused,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state() == PlaybackState::Playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playback_lifecycle() {
        let mut playback = PlaybackMachine::new("test-session");
        assert_eq!(playback.state(), PlaybackState::Idle);

        assert_eq!(playback.handle(PlaybackEvent::Start), PlaybackState::Playing);
        assert_eq!(playback.handle(PlaybackEvent::Pause), PlaybackState::Paused);
        assert_eq!(playback.handle(PlaybackEvent::Start), PlaybackState::Playing);
        assert_eq!(playback.handle(PlaybackEvent::Stop), PlaybackState::Idle);
    }

    #[test]
    fn test_idle_ignores_pause_and_stop() {
        let mut playback = PlaybackMachine::new("test-session");
        assert_eq!(playback.handle(PlaybackEvent::Pause), PlaybackState::Idle);
        assert_eq!(playback.handle(PlaybackEvent::Stop), PlaybackState::Idle);
        assert!(!playback.is_playing());
    }

    #[test]
    fn test_stop_from_paused_returns_to_idle() {
        let mut playback = PlaybackMachine::new("test-session");
        playback.handle(PlaybackEvent::Start);
        playback.handle(PlaybackEvent::Pause);
        assert_eq!(playback.handle(PlaybackEvent::Stop), PlaybackState::Idle);
    }
}
