// Shadow Drill Library - randomized shadow wrestling workouts
// This exposes the core components for testing and integration

pub mod announce;
pub mod cli;
pub mod config;
pub mod error;
pub mod moves;
pub mod telemetry;
pub mod workout;

// Re-export key types for easy access
pub use announce::{Announcer, Herald, LogAnnouncer, SpeechCommandAnnouncer};
pub use config::{AnnouncerConfig, ObservabilityConfig, ShadowDrillConfig, WorkoutConfig};
pub use error::{AnnounceError, SessionError};
pub use moves::{Move, MoveCatalog, MoveId, Quantity, Sequence, SequenceId, SequenceLibrary};
pub use telemetry::{create_session_span, generate_session_id, init_telemetry};
pub use workout::{
    format_clock, PlaybackState, SessionContext, SessionHandle, SessionSnapshot, WorkoutSession,
};
