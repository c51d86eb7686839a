//! Workout sequencing engine
//!
//! - **Session**: synchronous state and commands ([`session`])
//! - **Playback**: idle/playing/paused state machine ([`playback`])
//! - **Rotation**: random move draws with bounded repeat avoidance ([`rotation`])
//! - **Clock**: elapsed workout time and display helpers ([`clock`])
//! - **Driver**: tokio timers and announcements around a session ([`driver`])
//! - **Context**: explicit session ownership for front ends ([`context`])

pub mod clock;
pub mod context;
pub mod driver;
pub mod playback;
pub mod rotation;
pub mod session;

pub use clock::{format_clock, WorkoutClock};
pub use context::SessionContext;
pub use driver::SessionHandle;
pub use playback::{PlaybackEvent, PlaybackMachine, PlaybackState};
pub use rotation::{hold_duration, hold_seconds, RotationPicker, MAX_RESAMPLES};
pub use session::{ClockAdvance, MoveAdvance, SessionSnapshot, WorkoutSession, MAX_SPEED, MIN_SPEED};
