use thiserror::Error;

/// Faults raised by the session interface itself.
///
/// Invalid workout input (blank names, unknown ids, out-of-range values) is
/// never an error: those commands are silently ignored. The only failures are
/// usage errors on the surrounding context.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("No workout session is active; initialize the session context first")]
    NotInitialized,
    #[error("A workout session is already active in this context")]
    AlreadyInitialized,
}

/// Failures of the speech announcement collaborator
#[derive(Debug, Error)]
pub enum AnnounceError {
    #[error("Failed to spawn speech program '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Speech program '{program}' exited with status {status}")]
    ExitStatus { program: String, status: String },
}
