//! Spoken move announcements
//!
//! The session driver hands every move change to a [`Herald`], which runs the
//! configured [`Announcer`] in its own task. A newer announcement always
//! supersedes one still in flight: the old task is aborted, and for
//! process-backed speech the child program is killed with it.

pub mod speech;

use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

use crate::config::AnnouncerConfig;
use crate::error::AnnounceError;

pub use speech::{LogAnnouncer, SpeechCommandAnnouncer};

/// Renders a move name as speech
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait Announcer: Send + Sync {
    /// Completes when the utterance has finished
    async fn announce(&self, text: &str) -> Result<(), AnnounceError>;
}

/// Build the announcer described by configuration
pub fn from_config(config: &AnnouncerConfig) -> Arc<dyn Announcer> {
    if config.enabled {
        Arc::new(SpeechCommandAnnouncer::new(&config.program, config.args.clone()))
    } else {
        Arc::new(LogAnnouncer)
    }
}

/// Owns the single in-flight announcement task
pub struct Herald {
    announcer: Arc<dyn Announcer>,
    in_flight: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for Herald {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Herald")
            .field("in_flight", &self.is_speaking())
            .finish()
    }
}

impl Herald {
    pub fn new(announcer: Arc<dyn Announcer>) -> Self {
        Self {
            announcer,
            in_flight: None,
        }
    }

    /// Cancel whatever is being spoken and start `text`
    pub fn announce(&mut self, text: &str) {
        self.cancel();
        let announcer = self.announcer.clone();
        let text = text.to_string();
        debug!(text = %text, "Announcing move");
        self.in_flight = Some(tokio::spawn(async move {
            if let Err(e) = announcer.announce(&text).await {
                warn!("Move announcement failed: {}", e);
            }
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            if !handle.is_finished() {
                debug!("Cancelling in-flight announcement");
            }
            handle.abort();
        }
    }

    pub fn is_speaking(&self) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Herald {
    fn drop(&mut self) {
        self.cancel();
    }
}
