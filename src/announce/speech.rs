use async_trait::async_trait;
use tracing::info;

use super::Announcer;
use crate::error::AnnounceError;

/// Speaks through an external text-to-speech program such as `espeak` or
/// `say`. The program is killed if the announcement is cancelled.
#[derive(Debug, Clone)]
pub struct SpeechCommandAnnouncer {
    program: String,
    args: Vec<String>,
}

impl SpeechCommandAnnouncer {
    pub fn new(program: &str, args: Vec<String>) -> Self {
        Self {
            program: program.to_string(),
            args,
        }
    }
}

#[async_trait]
impl Announcer for SpeechCommandAnnouncer {
    async fn announce(&self, text: &str) -> Result<(), AnnounceError> {
        let status = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|source| AnnounceError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(AnnounceError::ExitStatus {
                program: self.program.clone(),
                status: status.to_string(),
            })
        }
    }
}

/// Records announcements in the log only
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAnnouncer;

#[async_trait]
impl Announcer for LogAnnouncer {
    async fn announce(&self, text: &str) -> Result<(), AnnounceError> {
        info!(text, "Move announced");
        Ok(())
    }
}
