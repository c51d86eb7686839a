use crate::error::SessionError;

use super::driver::SessionHandle;

/// Explicit holder for the one session a front end works with.
///
/// Collaborators receive the context by reference and ask it for the session.
/// Asking before [`SessionContext::init`] (or after teardown) is a usage error
/// and fails immediately.
#[derive(Debug, Default)]
pub struct SessionContext {
    session: Option<SessionHandle>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn init(&mut self, handle: SessionHandle) -> Result<&SessionHandle, SessionError> {
        if self.session.is_some() {
            return Err(SessionError::AlreadyInitialized);
        }
        Ok(self.session.insert(handle))
    }

    pub fn session(&self) -> Result<&SessionHandle, SessionError> {
        self.session.as_ref().ok_or(SessionError::NotInitialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    /// Stop timers and speech, then release the session
    pub async fn teardown(&mut self) -> Result<(), SessionError> {
        let handle = self.session.take().ok_or(SessionError::NotInitialized)?;
        handle.teardown().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShadowDrillConfig;
    use crate::moves::MoveId;

    #[test]
    fn test_uninitialized_context_fails_fast() {
        let context = SessionContext::new();
        assert_eq!(context.session().unwrap_err(), SessionError::NotInitialized);
        assert!(!context.is_initialized());
    }

    #[tokio::test]
    async fn test_init_then_use_then_teardown() {
        let mut context = SessionContext::new();
        let handle = SessionHandle::from_config(&ShadowDrillConfig::default());
        context.init(handle.clone()).unwrap();
        assert_eq!(
            context.init(handle).unwrap_err(),
            SessionError::AlreadyInitialized
        );

        let session = context.session().unwrap();
        assert!(session.toggle_selection(MoveId(1)).await);
        assert!(session.start_workout().await);

        context.teardown().await.unwrap();
        assert_eq!(context.session().unwrap_err(), SessionError::NotInitialized);
        assert_eq!(
            context.teardown().await.unwrap_err(),
            SessionError::NotInitialized
        );
    }
}
