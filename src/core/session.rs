use std::sync::Arc;

use tokio::sync::mpsc;

use super::HortasError;
use crate::persistence::CredentialStore;

pub const TOKEN_KEY: &str = "hortas_token";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn,
    SignedOut,
    /// The API rejected the stored credential.
    Expired { status: u16 },
}

/// Owns the single credential token. Nothing else reads the store.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn CredentialStore>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn CredentialStore>) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        (Self { store, events }, receiver)
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|token| !token.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn set_token(&self, token: &str) -> Result<(), HortasError> {
        self.store.set(TOKEN_KEY, token)?;
        let _ = self.events.send(SessionEvent::SignedIn);
        Ok(())
    }

    pub fn clear(&self) -> Result<(), HortasError> {
        self.store.remove(TOKEN_KEY)
    }

    pub fn sign_out(&self) -> Result<(), HortasError> {
        self.clear()?;
        let _ = self.events.send(SessionEvent::SignedOut);
        Ok(())
    }

    /// Hook for the dispatch layer on 401/403 responses.
    pub fn expire(&self, status: u16) {
        if let Err(e) = self.clear() {
            tracing::error!(error = %e, "failed to clear stored credential");
        }
        tracing::warn!(status, "session expired");
        let _ = self.events.send(SessionEvent::Expired { status });
    }

    /// Expires the session only while `sent` is still the stored token.
    /// Rejections of a credential that has since been replaced are ignored.
    pub fn expire_if_current(&self, sent: Option<&str>, status: u16) -> bool {
        if self.token().as_deref() != sent {
            tracing::debug!(status, "ignoring rejection of a replaced credential");
            return false;
        }

        self.expire(status);
        true
    }
}
