//! Session store: owns the auth token and nothing else.
//!
//! Every other store reads the token through this handle; only sign-in and
//! sign-out write it. A generation counter detects sign-in responses that
//! were superseded by a later sign-in or sign-out while in flight.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use crate::api::BrainApi;
use crate::error::Error;
use crate::model::types::Credentials;

#[derive(Clone, Debug, Default)]
pub struct SessionState {
    pub token: Option<String>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

#[derive(Clone)]
pub struct SessionStore {
    api: Arc<dyn BrainApi>,
    state: Arc<watch::Sender<SessionState>>,
    // Bumped on every sign-out and sign-in start; a sign-in response only
    // lands if the generation it started under is still current.
    generation: Arc<AtomicU64>,
}

impl SessionStore {
    pub fn new(api: Arc<dyn BrainApi>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            api,
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    /// Authenticate and store the token. If a sign-out or another sign-in
    /// started while this call was in flight, the response is discarded, the
    /// stored token is left as the newer operation set it, and the caller
    /// gets [`Error::Auth`]: the session it asked for no longer exists.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<String, Error> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(username = %credentials.username, "Sign-in started");

        let token = self.api.sign_in(credentials).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Sign-in failed");
        })?;

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("Discarding superseded sign-in response");
            return Err(Error::Auth);
        }
        self.state.send_modify(|s| s.token = Some(token.clone()));
        tracing::info!("Sign-in succeeded");
        Ok(token)
    }

    /// Register a new account. Does not touch the stored token.
    pub async fn sign_up(&self, credentials: &Credentials) -> Result<(), Error> {
        tracing::debug!(username = %credentials.username, "Sign-up started");
        self.api.sign_up(credentials).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Sign-up failed");
        })
    }

    /// Clear the token synchronously. Dependent stores are reset by
    /// [`crate::store::Brain::sign_out`] before any pending response can
    /// observe the old session.
    pub fn sign_out(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.send_modify(|s| s.token = None);
        tracing::info!("Signed out");
    }
}
