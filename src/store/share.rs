//! Share workflow: turn the collection into a public read-only link.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use crate::api::BrainApi;
use crate::error::Error;
use crate::store::session::SessionStore;

#[derive(Clone, Debug, Default)]
pub struct ShareState {
    pub share_link: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct ShareStore {
    api: Arc<dyn BrainApi>,
    session: SessionStore,
    state: Arc<watch::Sender<ShareState>>,
    // Bumped on reset; a share response only lands if the generation it
    // started under is still current.
    generation: Arc<AtomicU64>,
    public_url: String,
}

impl ShareStore {
    pub fn new(api: Arc<dyn BrainApi>, session: SessionStore, public_url: String) -> Self {
        let (state, _) = watch::channel(ShareState::default());
        Self {
            api,
            session,
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
            public_url,
        }
    }

    pub fn snapshot(&self) -> ShareState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ShareState> {
        self.state.subscribe()
    }

    /// Ask the backend for a share identifier and build the public URL.
    ///
    /// Single-flight: a second call while one is loading is rejected with
    /// [`Error::ConcurrentOperation`] and issues no network call. On failure
    /// a previous link, if any, stays in place.
    pub async fn generate_share_link(&self) -> Result<String, Error> {
        let token = self.session.token().ok_or(Error::Auth)?;

        let mut rejected = false;
        self.state.send_modify(|s| {
            if s.loading {
                rejected = true;
            } else {
                s.loading = true;
                s.error = None;
            }
        });
        if rejected {
            tracing::debug!("Share link generation already in flight");
            return Err(Error::ConcurrentOperation);
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let outcome = self.api.create_share(&token).await;
        let current = self.generation.load(Ordering::SeqCst) == generation;

        match outcome {
            Ok(hash) => {
                let link = join_share_url(&self.public_url, &hash);
                if current {
                    self.state.send_modify(|s| {
                        s.loading = false;
                        s.share_link = Some(link.clone());
                    });
                    tracing::info!(%link, "Share link generated");
                } else {
                    tracing::debug!("Dropping share response from before reset");
                }
                Ok(link)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Share link generation failed");
                if current {
                    self.state.send_modify(|s| {
                        s.loading = false;
                        s.error = Some(e.to_string());
                    });
                }
                Err(e)
            }
        }
    }

    pub fn clear_share_link(&self) {
        self.state.send_modify(|s| {
            s.share_link = None;
            s.error = None;
        });
    }

    /// Back to the initial state. Bumps the generation so an in-flight
    /// share response cannot repopulate the link afterwards.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.send_modify(|s| *s = ShareState::default());
    }
}

/// Join the public base URL with an opaque share identifier.
fn join_share_url(public_url: &str, hash: &str) -> String {
    format!("{}/share/{}", public_url.trim_end_matches('/'), hash)
}
