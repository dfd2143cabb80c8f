//! Read-only viewer for someone else's shared collection.
//!
//! Keyed by an opaque share identifier instead of a token, with no mutation
//! operations. An expired or unknown identifier is an error state; a valid
//! share with nothing in it is an empty state. Callers render the two
//! differently.

use std::sync::Arc;

use tokio::sync::watch;

use crate::api::{BrainApi, SharedSnapshot};
use crate::error::Error;
use crate::model::types::ContentItem;

#[derive(Clone, Debug, Default)]
pub struct SharedState {
    pub items: Vec<ContentItem>,
    pub owner_name: Option<String>,
    pub loading: bool,
    pub error: Option<Error>,
}

#[derive(Clone)]
pub struct SharedStore {
    api: Arc<dyn BrainApi>,
    state: Arc<watch::Sender<SharedState>>,
}

impl SharedStore {
    pub fn new(api: Arc<dyn BrainApi>) -> Self {
        let (state, _) = watch::channel(SharedState::default());
        Self { api, state: Arc::new(state) }
    }

    pub fn snapshot(&self) -> SharedState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SharedState> {
        self.state.subscribe()
    }

    pub async fn fetch(&self, share_id: &str) -> Result<SharedSnapshot, Error> {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
        tracing::debug!(share_id, "Fetching shared collection");

        match self.api.read_share(share_id).await {
            Ok(snapshot) => {
                self.state.send_modify(|s| {
                    s.items = snapshot.items.clone();
                    s.owner_name = Some(snapshot.owner_name.clone());
                    s.loading = false;
                });
                tracing::debug!(
                    owner = %snapshot.owner_name,
                    count = snapshot.items.len(),
                    "Shared collection loaded"
                );
                Ok(snapshot)
            }
            Err(e) => {
                tracing::warn!(error = %e, share_id, "Shared collection fetch failed");
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.error = Some(e.clone());
                });
                Err(e)
            }
        }
    }
}
