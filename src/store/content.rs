//! Content store: the authoritative local copy of the saved-item list.
//!
//! The backend is the single source of truth. Mutations never splice the
//! returned item into the list; they re-fetch it under the current filter so
//! the visible list always carries server-resolved tag ids. List responses
//! are sequence-gated so a slow fetch for a stale filter cannot overwrite a
//! newer one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use crate::api::BrainApi;
use crate::error::Error;
use crate::model::types::{ContentDraft, ContentItem, Filter};
use crate::store::session::SessionStore;

#[derive(Clone, Debug, Default)]
pub struct ContentState {
    pub items: Vec<ContentItem>,
    pub filter: Filter,
    pub loading: bool,
    pub error: Option<Error>,
}

#[derive(Clone)]
pub struct ContentStore {
    api: Arc<dyn BrainApi>,
    session: SessionStore,
    state: Arc<watch::Sender<ContentState>>,
    list_seq: Arc<AtomicU64>,
}

impl ContentStore {
    pub fn new(api: Arc<dyn BrainApi>, session: SessionStore) -> Self {
        let (state, _) = watch::channel(ContentState::default());
        Self {
            api,
            session,
            state: Arc::new(state),
            list_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn snapshot(&self) -> ContentState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ContentState> {
        self.state.subscribe()
    }

    fn require_token(&self) -> Result<String, Error> {
        self.session.token().ok_or(Error::Auth)
    }

    /// Fetch the list for `filter` and replace the local copy wholesale.
    ///
    /// Only the most recently issued list request may mutate state; stale
    /// responses return their payload to the caller but leave the store
    /// untouched. A failed fetch keeps the previous items so a transient
    /// read error never blanks the screen.
    pub async fn list(&self, filter: Filter) -> Result<Vec<ContentItem>, Error> {
        let token = self.require_token()?;
        let seq = self.list_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| {
            s.filter = filter;
            s.loading = true;
        });
        tracing::debug!(?filter, seq, "Fetching content list");

        let outcome = self.api.list_content(&token, filter).await;
        let latest = self.list_seq.load(Ordering::SeqCst) == seq;

        match outcome {
            Ok(items) => {
                if latest {
                    self.state.send_modify(|s| {
                        s.items = items.clone();
                        s.loading = false;
                        s.error = None;
                    });
                    tracing::debug!(count = items.len(), "Content list replaced");
                } else {
                    tracing::debug!(seq, "Dropping stale content list response");
                }
                Ok(items)
            }
            Err(e) => {
                if latest {
                    self.state.send_modify(|s| {
                        s.loading = false;
                        s.error = Some(e.clone());
                    });
                }
                tracing::warn!(error = %e, ?filter, "Content list fetch failed");
                Err(e)
            }
        }
    }

    /// Switch the active filter and refetch immediately.
    pub async fn set_filter(&self, filter: Filter) -> Result<Vec<ContentItem>, Error> {
        self.list(filter).await
    }

    /// Create an item, then re-fetch the list under the current filter.
    ///
    /// Returns the created item as the server resolved it. A failed refetch
    /// does not fail the create; the error lands in the store state.
    pub async fn create(&self, draft: &ContentDraft) -> Result<ContentItem, Error> {
        draft.validate().inspect_err(|e| {
            tracing::debug!(error = %e, "Create rejected before network");
        })?;
        let token = self.require_token()?;

        let item = self.api.create_content(&token, draft).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Create failed");
        })?;
        tracing::info!(id = %item.id, "Content created");

        self.refresh_after_mutation().await;
        Ok(item)
    }

    /// Update an item, then re-fetch. Same refetch semantics as [`create`].
    ///
    /// [`create`]: ContentStore::create
    pub async fn update(&self, id: &str, draft: &ContentDraft) -> Result<ContentItem, Error> {
        draft.validate().inspect_err(|e| {
            tracing::debug!(error = %e, "Update rejected before network");
        })?;
        let token = self.require_token()?;

        let item = self.api.update_content(&token, id, draft).await.inspect_err(|e| {
            tracing::warn!(error = %e, id, "Update failed");
        })?;
        tracing::info!(id = %item.id, "Content updated");

        self.refresh_after_mutation().await;
        Ok(item)
    }

    /// Delete an item after server confirmation, then re-fetch. On failure
    /// the local list is left untouched and the error is returned.
    pub async fn remove(&self, id: &str) -> Result<(), Error> {
        let token = self.require_token()?;

        self.api.delete_content(&token, id).await.inspect_err(|e| {
            tracing::warn!(error = %e, id, "Delete failed");
        })?;
        tracing::info!(id, "Content deleted");

        self.refresh_after_mutation().await;
        Ok(())
    }

    async fn refresh_after_mutation(&self) {
        let filter = self.state.borrow().filter;
        if let Err(e) = self.list(filter).await {
            tracing::warn!(error = %e, "Post-mutation refetch failed; keeping previous list");
        }
    }

    /// Back to the initial empty state. Bumps the sequence counter so any
    /// in-flight list response is guaranteed stale.
    pub fn reset(&self) {
        self.list_seq.fetch_add(1, Ordering::SeqCst);
        self.state.send_modify(|s| *s = ContentState::default());
    }
}
