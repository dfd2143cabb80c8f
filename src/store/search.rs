//! Search engine: debounced suggestions and full semantic search.
//!
//! Two channels share the query input. Each keystroke bumps an input epoch;
//! a debounce task that wakes to a changed epoch was superseded and issues
//! nothing. Each issued request takes the next sequence number for its
//! channel, and a response is applied only if its number is still the
//! highest issued — responses racing out of order are silently dropped.
//! Nothing is ever aborted mid-flight; the gate makes stale results inert.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;

use crate::api::BrainApi;
use crate::model::types::ScoredResult;
use crate::store::session::SessionStore;

/// Quiet period before a suggestion request fires.
pub const SUGGEST_DEBOUNCE: Duration = Duration::from_millis(300);
/// Quiet period before a full semantic search fires.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Minimum normalized query length for the suggestions channel.
const SUGGEST_MIN_CHARS: usize = 2;

#[derive(Clone, Debug, Default)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<ScoredResult>,
    pub suggestions: Vec<String>,
    pub total_results: usize,
    pub loading: bool,
}

#[derive(Clone)]
pub struct SearchStore {
    api: Arc<dyn BrainApi>,
    session: SessionStore,
    state: Arc<watch::Sender<SearchState>>,
    // Bumped on every keystroke, clear, and close; pending debounce tasks
    // check it on wake and stand down if superseded.
    epoch: Arc<AtomicU64>,
    suggest_seq: Arc<AtomicU64>,
    search_seq: Arc<AtomicU64>,
}

impl SearchStore {
    pub fn new(api: Arc<dyn BrainApi>, session: SessionStore) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            api,
            session,
            state: Arc::new(state),
            epoch: Arc::new(AtomicU64::new(0)),
            suggest_seq: Arc::new(AtomicU64::new(0)),
            search_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn snapshot(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Record a keystroke. Returns immediately; the debounced fetches run as
    /// background tasks and publish through the subscription.
    pub fn set_query(&self, input: &str) {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let trimmed = input.trim().to_string();

        if trimmed.is_empty() {
            // Whitespace clears everything and invalidates in-flight work.
            self.clear_search();
            return;
        }

        self.state.send_modify(|s| s.query = input.to_string());

        if trimmed.chars().count() >= SUGGEST_MIN_CHARS {
            let store = self.clone();
            let prefix = trimmed.clone();
            tokio::spawn(async move {
                store.debounced_suggest(epoch, prefix).await;
            });
        } else {
            // Too short for suggestions: drop what is showing and make any
            // in-flight suggestion response stale.
            self.suggest_seq.fetch_add(1, Ordering::SeqCst);
            self.state.send_modify(|s| s.suggestions.clear());
        }

        let store = self.clone();
        tokio::spawn(async move {
            store.debounced_search(epoch, trimmed).await;
        });
    }

    async fn debounced_suggest(&self, epoch: u64, prefix: String) {
        tokio::time::sleep(SUGGEST_DEBOUNCE).await;
        if self.epoch.load(Ordering::SeqCst) != epoch {
            return; // superseded by a later keystroke
        }
        let Some(token) = self.session.token() else {
            return;
        };

        let seq = self.suggest_seq.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(%prefix, seq, "Fetching search suggestions");

        match self.api.suggest(&token, &prefix).await {
            Ok(suggestions) => {
                if self.suggest_seq.load(Ordering::SeqCst) == seq {
                    self.state.send_modify(|s| s.suggestions = suggestions);
                } else {
                    tracing::debug!(seq, "Dropping stale suggestion response");
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, %prefix, "Suggestion fetch failed");
            }
        }
    }

    async fn debounced_search(&self, epoch: u64, query: String) {
        tokio::time::sleep(SEARCH_DEBOUNCE).await;
        if self.epoch.load(Ordering::SeqCst) != epoch {
            return;
        }
        let Some(token) = self.session.token() else {
            return;
        };

        let seq = self.search_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| s.loading = true);
        tracing::debug!(%query, seq, "Running semantic search");

        match self.api.search(&token, &query).await {
            Ok(page) => {
                if self.search_seq.load(Ordering::SeqCst) == seq {
                    self.state.send_modify(|s| {
                        s.results = page.results;
                        s.total_results = page.total_results;
                        s.loading = false;
                    });
                } else {
                    tracing::debug!(seq, "Dropping stale search response");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, %query, "Semantic search failed");
                if self.search_seq.load(Ordering::SeqCst) == seq {
                    self.state.send_modify(|s| s.loading = false);
                }
            }
        }
    }

    /// The search surface lost focus: pending debounces are abandoned, but
    /// in-flight requests keep running and fall to the sequence gate.
    pub fn close(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }

    /// Reset query, results, and suggestions. Both sequence counters move on
    /// so every in-flight response from before the clear is stale.
    pub fn clear_search(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.suggest_seq.fetch_add(1, Ordering::SeqCst);
        self.search_seq.fetch_add(1, Ordering::SeqCst);
        self.state.send_modify(|s| *s = SearchState::default());
    }

    pub fn reset(&self) {
        self.clear_search();
    }
}
