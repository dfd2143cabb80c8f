//! The per-session aggregate that wires all stores together.

use std::sync::Arc;

use crate::api::{BrainApi, HttpApi};
use crate::config::Config;
use crate::error::Error;
use crate::model::types::Credentials;
use crate::store::content::ContentStore;
use crate::store::search::SearchStore;
use crate::store::session::SessionStore;
use crate::store::share::ShareStore;
use crate::store::shared::SharedStore;

/// One instance per running client session. Construct it at startup, hand
/// clones of the individual stores to whatever surfaces need them.
#[derive(Clone)]
pub struct Brain {
    pub session: SessionStore,
    pub content: ContentStore,
    pub search: SearchStore,
    pub share: ShareStore,
    pub shared: SharedStore,
}

impl Brain {
    pub fn new(config: &Config, api: Arc<dyn BrainApi>) -> Self {
        let session = SessionStore::new(api.clone());
        let content = ContentStore::new(api.clone(), session.clone());
        let search = SearchStore::new(api.clone(), session.clone());
        let share = ShareStore::new(api.clone(), session.clone(), config.public_url.clone());
        let shared = SharedStore::new(api);
        Self { session, content, search, share, shared }
    }

    /// Wire up against the real backend from environment configuration.
    pub fn from_env() -> Result<Self, Error> {
        let config = Config::from_env();
        let api = Arc::new(HttpApi::new(&config)?);
        Ok(Self::new(&config, api))
    }

    pub async fn sign_in(&self, credentials: &Credentials) -> Result<String, Error> {
        self.session.sign_in(credentials).await
    }

    pub async fn sign_up(&self, credentials: &Credentials) -> Result<(), Error> {
        self.session.sign_up(credentials).await
    }

    /// Clear the token and reset every dependent store, synchronously, so no
    /// pending network response can surface state from the old session.
    pub fn sign_out(&self) {
        self.session.sign_out();
        self.content.reset();
        self.search.reset();
        self.share.reset();
    }
}
