//! Shared test double for the backend API.
//!
//! Per-call delays are configurable so tests can force responses to arrive
//! out of order; call logs let them assert how many requests actually went
//! over the wire.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use brainbox::{
    Brain, BrainApi, Config, ContentDraft, ContentItem, ContentType, Credentials, Error, Filter,
    ScoredResult, SearchPage, SharedSnapshot, Tag,
};

pub const GOOD_USER: &str = "alice";
pub const GOOD_PASSWORD: &str = "secret";
pub const TOKEN: &str = "token-1";
pub const PUBLIC_URL: &str = "http://share.test";

#[derive(Default)]
pub struct MockApi {
    items: Mutex<Vec<ContentItem>>,
    next_id: AtomicUsize,

    list_delays: Mutex<HashMap<String, Duration>>,
    search_delays: Mutex<HashMap<String, Duration>>,
    suggest_delays: Mutex<HashMap<String, Duration>>,
    sign_in_delay: Mutex<Option<Duration>>,
    share_delay: Mutex<Option<Duration>>,
    fail_share: Mutex<bool>,

    pub create_calls: AtomicUsize,
    pub share_calls: AtomicUsize,
    pub list_log: Mutex<Vec<String>>,
    pub search_log: Mutex<Vec<String>>,
    pub suggest_log: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn filter_key(filter: Filter) -> String {
        filter.as_query().unwrap_or("all").to_string()
    }

    pub fn set_list_delay(&self, filter: Filter, delay: Duration) {
        self.list_delays.lock().unwrap().insert(Self::filter_key(filter), delay);
    }

    pub fn set_search_delay(&self, query: &str, delay: Duration) {
        self.search_delays.lock().unwrap().insert(query.to_string(), delay);
    }

    pub fn set_suggest_delay(&self, prefix: &str, delay: Duration) {
        self.suggest_delays.lock().unwrap().insert(prefix.to_string(), delay);
    }

    pub fn set_sign_in_delay(&self, delay: Duration) {
        *self.sign_in_delay.lock().unwrap() = Some(delay);
    }

    pub fn set_share_delay(&self, delay: Duration) {
        *self.share_delay.lock().unwrap() = Some(delay);
    }

    pub fn set_fail_share(&self, fail: bool) {
        *self.fail_share.lock().unwrap() = fail;
    }

    pub fn seed(&self, items: Vec<ContentItem>) {
        *self.items.lock().unwrap() = items;
    }

    pub fn server_items(&self) -> Vec<ContentItem> {
        self.items.lock().unwrap().clone()
    }

    fn materialize(&self, draft: &ContentDraft, id: String) -> ContentItem {
        let tags = draft
            .tags
            .iter()
            .enumerate()
            .map(|(i, name)| Tag {
                id: Some(format!("{id}-t{i}")),
                name: name.clone(),
            })
            .collect();
        ContentItem {
            id,
            content_type: draft.content_type,
            title: draft.title.clone(),
            link: draft.link.clone(),
            description: draft.description.clone(),
            tags,
            created_at: None,
        }
    }
}

async fn maybe_sleep(delay: Option<Duration>) {
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl BrainApi for MockApi {
    async fn sign_in(&self, credentials: &Credentials) -> Result<String, Error> {
        let delay = *self.sign_in_delay.lock().unwrap();
        maybe_sleep(delay).await;
        if credentials.username == GOOD_USER && credentials.password == GOOD_PASSWORD {
            Ok(TOKEN.to_string())
        } else {
            Err(Error::Auth)
        }
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<(), Error> {
        if credentials.username == "taken" {
            Err(Error::Auth)
        } else {
            Ok(())
        }
    }

    async fn list_content(&self, token: &str, filter: Filter) -> Result<Vec<ContentItem>, Error> {
        assert_eq!(token, TOKEN);
        let key = Self::filter_key(filter);
        self.list_log.lock().unwrap().push(key.clone());
        let delay = self.list_delays.lock().unwrap().get(&key).copied();
        maybe_sleep(delay).await;

        let items = self.items.lock().unwrap().clone();
        Ok(match filter {
            Filter::All => items,
            Filter::Video => keep(items, ContentType::Video),
            Filter::SocialPost => keep(items, ContentType::SocialPost),
            Filter::Article => keep(items, ContentType::Article),
            Filter::Note => keep(items, ContentType::Note),
        })
    }

    async fn create_content(
        &self,
        token: &str,
        draft: &ContentDraft,
    ) -> Result<ContentItem, Error> {
        assert_eq!(token, TOKEN);
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let item = self.materialize(draft, format!("c{n}"));
        self.items.lock().unwrap().push(item.clone());
        Ok(item)
    }

    async fn update_content(
        &self,
        token: &str,
        id: &str,
        draft: &ContentDraft,
    ) -> Result<ContentItem, Error> {
        assert_eq!(token, TOKEN);
        let mut items = self.items.lock().unwrap();
        let slot = items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(Error::NotFound)?;
        *slot = self.materialize(draft, id.to_string());
        Ok(slot.clone())
    }

    async fn delete_content(&self, token: &str, id: &str) -> Result<(), Error> {
        assert_eq!(token, TOKEN);
        let mut items = self.items.lock().unwrap();
        let index = items
            .iter()
            .position(|i| i.id == id)
            .ok_or(Error::NotFound)?;
        items.remove(index);
        Ok(())
    }

    async fn search(&self, token: &str, query: &str) -> Result<SearchPage, Error> {
        assert_eq!(token, TOKEN);
        self.search_log.lock().unwrap().push(query.to_string());
        let delay = self.search_delays.lock().unwrap().get(query).copied();
        maybe_sleep(delay).await;

        // Synthetic result echoing the query so tests can tell which
        // request's response landed.
        let item = ContentItem {
            id: format!("hit-{query}"),
            content_type: ContentType::Note,
            title: Some(query.to_string()),
            link: None,
            description: Some(format!("result for {query}")),
            tags: vec![Tag { id: Some("t0".into()), name: "found".into() }],
            created_at: None,
        };
        Ok(SearchPage {
            results: vec![ScoredResult { item, relevance_score: 0.9 }],
            total_results: 1,
        })
    }

    async fn suggest(&self, token: &str, prefix: &str) -> Result<Vec<String>, Error> {
        assert_eq!(token, TOKEN);
        self.suggest_log.lock().unwrap().push(prefix.to_string());
        let delay = self.suggest_delays.lock().unwrap().get(prefix).copied();
        maybe_sleep(delay).await;
        Ok(vec![format!("{prefix} ideas"), format!("{prefix} notes")])
    }

    async fn create_share(&self, token: &str) -> Result<String, Error> {
        assert_eq!(token, TOKEN);
        self.share_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.share_delay.lock().unwrap();
        maybe_sleep(delay).await;
        if *self.fail_share.lock().unwrap() {
            Err(Error::Server("share service down".into()))
        } else {
            Ok("hash123".to_string())
        }
    }

    async fn read_share(&self, share_id: &str) -> Result<SharedSnapshot, Error> {
        match share_id {
            "good" => Ok(SharedSnapshot {
                items: self.items.lock().unwrap().clone(),
                owner_name: GOOD_USER.to_string(),
            }),
            "empty" => Ok(SharedSnapshot { items: vec![], owner_name: GOOD_USER.to_string() }),
            _ => Err(Error::NotFound),
        }
    }
}

fn keep(items: Vec<ContentItem>, kind: ContentType) -> Vec<ContentItem> {
    items.into_iter().filter(|i| i.content_type == kind).collect()
}

pub fn brain_with(api: std::sync::Arc<MockApi>) -> Brain {
    Brain::new(&Config::new("http://backend.test", PUBLIC_URL), api)
}

pub async fn signed_in_brain(api: std::sync::Arc<MockApi>) -> Brain {
    let brain = brain_with(api);
    brain
        .sign_in(&Credentials::new(GOOD_USER, GOOD_PASSWORD))
        .await
        .expect("test sign-in");
    brain
}

pub fn note_item(id: &str, description: &str) -> ContentItem {
    ContentItem {
        id: id.to_string(),
        content_type: ContentType::Note,
        title: None,
        link: None,
        description: Some(description.to_string()),
        tags: vec![Tag { id: Some(format!("{id}-t0")), name: "seed".into() }],
        created_at: None,
    }
}

pub fn video_item(id: &str, title: &str) -> ContentItem {
    ContentItem {
        id: id.to_string(),
        content_type: ContentType::Video,
        title: Some(title.to_string()),
        link: Some(format!("https://example.com/{id}")),
        description: Some(format!("video {title}")),
        tags: vec![Tag { id: Some(format!("{id}-t0")), name: "seed".into() }],
        created_at: None,
    }
}

pub fn note_draft(description: &str, tags: &[&str]) -> ContentDraft {
    ContentDraft {
        content_type: ContentType::Note,
        title: None,
        link: None,
        description: Some(description.to_string()),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}
