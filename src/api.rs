//! Backend API boundary.
//!
//! The stores never talk HTTP directly; they call through the [`BrainApi`]
//! capability trait. [`HttpApi`] is the production implementation over
//! reqwest; tests substitute their own. Wire shapes (`_id` fields, mixed tag
//! representations) are normalized here so nothing heterogeneous leaks into
//! the stores.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::config::Config;
use crate::error::Error;
use crate::model::tags::{TagInput, normalize_all};
use crate::model::types::{
    ContentDraft, ContentItem, ContentType, Credentials, Filter, ScoredResult,
};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// One page of semantic search results.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchPage {
    pub results: Vec<ScoredResult>,
    pub total_results: usize,
}

/// A read-only snapshot fetched through a share identifier.
#[derive(Clone, Debug, PartialEq)]
pub struct SharedSnapshot {
    pub items: Vec<ContentItem>,
    pub owner_name: String,
}

/// Everything the synchronization core needs from the backend.
///
/// Implementations own transport concerns (timeouts included); the stores
/// treat any transport failure as [`Error::Network`].
#[async_trait]
pub trait BrainApi: Send + Sync {
    async fn sign_in(&self, credentials: &Credentials) -> Result<String, Error>;
    async fn sign_up(&self, credentials: &Credentials) -> Result<(), Error>;

    async fn list_content(&self, token: &str, filter: Filter) -> Result<Vec<ContentItem>, Error>;
    async fn create_content(&self, token: &str, draft: &ContentDraft)
    -> Result<ContentItem, Error>;
    async fn update_content(
        &self,
        token: &str,
        id: &str,
        draft: &ContentDraft,
    ) -> Result<ContentItem, Error>;
    async fn delete_content(&self, token: &str, id: &str) -> Result<(), Error>;

    async fn search(&self, token: &str, query: &str) -> Result<SearchPage, Error>;
    async fn suggest(&self, token: &str, prefix: &str) -> Result<Vec<String>, Error>;

    async fn create_share(&self, token: &str) -> Result<String, Error>;
    async fn read_share(&self, share_id: &str) -> Result<SharedSnapshot, Error>;
}

// ============================================================================
// Wire shapes
// ============================================================================

/// A content item as the backend sends it: `_id`, `type`, and tags in
/// whatever shape the producer used.
#[derive(Debug, Deserialize)]
struct WireContentItem {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "type")]
    content_type: ContentType,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    tags: Vec<TagInput>,
    #[serde(rename = "createdAt", default)]
    created_at: Option<DateTime<Utc>>,
}

impl WireContentItem {
    fn into_item(self) -> ContentItem {
        ContentItem {
            id: self.id,
            content_type: self.content_type,
            title: self.title,
            link: self.link,
            description: self.description,
            tags: normalize_all(self.tags),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireScoredItem {
    #[serde(flatten)]
    item: WireContentItem,
    #[serde(rename = "relevanceScore", default)]
    relevance_score: f64,
}

impl WireScoredItem {
    fn into_result(self) -> ScoredResult {
        ScoredResult {
            item: self.item.into_item(),
            relevance_score: self.relevance_score.clamp(0.0, 1.0),
        }
    }
}

#[derive(Deserialize)]
struct SignInResponse {
    token: String,
}

#[derive(Deserialize)]
struct ContentListResponse {
    content: Vec<WireContentItem>,
}

#[derive(Deserialize)]
struct ContentResponse {
    content: WireContentItem,
}

#[derive(Deserialize)]
struct SearchResponse {
    results: Vec<WireScoredItem>,
    #[serde(rename = "totalResults", default)]
    total_results: usize,
}

#[derive(Deserialize)]
struct SuggestResponse {
    suggestions: Vec<String>,
}

#[derive(Deserialize)]
struct ShareCreateResponse {
    data: ShareHash,
}

#[derive(Deserialize)]
struct ShareHash {
    hash: String,
}

#[derive(Deserialize)]
struct ShareReadResponse {
    username: String,
    content: Vec<WireContentItem>,
}

// ============================================================================
// HTTP implementation
// ============================================================================

/// reqwest-backed [`BrainApi`] against the configured backend base URL.
#[derive(Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;
        let base_url = config.backend_url.trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map an HTTP status to the error taxonomy. 409 on signup means the
    /// username is taken, which the caller surfaces without detail.
    fn classify_status(status: reqwest::StatusCode, body: &str) -> Error {
        match status.as_u16() {
            401 | 403 | 409 => Error::Auth,
            404 => Error::NotFound,
            500..=599 => Error::Server(format!("{status}: {body}")),
            other => Error::Server(format!("unexpected status {other}: {body}")),
        }
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, Error> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        if !status.is_success() {
            return Err(Self::classify_status(status, &body));
        }
        serde_json::from_str(&body).map_err(|e| Error::Server(format!("malformed response: {e}")))
    }

    fn transport(e: reqwest::Error) -> Error {
        Error::Network(e.to_string())
    }
}

#[async_trait]
impl BrainApi for HttpApi {
    async fn sign_in(&self, credentials: &Credentials) -> Result<String, Error> {
        let response = self
            .client
            .post(self.url("/api/v1/signin"))
            .json(credentials)
            .send()
            .await
            .map_err(Self::transport)?;
        let parsed: SignInResponse = Self::parse(response).await?;
        Ok(parsed.token)
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<(), Error> {
        let response = self
            .client
            .post(self.url("/api/v1/signup"))
            .json(credentials)
            .send()
            .await
            .map_err(Self::transport)?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Self::classify_status(status, &body))
        }
    }

    async fn list_content(&self, token: &str, filter: Filter) -> Result<Vec<ContentItem>, Error> {
        let mut request = self
            .client
            .get(self.url("/api/v1/content"))
            .header("Authorization", token);
        if let Some(kind) = filter.as_query() {
            request = request.query(&[("type", kind)]);
        }
        let response = request.send().await.map_err(Self::transport)?;
        let parsed: ContentListResponse = Self::parse(response).await?;
        Ok(parsed.content.into_iter().map(WireContentItem::into_item).collect())
    }

    async fn create_content(
        &self,
        token: &str,
        draft: &ContentDraft,
    ) -> Result<ContentItem, Error> {
        let response = self
            .client
            .post(self.url("/api/v1/content"))
            .header("Authorization", token)
            .json(draft)
            .send()
            .await
            .map_err(Self::transport)?;
        let parsed: ContentResponse = Self::parse(response).await?;
        Ok(parsed.content.into_item())
    }

    async fn update_content(
        &self,
        token: &str,
        id: &str,
        draft: &ContentDraft,
    ) -> Result<ContentItem, Error> {
        let response = self
            .client
            .put(self.url(&format!("/api/v1/content/{id}")))
            .header("Authorization", token)
            .json(draft)
            .send()
            .await
            .map_err(Self::transport)?;
        let parsed: ContentResponse = Self::parse(response).await?;
        Ok(parsed.content.into_item())
    }

    async fn delete_content(&self, token: &str, id: &str) -> Result<(), Error> {
        let response = self
            .client
            .delete(self.url(&format!("/api/v1/content/{id}")))
            .header("Authorization", token)
            .send()
            .await
            .map_err(Self::transport)?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Self::classify_status(status, &body))
        }
    }

    async fn search(&self, token: &str, query: &str) -> Result<SearchPage, Error> {
        let response = self
            .client
            .get(self.url("/api/v1/search"))
            .header("Authorization", token)
            .query(&[("query", query)])
            .send()
            .await
            .map_err(Self::transport)?;
        let parsed: SearchResponse = Self::parse(response).await?;
        Ok(SearchPage {
            results: parsed.results.into_iter().map(WireScoredItem::into_result).collect(),
            total_results: parsed.total_results,
        })
    }

    async fn suggest(&self, token: &str, prefix: &str) -> Result<Vec<String>, Error> {
        let response = self
            .client
            .get(self.url("/api/v1/search/suggestions"))
            .header("Authorization", token)
            .query(&[("prefix", prefix)])
            .send()
            .await
            .map_err(Self::transport)?;
        let parsed: SuggestResponse = Self::parse(response).await?;
        Ok(parsed.suggestions)
    }

    async fn create_share(&self, token: &str) -> Result<String, Error> {
        let response = self
            .client
            .post(self.url("/api/v1/brain/share"))
            .header("Authorization", token)
            .json(&json!({ "share": true }))
            .send()
            .await
            .map_err(Self::transport)?;
        let parsed: ShareCreateResponse = Self::parse(response).await?;
        Ok(parsed.data.hash)
    }

    async fn read_share(&self, share_id: &str) -> Result<SharedSnapshot, Error> {
        let response = self
            .client
            .get(self.url(&format!("/api/v1/brain/{share_id}")))
            .send()
            .await
            .map_err(Self::transport)?;
        let parsed: ShareReadResponse = Self::parse(response).await?;
        Ok(SharedSnapshot {
            owner_name: parsed.username,
            items: parsed.content.into_iter().map(WireContentItem::into_item).collect(),
        })
    }
}
