//! Core type definitions for saved content

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The kind of a saved item. Wire values are kebab-case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    Video,
    SocialPost,
    Article,
    Note,
}

impl ContentType {
    /// Notes are free-form text and are the only kind allowed to omit a link.
    pub fn requires_link(self) -> bool {
        !matches!(self, ContentType::Note)
    }
}

/// Canonical tag reference. All ingestion paths converge to this shape
/// before entering any store; see [`crate::model::tags::normalize`].
///
/// `id` is `None` only for user-typed tags the backend has not resolved yet.
/// Items coming back from the server always carry resolved ids.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "tag")]
    pub name: String,
}

impl Tag {
    pub fn named(name: impl Into<String>) -> Self {
        Self { id: None, name: name.into() }
    }
}

/// A saved item as the stores hold it. Tags are already canonical.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContentItem {
    pub id: String,
    pub content_type: ContentType,
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<Tag>,
    pub created_at: Option<DateTime<Utc>>,
}

/// A search hit: a content item plus its semantic relevance in `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoredResult {
    pub item: ContentItem,
    pub relevance_score: f64,
}

/// Which subset of the collection is fetched and displayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Video,
    SocialPost,
    Article,
    Note,
}

impl Filter {
    /// The `type` query parameter sent to the backend; `All` sends none.
    pub fn as_query(self) -> Option<&'static str> {
        match self {
            Filter::All => None,
            Filter::Video => Some("video"),
            Filter::SocialPost => Some("social-post"),
            Filter::Article => Some("article"),
            Filter::Note => Some("note"),
        }
    }
}

/// Sign-in / sign-up input.
#[derive(Clone, Debug, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

/// User input for create/update, validated locally before any network call.
/// Tags are bare names here; the backend resolves them to ids.
#[derive(Clone, Debug, Serialize)]
pub struct ContentDraft {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

impl ContentDraft {
    /// Pre-flight invariant checks. Failures never reach the network.
    pub fn validate(&self) -> Result<(), Error> {
        if self.tags.iter().all(|t| t.trim().is_empty()) {
            return Err(Error::Validation("at least one tag is required".into()));
        }
        if self.description.as_deref().map_or(true, |d| d.trim().is_empty()) {
            return Err(Error::Validation("description is required".into()));
        }
        if self.content_type.requires_link() {
            if self.title.as_deref().map_or(true, |t| t.trim().is_empty()) {
                return Err(Error::Validation(
                    "title is required for non-note content".into(),
                ));
            }
            if self.link.as_deref().map_or(true, |l| l.trim().is_empty()) {
                return Err(Error::Validation(
                    "link is required for non-note content".into(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note_draft() -> ContentDraft {
        ContentDraft {
            content_type: ContentType::Note,
            title: None,
            link: None,
            description: Some("remember this".into()),
            tags: vec!["ideas".into()],
        }
    }

    #[test]
    fn note_without_link_is_valid() {
        assert!(note_draft().validate().is_ok());
    }

    #[test]
    fn non_note_requires_title_and_link() {
        let mut draft = note_draft();
        draft.content_type = ContentType::Video;
        assert!(matches!(draft.validate(), Err(Error::Validation(_))));

        draft.title = Some("talk".into());
        draft.link = Some("https://example.com/v".into());
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn tags_and_description_are_mandatory() {
        let mut draft = note_draft();
        draft.tags = vec!["  ".into()];
        assert!(matches!(draft.validate(), Err(Error::Validation(_))));

        let mut draft = note_draft();
        draft.description = None;
        assert!(matches!(draft.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn filter_query_values() {
        assert_eq!(Filter::All.as_query(), None);
        assert_eq!(Filter::SocialPost.as_query(), Some("social-post"));
        assert_eq!(Filter::Note.as_query(), Some("note"));
    }

    #[test]
    fn content_type_wire_names_are_kebab_case() {
        let json = serde_json::to_string(&ContentType::SocialPost).unwrap();
        assert_eq!(json, "\"social-post\"");
        let back: ContentType = serde_json::from_str("\"video\"").unwrap();
        assert_eq!(back, ContentType::Video);
    }
}
