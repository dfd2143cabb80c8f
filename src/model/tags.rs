//! Tag normalization.
//!
//! Tags reach the core in several shapes: bare names typed by the user,
//! `{_id, tag}` records from the backend, and already-canonical values.
//! Everything funnels through [`normalize`] at the boundary so no store ever
//! branches on shape.

use serde::Deserialize;

use super::types::Tag;

/// The heterogeneous shapes a tag may arrive in.
///
/// Deserialized untagged: a JSON string becomes [`TagInput::Name`], an object
/// becomes [`TagInput::Record`] with `_id`/`id` and `tag`/`name` accepted
/// interchangeably.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum TagInput {
    Name(String),
    Record {
        #[serde(default, alias = "_id")]
        id: Option<String>,
        #[serde(default, alias = "tag")]
        name: Option<String>,
    },
}

impl From<Tag> for TagInput {
    fn from(tag: Tag) -> Self {
        TagInput::Record { id: tag.id, name: Some(tag.name) }
    }
}

impl From<&str> for TagInput {
    fn from(name: &str) -> Self {
        TagInput::Name(name.to_string())
    }
}

/// Convert any tag representation into the canonical shape.
///
/// Returns `None` for empty or whitespace-only names; callers filter those
/// out. Bare names carry no id — the backend resolves one on create and the
/// post-mutation refetch brings it back.
pub fn normalize(input: TagInput) -> Option<Tag> {
    let (id, name) = match input {
        TagInput::Name(name) => (None, Some(name)),
        TagInput::Record { id, name } => (id, name),
    };
    let name = name?.trim().to_string();
    if name.is_empty() {
        return None;
    }
    let id = id.filter(|i| !i.trim().is_empty());
    Some(Tag { id, name })
}

/// Normalize a batch, dropping everything that fails to normalize.
pub fn normalize_all(inputs: impl IntoIterator<Item = TagInput>) -> Vec<Tag> {
    inputs.into_iter().filter_map(normalize).collect()
}

/// Split a user-typed comma list into clean tag names.
pub fn parse_tag_line(line: &str) -> Vec<String> {
    line.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
