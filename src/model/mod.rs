//! Data model: canonical types and the tag normalization boundary

pub mod tags;
pub mod types;

pub use tags::{TagInput, normalize, normalize_all, parse_tag_line};
pub use types::{
    ContentDraft, ContentItem, ContentType, Credentials, Filter, ScoredResult, Tag,
};
