//! brainbox — client-side state synchronization core for a personal
//! content-bookmarking application.
//!
//! Users save references (videos, social posts, articles, notes), tag them,
//! filter and search them semantically, and publish read-only snapshots via
//! share links. This crate owns the state machines that keep all of that
//! consistent with the remote API under concurrent, debounced, and possibly
//! out-of-order asynchronous operations. Rendering, routing, and the HTTP
//! transport are external collaborators.
//!
//! Entry point: build a [`store::Brain`] per client session, subscribe to the
//! stores it exposes, and drive it from UI events.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod store;

pub use api::{BrainApi, HttpApi, SearchPage, SharedSnapshot};
pub use config::Config;
pub use error::Error;
pub use model::types::{
    ContentDraft, ContentItem, ContentType, Credentials, Filter, ScoredResult, Tag,
};
pub use store::Brain;
