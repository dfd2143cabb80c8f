//! State stores: one per concern, each a snapshot + subscription read model.

pub mod brain;
pub mod content;
pub mod search;
pub mod session;
pub mod share;
pub mod shared;

pub use brain::Brain;
pub use content::{ContentState, ContentStore};
pub use search::{SearchState, SearchStore};
pub use session::{SessionState, SessionStore};
pub use share::{ShareState, ShareStore};
pub use shared::{SharedState, SharedStore};
