//! SocialPulse Store — SQLite persistence for social documents and the
//! collection-level analysis written back onto them.

pub mod schema;
pub mod sqlite;
pub mod types;

pub use sqlite::SqliteStore;
pub use types::{CollectionInfo, StoreStats, StoredDocument};
