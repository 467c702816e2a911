//! In-memory calendar store.
//!
//! Keeps events in a HashMap wrapped in `Arc<RwLock<_>>`. Useful for local
//! development and as the store behind the reconciler tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use slotsync::storage::inmemory::InMemoryStore;
//!
//! let store = InMemoryStore::new();
//! // Hand it to AppState::new(...)
//! ```

mod repository;

pub use repository::InMemoryStore;
