//! Calendar store implementations.
//!
//! This module provides concrete implementations of the `CalendarStore`
//! trait defined in `slotsync_core::storage`. The backend used by the server
//! is selected at compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `google` (default): Google Calendar REST backend using `reqwest`
//! - `inmemory`: process-local store, data is lost on restart
//!
//! These features are mutually exclusive.
//!
//! # Examples
//!
//! Build with Google Calendar (default):
//! ```bash
//! cargo build -p slotsync
//! ```
//!
//! Build with the in-memory store:
//! ```bash
//! cargo build -p slotsync --no-default-features --features inmemory
//! ```

#[cfg(feature = "google")]
pub mod google;

#[cfg(any(feature = "inmemory", test))]
pub mod inmemory;
