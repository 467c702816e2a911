//! Google Calendar storage backend.
//!
//! Talks to the Calendar v3 REST API with `reqwest`. Credentials come from a
//! service account key (signed with `jsonwebtoken`) or a static bearer token.

mod auth;
mod client;
mod conversions;
mod error;

pub use client::GoogleCalendarStore;
