//! Core types and pure logic for slotsync.
//!
//! Everything in this crate is free of I/O: the calendar store is described
//! by the [`storage::CalendarStore`] trait and driven by the server crate.

pub mod calendar;
pub mod reconcile;
pub mod schedule;
pub mod serde;
pub mod storage;
