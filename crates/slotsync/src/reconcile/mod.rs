//! Store-driven reconciliation.
//!
//! The pure decisions live in `slotsync_core`; this module owns the awaited
//! store calls between them.

mod orchestrator;
mod resolver;
mod scheduler;
#[cfg(test)]
pub(crate) mod testing;

pub use orchestrator::Reconciler;
pub use resolver::resolve_target;
pub use scheduler::find_slot;
