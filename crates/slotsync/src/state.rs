//! Application state with store-based reconciliation.
//!
//! This module defines the shared application state that is passed to all
//! request handlers. It holds the calendar store as a trait object and picks
//! the concrete backend via feature flags.

use std::sync::Arc;

use slotsync_core::schedule::SlotPolicy;
use slotsync_core::storage::CalendarStore;

use crate::config::Config;
use crate::reconcile::Reconciler;

// ============================================================================
// Compile-time feature validation
// ============================================================================

// Storage features: exactly one must be enabled, they are mutually exclusive
#[cfg(all(feature = "google", feature = "inmemory"))]
compile_error!("Cannot enable both 'google' and 'inmemory' storage features");

#[cfg(not(any(feature = "google", feature = "inmemory")))]
compile_error!("Must enable exactly one storage feature: 'google' or 'inmemory'");

/// Shared application state.
///
/// This is cloned for each request handler.
#[derive(Clone)]
pub struct AppState {
    /// Calendar store the batches are applied to.
    pub store: Arc<dyn CalendarStore>,
    pub config: Arc<Config>,
    /// Slot search limits, resolved once from `config`.
    pub policy: SlotPolicy,
}

impl AppState {
    /// Creates a new AppState around an existing store.
    ///
    /// Startup runs `Config::validate` first; a policy that still fails to
    /// resolve here falls back to the defaults.
    pub fn new(store: Arc<dyn CalendarStore>, config: Config) -> Self {
        let policy = config.slot_policy().unwrap_or_else(|error| {
            tracing::warn!(%error, "Invalid slot policy, using defaults");
            SlotPolicy::default()
        });
        Self {
            store,
            config: Arc::new(config),
            policy,
        }
    }

    /// Creates the AppState for the storage backend selected at compile time.
    #[cfg(feature = "google")]
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        use crate::storage::google::GoogleCalendarStore;

        let store = GoogleCalendarStore::from_config(&config)?;
        tracing::info!(base_url = %config.google_calendar_api_base, "Using Google Calendar store");
        Ok(Self::new(Arc::new(store), config))
    }

    /// Creates the AppState for the storage backend selected at compile time.
    #[cfg(feature = "inmemory")]
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        use crate::storage::inmemory::InMemoryStore;

        tracing::info!("Using in-memory store");
        Ok(Self::new(Arc::new(InMemoryStore::new()), config))
    }

    /// Builds a reconciler bound to this state's store and settings.
    pub fn reconciler(&self) -> Reconciler {
        Reconciler::new(self.store.clone(), self.policy)
            .with_default_time_zone(self.config.default_time_zone.clone())
            .with_calendar_override(self.config.calendar_override())
    }
}
