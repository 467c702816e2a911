//! In-memory store implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use slotsync_core::calendar::{event_overlaps, CalendarEvent, CalendarId, EventDraft};
use slotsync_core::storage::{CalendarStore, Result, StoreError, TimeWindow};

/// In-memory calendar store.
///
/// Data is not persisted and will be lost when the store is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    calendars: Arc<RwLock<HashMap<CalendarId, Vec<CalendarEvent>>>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an already-stored event, bypassing id assignment.
    #[cfg(test)]
    pub async fn seed(&self, calendar_id: &CalendarId, event: CalendarEvent) {
        let mut calendars = self.calendars.write().await;
        calendars.entry(calendar_id.clone()).or_default().push(event);
    }

    /// Snapshot of a calendar's events in start order.
    #[cfg(test)]
    pub async fn events(&self, calendar_id: &CalendarId) -> Vec<CalendarEvent> {
        let calendars = self.calendars.read().await;
        let mut events = calendars.get(calendar_id).cloned().unwrap_or_default();
        events.sort_by_key(|e| e.start);
        events
    }
}

/// Free-text match in the spirit of a calendar search box.
fn matches_text(event: &CalendarEvent, text: &str) -> bool {
    let needle = text.to_lowercase();
    event.summary.to_lowercase().contains(&needle)
        || event.description.to_lowercase().contains(&needle)
}

fn not_found(id: &str) -> StoreError {
    StoreError::NotFound {
        entity_type: "CalendarEvent",
        id: id.to_string(),
    }
}

#[async_trait]
impl CalendarStore for InMemoryStore {
    async fn list_events(
        &self,
        calendar_id: &CalendarId,
        window: TimeWindow,
        text_filter: Option<&str>,
    ) -> Result<Vec<CalendarEvent>> {
        let calendars = self.calendars.read().await;
        let mut events: Vec<CalendarEvent> = calendars
            .get(calendar_id)
            .map(|events| {
                events
                    .iter()
                    .filter(|e| event_overlaps(e, &window))
                    .filter(|e| text_filter.is_none_or(|text| matches_text(e, text)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        events.sort_by_key(|e| e.start);
        Ok(events)
    }

    async fn insert_event(
        &self,
        calendar_id: &CalendarId,
        draft: &EventDraft,
    ) -> Result<CalendarEvent> {
        let event = CalendarEvent::from_draft(Uuid::new_v4().simple().to_string(), draft);
        let mut calendars = self.calendars.write().await;
        calendars
            .entry(calendar_id.clone())
            .or_default()
            .push(event.clone());
        Ok(event)
    }

    async fn update_event(
        &self,
        calendar_id: &CalendarId,
        event_id: &str,
        draft: &EventDraft,
    ) -> Result<CalendarEvent> {
        let mut calendars = self.calendars.write().await;
        let slot = calendars
            .get_mut(calendar_id)
            .and_then(|events| events.iter_mut().find(|e| e.id == event_id))
            .ok_or_else(|| not_found(event_id))?;
        *slot = CalendarEvent::from_draft(event_id, draft);
        Ok(slot.clone())
    }

    async fn delete_event(&self, calendar_id: &CalendarId, event_id: &str) -> Result<()> {
        let mut calendars = self.calendars.write().await;
        let events = calendars
            .get_mut(calendar_id)
            .ok_or_else(|| not_found(event_id))?;
        let before = events.len();
        events.retain(|e| e.id != event_id);
        if events.len() == before {
            return Err(not_found(event_id));
        }
        Ok(())
    }
}
