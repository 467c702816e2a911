//! Conversions between Google Calendar JSON and core types.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use slotsync_core::calendar::{CalendarEvent, EventDraft};
use slotsync_core::storage::StoreError;

/// Zone assumed when neither the item nor the calendar names one.
const FALLBACK_ZONE: &str = "UTC";

/// One page of `events.list`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventList {
    #[serde(default)]
    pub items: Vec<GoogleEvent>,
    pub next_page_token: Option<String>,
    /// The calendar's own zone.
    pub time_zone: Option<String>,
}

/// An event resource, reduced to the fields we read.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleEvent {
    pub id: String,
    pub status: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
}

/// Either a timed (`dateTime`) or all-day (`date`) boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

/// Request body for `events.insert` and `events.update`.
#[derive(Debug, Serialize)]
pub struct EventBody<'a> {
    pub summary: &'a str,
    pub description: &'a str,
    pub start: EventTime,
    pub end: EventTime,
}

pub fn to_event_body(draft: &EventDraft) -> EventBody<'_> {
    let boundary = |at: DateTime<FixedOffset>| EventTime {
        date_time: Some(at.to_rfc3339()),
        date: None,
        time_zone: Some(draft.time_zone.clone()),
    };

    EventBody {
        summary: &draft.summary,
        description: &draft.description,
        start: boundary(draft.start),
        end: boundary(draft.end),
    }
}

/// Converts an API item, returning `None` for cancelled events.
pub fn to_calendar_event(
    item: GoogleEvent,
    calendar_zone: Option<&str>,
) -> Result<Option<CalendarEvent>, StoreError> {
    if item.status.as_deref() == Some("cancelled") {
        return Ok(None);
    }

    let missing = |field: &str| StoreError::InvalidData(format!("event {} has no {field}", item.id));
    let start = item.start.as_ref().ok_or_else(|| missing("start"))?;
    let end = item.end.as_ref().ok_or_else(|| missing("end"))?;

    let time_zone = start
        .time_zone
        .as_deref()
        .or(calendar_zone)
        .unwrap_or(FALLBACK_ZONE)
        .to_string();

    Ok(Some(CalendarEvent {
        start: parse_event_time(start, &time_zone)?,
        end: parse_event_time(end, &time_zone)?,
        summary: item.summary.unwrap_or_default(),
        description: item.description.unwrap_or_default(),
        time_zone,
        id: item.id,
    }))
}

/// Reads a boundary; all-day dates become local midnight in `zone`.
fn parse_event_time(time: &EventTime, zone: &str) -> Result<DateTime<FixedOffset>, StoreError> {
    if let Some(date_time) = &time.date_time {
        return DateTime::parse_from_rfc3339(date_time)
            .map_err(|e| StoreError::InvalidData(format!("bad dateTime {date_time}: {e}")));
    }

    let date = time
        .date
        .as_deref()
        .ok_or_else(|| StoreError::InvalidData("event time has neither dateTime nor date".to_string()))?;
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| StoreError::InvalidData(format!("bad date {date}: {e}")))?;
    let zone = time.time_zone.as_deref().unwrap_or(zone);
    let tz: Tz = zone
        .parse()
        .map_err(|_| StoreError::InvalidData(format!("unknown time zone {zone}")))?;

    let midnight = day
        .and_hms_opt(0, 0, 0)
        .and_then(|naive| tz.from_local_datetime(&naive).earliest())
        .ok_or_else(|| StoreError::InvalidData(format!("no local midnight on {date}")))?;
    Ok(midnight.with_timezone(&midnight.offset().fix()))
}
