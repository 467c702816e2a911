mod error;
mod matching;
mod operations;
mod requests;
mod types;

pub use error::ChangeError;
pub use matching::{conflicts_with, event_overlaps, find_target, overlaps, summary_matches};
pub use operations::{
    draft_for_change, effective_time_zone, validate_change, validate_time_zone,
};
pub use requests::{ChangeBatch, ChangeKind, ChangeRequest};
pub use types::{CalendarEvent, CalendarId, EventDraft, Principal};
