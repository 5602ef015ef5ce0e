use chrono::{DateTime, Utc};
use derive_new::new;

use crate::model::id::EventId;

#[derive(new)]
pub struct CreateEvent {
    pub name: String,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub location: String,
    pub notes: String,
}

// Partial update: absent fields keep their stored values. The window rule is
// re-checked against the merged view by the repository.
#[derive(new)]
pub struct UpdateEvent {
    pub event_id: EventId,
    pub name: Option<String>,
    pub start_datetime: Option<DateTime<Utc>>,
    pub end_datetime: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(new)]
pub struct DeleteEvent {
    pub event_id: EventId,
}
