use kernel::model::{event::Event, id::EventId};
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct EventRow {
    pub event_id: EventId,
    pub name: String,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub location: String,
    pub notes: String,
}

impl From<EventRow> for Event {
    fn from(value: EventRow) -> Self {
        let EventRow {
            event_id,
            name,
            start_datetime,
            end_datetime,
            location,
            notes,
        } = value;
        Event {
            event_id,
            name,
            start_datetime,
            end_datetime,
            location,
            notes,
        }
    }
}

#[derive(sqlx::FromRow)]
pub struct PaginatedEventRow {
    pub total: i64,
    pub event_id: EventId,
}
