use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    event::{
        event::{CreateEvent, UpdateEvent},
        Event,
    },
    id::EventId,
    list::PaginatedList,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(skip)]
    pub start_datetime: DateTime<Utc>,
    #[garde(skip)]
    pub end_datetime: DateTime<Utc>,
    #[garde(skip)]
    #[serde(default)]
    pub location: String,
    #[garde(skip)]
    #[serde(default)]
    pub notes: String,
}

impl From<CreateEventRequest> for CreateEvent {
    fn from(value: CreateEventRequest) -> Self {
        let CreateEventRequest {
            name,
            start_datetime,
            end_datetime,
            location,
            notes,
        } = value;
        CreateEvent {
            name,
            start_datetime,
            end_datetime,
            location,
            notes,
        }
    }
}

// Absent fields keep their stored values; the window rule is applied to the
// merged view by the repository.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[garde(inner(length(min = 1)))]
    pub name: Option<String>,
    #[garde(skip)]
    pub start_datetime: Option<DateTime<Utc>>,
    #[garde(skip)]
    pub end_datetime: Option<DateTime<Utc>>,
    #[garde(skip)]
    pub location: Option<String>,
    #[garde(skip)]
    pub notes: Option<String>,
}

#[derive(new)]
pub struct UpdateEventRequestWithId(EventId, UpdateEventRequest);

impl From<UpdateEventRequestWithId> for UpdateEvent {
    fn from(value: UpdateEventRequestWithId) -> Self {
        let UpdateEventRequestWithId(
            event_id,
            UpdateEventRequest {
                name,
                start_datetime,
                end_datetime,
                location,
                notes,
            },
        ) = value;
        UpdateEvent {
            event_id,
            name,
            start_datetime,
            end_datetime,
            location,
            notes,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: EventId,
    pub name: String,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub location: String,
    pub notes: String,
}

impl From<Event> for EventResponse {
    fn from(value: Event) -> Self {
        let Event {
            event_id,
            name,
            start_datetime,
            end_datetime,
            location,
            notes,
        } = value;
        Self {
            id: event_id,
            name,
            start_datetime,
            end_datetime,
            location,
            notes,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedEventResponse {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub items: Vec<EventResponse>,
}

impl From<PaginatedList<Event>> for PaginatedEventResponse {
    fn from(value: PaginatedList<Event>) -> Self {
        let PaginatedList {
            total,
            limit,
            offset,
            items,
        } = value;
        Self {
            total,
            limit,
            offset,
            items: items.into_iter().map(EventResponse::from).collect(),
        }
    }
}
