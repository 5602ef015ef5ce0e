use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    event::{
        event::{CreateEvent, DeleteEvent, UpdateEvent},
        Event,
    },
    id::EventId,
    list::{ListOptions, PaginatedList},
};

#[async_trait]
pub trait EventRepository: Send + Sync {
    // Implementations must reject windows whose end does not strictly exceed
    // their start, on create and on (partial) update alike.
    async fn create(&self, event: CreateEvent) -> AppResult<EventId>;
    async fn find_all(&self, options: ListOptions) -> AppResult<PaginatedList<Event>>;
    async fn find_by_id(&self, event_id: EventId) -> AppResult<Option<Event>>;
    async fn update(&self, event: UpdateEvent) -> AppResult<()>;
    // Bookings of the event are deleted with it.
    async fn delete(&self, event: DeleteEvent) -> AppResult<()>;
}
