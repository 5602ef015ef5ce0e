use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    booking::{
        event::{CreateBooking, DeleteBooking, UpdateBooking},
        Booking,
    },
    id::{BookingId, EventId, ItemId},
    list::{ListOptions, PaginatedList},
};

#[async_trait]
pub trait BookingRepository: Send + Sync {
    // Both writes run the overbooking guard inside their own transaction:
    // the sum of quantities across bookings of the same item whose event
    // windows overlap the candidate window must stay within the item's stock.
    async fn create(&self, event: CreateBooking) -> AppResult<BookingId>;
    async fn update(&self, event: UpdateBooking) -> AppResult<()>;
    async fn delete(&self, event: DeleteBooking) -> AppResult<()>;
    async fn find_all(&self, options: ListOptions) -> AppResult<PaginatedList<Booking>>;
    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>>;
    async fn find_by_item_id(&self, item_id: ItemId) -> AppResult<Vec<Booking>>;
    async fn find_by_event_id(&self, event_id: EventId) -> AppResult<Vec<Booking>>;
}
