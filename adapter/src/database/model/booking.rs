use kernel::model::{
    booking::{Booking, BookingEvent, BookingItem},
    id::{BookingId, EventId, ItemId},
};
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct BookingRow {
    pub booking_id: BookingId,
    pub item_id: ItemId,
    pub item_name: String,
    pub event_id: EventId,
    pub event_name: String,
    pub event_start_datetime: DateTime<Utc>,
    pub event_end_datetime: DateTime<Utc>,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(value: BookingRow) -> Self {
        let BookingRow {
            booking_id,
            item_id,
            item_name,
            event_id,
            event_name,
            event_start_datetime,
            event_end_datetime,
            quantity,
            created_at,
        } = value;
        Booking {
            booking_id,
            item: BookingItem {
                item_id,
                name: item_name,
            },
            event: BookingEvent {
                event_id,
                name: event_name,
                start_datetime: event_start_datetime,
                end_datetime: event_end_datetime,
            },
            quantity,
            created_at,
        }
    }
}

// The stored side of a booking update: the immutable item/event references,
// the current quantity, and the event window the capacity check runs against.
#[derive(sqlx::FromRow)]
pub struct StoredBookingRow {
    pub item_id: ItemId,
    pub quantity: i32,
    pub event_start_datetime: DateTime<Utc>,
    pub event_end_datetime: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
pub struct PaginatedBookingRow {
    pub total: i64,
    pub booking_id: BookingId,
}
