use chrono::{DateTime, Utc};

use crate::model::id::{BookingId, EventId, ItemId};

pub mod event;

#[derive(Debug)]
pub struct Booking {
    pub booking_id: BookingId,
    pub item: BookingItem,
    pub event: BookingEvent,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct BookingItem {
    pub item_id: ItemId,
    pub name: String,
}

#[derive(Debug)]
pub struct BookingEvent {
    pub event_id: EventId,
    pub name: String,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
}
