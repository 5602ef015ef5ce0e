use derive_new::new;

use crate::model::id::{BookingId, EventId, ItemId};

#[derive(new)]
pub struct CreateBooking {
    pub item_id: ItemId,
    pub event_id: EventId,
    pub quantity: i32,
}

// The booked item and event are immutable once created; only the quantity
// can change. An absent quantity keeps the stored value.
#[derive(new)]
pub struct UpdateBooking {
    pub booking_id: BookingId,
    pub quantity: Option<i32>,
}

#[derive(new)]
pub struct DeleteBooking {
    pub booking_id: BookingId,
}
