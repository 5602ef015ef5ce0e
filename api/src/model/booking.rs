use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    booking::{
        event::{CreateBooking, UpdateBooking},
        Booking,
    },
    id::{BookingId, EventId, ItemId},
    list::PaginatedList,
};
use serde::{Deserialize, Serialize};

const fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[garde(skip)]
    pub item_id: ItemId,
    #[garde(skip)]
    pub event_id: EventId,
    #[garde(range(min = 1))]
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

impl From<CreateBookingRequest> for CreateBooking {
    fn from(value: CreateBookingRequest) -> Self {
        let CreateBookingRequest {
            item_id,
            event_id,
            quantity,
        } = value;
        CreateBooking {
            item_id,
            event_id,
            quantity,
        }
    }
}

// Item and event are immutable once booked. Requests may still carry them
// (clients resubmit whole forms); they are dropped here and the stored
// references retained.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    #[garde(skip)]
    pub item_id: Option<ItemId>,
    #[garde(skip)]
    pub event_id: Option<EventId>,
    #[garde(inner(range(min = 1)))]
    pub quantity: Option<i32>,
}

#[derive(new)]
pub struct UpdateBookingRequestWithId(BookingId, UpdateBookingRequest);

impl From<UpdateBookingRequestWithId> for UpdateBooking {
    fn from(value: UpdateBookingRequestWithId) -> Self {
        let UpdateBookingRequestWithId(
            booking_id,
            UpdateBookingRequest {
                item_id: _,
                event_id: _,
                quantity,
            },
        ) = value;
        UpdateBooking {
            booking_id,
            quantity,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingsResponse {
    pub items: Vec<BookingResponse>,
}

impl From<Vec<Booking>> for BookingsResponse {
    fn from(value: Vec<Booking>) -> Self {
        Self {
            items: value.into_iter().map(BookingResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: BookingId,
    pub item_id: ItemId,
    pub item_name: String,
    pub event_id: EventId,
    pub event_name: String,
    pub event_start_datetime: DateTime<Utc>,
    pub event_end_datetime: DateTime<Utc>,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(value: Booking) -> Self {
        let Booking {
            booking_id,
            item,
            event,
            quantity,
            created_at,
        } = value;
        Self {
            id: booking_id,
            item_id: item.item_id,
            item_name: item.name,
            event_id: event.event_id,
            event_name: event.name,
            event_start_datetime: event.start_datetime,
            event_end_datetime: event.end_datetime,
            quantity,
            created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedBookingResponse {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub items: Vec<BookingResponse>,
}

impl From<PaginatedList<Booking>> for PaginatedBookingResponse {
    fn from(value: PaginatedList<Booking>) -> Self {
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
            items: items.into_iter().map(BookingResponse::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_drops_item_and_event_changes() {
        let booking_id = BookingId::new();
        let req: UpdateBookingRequest = serde_json::from_value(serde_json::json!({
            "itemId": ItemId::new(),
            "eventId": EventId::new(),
            "quantity": 4,
        }))
        .unwrap();

        let update = UpdateBooking::from(UpdateBookingRequestWithId::new(booking_id, req));
        assert_eq!(update.booking_id, booking_id);
        assert_eq!(update.quantity, Some(4));
        // No item/event fields exist on the kernel event to smuggle a change
        // through.
    }

    #[test]
    fn create_request_quantity_defaults_to_one() {
        let req: CreateBookingRequest = serde_json::from_value(serde_json::json!({
            "itemId": ItemId::new(),
            "eventId": EventId::new(),
        }))
        .unwrap();
        assert_eq!(req.quantity, 1);
    }
}
