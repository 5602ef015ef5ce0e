use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{
    booking::event::DeleteBooking,
    id::{BookingId, EventId, ItemId},
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::{
        booking::{
            BookingResponse, BookingsResponse, CreateBookingRequest, PaginatedBookingResponse,
            UpdateBookingRequest, UpdateBookingRequestWithId,
        },
        list::ListQuery,
    },
};

pub async fn register_booking(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateBookingRequest>,
) -> AppResult<StatusCode> {
    if !user.is_manager() {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate(&())?;

    registry
        .booking_repository()
        .create(req.into())
        .await
        .map(|_| StatusCode::CREATED)
}

pub async fn show_booking_list(
    _user: AuthorizedUser,
    Query(query): Query<ListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<PaginatedBookingResponse>> {
    query.validate(&())?;

    registry
        .booking_repository()
        .find_all(query.into())
        .await
        .map(PaginatedBookingResponse::from)
        .map(Json)
}

pub async fn show_booking(
    _user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingResponse>> {
    registry
        .booking_repository()
        .find_by_id(booking_id)
        .await
        .and_then(|booking| match booking {
            Some(booking) => Ok(Json(booking.into())),
            None => Err(AppError::EntityNotFound(
                "specified booking not found".into(),
            )),
        })
}

pub async fn show_item_booking_list(
    _user: AuthorizedUser,
    Path(item_id): Path<ItemId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingsResponse>> {
    registry
        .booking_repository()
        .find_by_item_id(item_id)
        .await
        .map(BookingsResponse::from)
        .map(Json)
}

pub async fn show_event_booking_list(
    _user: AuthorizedUser,
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingsResponse>> {
    registry
        .booking_repository()
        .find_by_event_id(event_id)
        .await
        .map(BookingsResponse::from)
        .map(Json)
}

pub async fn update_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateBookingRequest>,
) -> AppResult<StatusCode> {
    if !user.is_manager() {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate(&())?;

    registry
        .booking_repository()
        .update(UpdateBookingRequestWithId::new(booking_id, req).into())
        .await
        .map(|_| StatusCode::OK)
}

pub async fn delete_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    if !user.is_manager() {
        return Err(AppError::ForbiddenOperation);
    }

    registry
        .booking_repository()
        .delete(DeleteBooking::new(booking_id))
        .await
        .map(|_| StatusCode::OK)
}
