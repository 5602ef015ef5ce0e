use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{event::event::DeleteEvent, id::EventId};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::{
        event::{
            CreateEventRequest, EventResponse, PaginatedEventResponse, UpdateEventRequest,
            UpdateEventRequestWithId,
        },
        list::ListQuery,
    },
};

pub async fn register_event(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateEventRequest>,
) -> AppResult<StatusCode> {
    if !user.is_manager() {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate(&())?;

    registry
        .event_repository()
        .create(req.into())
        .await
        .map(|_| StatusCode::CREATED)
}

pub async fn show_event_list(
    _user: AuthorizedUser,
    Query(query): Query<ListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<PaginatedEventResponse>> {
    query.validate(&())?;

    registry
        .event_repository()
        .find_all(query.into())
        .await
        .map(PaginatedEventResponse::from)
        .map(Json)
}

pub async fn show_event(
    _user: AuthorizedUser,
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<EventResponse>> {
    registry
        .event_repository()
        .find_by_id(event_id)
        .await
        .and_then(|event| match event {
            Some(event) => Ok(Json(event.into())),
            None => Err(AppError::EntityNotFound("specified event not found".into())),
        })
}

pub async fn update_event(
    user: AuthorizedUser,
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateEventRequest>,
) -> AppResult<StatusCode> {
    if !user.is_manager() {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate(&())?;

    registry
        .event_repository()
        .update(UpdateEventRequestWithId::new(event_id, req).into())
        .await
        .map(|_| StatusCode::OK)
}

pub async fn delete_event(
    user: AuthorizedUser,
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    if !user.is_manager() {
        return Err(AppError::ForbiddenOperation);
    }

    registry
        .event_repository()
        .delete(DeleteEvent::new(event_id))
        .await
        .map(|_| StatusCode::OK)
}
