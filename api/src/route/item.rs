use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::{
    booking::show_item_booking_list,
    item::{delete_item, register_item, show_item, show_item_list, update_item},
};

pub fn build_item_routers() -> Router<AppRegistry> {
    let item_routers = Router::new()
        .route("/", post(register_item))
        .route("/", get(show_item_list))
        .route("/:item_id", get(show_item))
        .route("/:item_id", put(update_item))
        .route("/:item_id", patch(update_item))
        .route("/:item_id", delete(delete_item))
        .route("/:item_id/bookings", get(show_item_booking_list));

    Router::new().nest("/items", item_routers)
}
