use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::booking::{
    delete_booking, register_booking, show_booking, show_booking_list, update_booking,
};

pub fn build_booking_routers() -> Router<AppRegistry> {
    let booking_routers = Router::new()
        .route("/", post(register_booking))
        .route("/", get(show_booking_list))
        .route("/:booking_id", get(show_booking))
        .route("/:booking_id", put(update_booking))
        .route("/:booking_id", patch(update_booking))
        .route("/:booking_id", delete(delete_booking));

    Router::new().nest("/bookings", booking_routers)
}
