use axum::Router;
use registry::AppRegistry;

use super::{
    auth::build_auth_routers, booking::build_booking_routers, category::build_category_routers,
    event::build_event_routers, health::build_health_check_routers, item::build_item_routers,
    user::build_user_routers,
};

pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_health_check_routers())
        .merge(build_auth_routers())
        .merge(build_user_routers())
        .merge(build_category_routers())
        .merge(build_item_routers())
        .merge(build_event_routers())
        .merge(build_booking_routers());

    Router::new().nest("/api/v1", router)
}
