use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::category::show_category_list;

pub fn build_category_routers() -> Router<AppRegistry> {
    let category_routers = Router::new().route("/", get(show_category_list));

    Router::new().nest("/categories", category_routers)
}
