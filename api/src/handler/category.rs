use axum::{extract::State, Json};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{extractor::AuthorizedUser, model::category::CategoriesResponse};

pub async fn show_category_list(
    _user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<CategoriesResponse>> {
    registry
        .category_repository()
        .find_all()
        .await
        .map(CategoriesResponse::from)
        .map(Json)
}
