use kernel::model::{category::Category, id::CategoryId};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesResponse {
    pub items: Vec<CategoryResponse>,
}

impl From<Vec<Category>> for CategoriesResponse {
    fn from(value: Vec<Category>) -> Self {
        Self {
            items: value.into_iter().map(CategoryResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: CategoryId,
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(value: Category) -> Self {
        let Category { category_id, name } = value;
        Self {
            id: category_id,
            name,
        }
    }
}
