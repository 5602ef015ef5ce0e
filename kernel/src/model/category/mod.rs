use crate::model::id::CategoryId;

#[derive(Debug, Clone)]
pub struct Category {
    pub category_id: CategoryId,
    pub name: String,
}
