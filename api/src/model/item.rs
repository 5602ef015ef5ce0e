use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::{CategoryId, ItemId},
    item::{
        event::{CreateItem, UpdateItem},
        Item,
    },
    list::PaginatedList,
};
use serde::{Deserialize, Serialize};

use crate::model::category::CategoryResponse;

const fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(skip)]
    #[serde(default)]
    pub description: String,
    #[garde(range(min = 0))]
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    #[garde(skip)]
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[garde(skip)]
    #[serde(default)]
    pub color: String,
    #[garde(skip)]
    #[serde(default)]
    pub location: String,
    #[garde(skip)]
    #[serde(default)]
    pub checked_out: bool,
    #[garde(skip)]
    #[serde(default)]
    pub in_repair: bool,
}

impl From<CreateItemRequest> for CreateItem {
    fn from(value: CreateItemRequest) -> Self {
        let CreateItemRequest {
            name,
            description,
            quantity,
            category_id,
            color,
            location,
            checked_out,
            in_repair,
        } = value;
        CreateItem {
            name,
            description,
            quantity,
            category_id,
            color,
            location,
            checked_out,
            in_repair,
        }
    }
}

// Absent fields keep their stored values; a category of `null` clears it.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    #[garde(inner(length(min = 1)))]
    pub name: Option<String>,
    #[garde(skip)]
    pub description: Option<String>,
    #[garde(inner(range(min = 0)))]
    pub quantity: Option<i32>,
    #[garde(skip)]
    #[serde(default)]
    pub category_id: Option<Option<CategoryId>>,
    #[garde(skip)]
    pub color: Option<String>,
    #[garde(skip)]
    pub location: Option<String>,
    #[garde(skip)]
    pub checked_out: Option<bool>,
    #[garde(skip)]
    pub in_repair: Option<bool>,
}

#[derive(new)]
pub struct UpdateItemRequestWithId(ItemId, UpdateItemRequest);

impl From<UpdateItemRequestWithId> for UpdateItem {
    fn from(value: UpdateItemRequestWithId) -> Self {
        let UpdateItemRequestWithId(
            item_id,
            UpdateItemRequest {
                name,
                description,
                quantity,
                category_id,
                color,
                location,
                checked_out,
                in_repair,
            },
        ) = value;
        UpdateItem {
            item_id,
            name,
            description,
            quantity,
            category_id,
            color,
            location,
            checked_out,
            in_repair,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub quantity: i32,
    pub category: Option<CategoryResponse>,
    pub color: String,
    pub location: String,
    pub checked_out: bool,
    pub in_repair: bool,
}

impl From<Item> for ItemResponse {
    fn from(value: Item) -> Self {
        let Item {
            item_id,
            name,
            description,
            quantity,
            category,
            color,
            location,
            checked_out,
            in_repair,
        } = value;
        Self {
            id: item_id,
            name,
            description,
            quantity,
            category: category.map(CategoryResponse::from),
            color,
            location,
            checked_out,
            in_repair,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedItemResponse {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub items: Vec<ItemResponse>,
}

impl From<PaginatedList<Item>> for PaginatedItemResponse {
    fn from(value: PaginatedList<Item>) -> Self {
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
            items: items.into_iter().map(ItemResponse::from).collect(),
        }
    }
}
