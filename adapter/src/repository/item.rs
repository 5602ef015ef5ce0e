use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::{
        id::ItemId,
        item::{
            event::{CreateItem, DeleteItem, UpdateItem},
            Item,
        },
        list::{ListOptions, PaginatedList},
    },
    repository::item::ItemRepository,
};
use shared::error::{AppError, AppResult};
use uuid::Uuid;

use crate::database::{
    model::item::{ItemRow, PaginatedItemRow},
    ConnectionPool,
};

#[derive(new)]
pub struct ItemRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ItemRepository for ItemRepositoryImpl {
    async fn create(&self, event: CreateItem) -> AppResult<ItemId> {
        let item_id = ItemId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO items
                (item_id, name, description, quantity, category_id,
                color, location, checked_out, in_repair)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(item_id)
        .bind(&event.name)
        .bind(&event.description)
        .bind(event.quantity)
        .bind(event.category_id)
        .bind(&event.color)
        .bind(&event.location)
        .bind(event.checked_out)
        .bind(event.in_repair)
        .execute(self.db.inner_ref())
        .await
        .map_err(translate_item_write_error)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No item record has been created".into(),
            ));
        }

        Ok(item_id)
    }

    async fn find_all(&self, options: ListOptions) -> AppResult<PaginatedList<Item>> {
        let ListOptions { limit, offset } = options;

        let rows = sqlx::query_as::<_, PaginatedItemRow>(
            r#"
                SELECT COUNT(*) OVER() AS total, item_id
                FROM items
                ORDER BY created_at DESC
                LIMIT $1
                OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let total = rows.first().map(|r| r.total).unwrap_or_default();
        let item_ids = rows
            .into_iter()
            .map(|r| r.item_id.raw())
            .collect::<Vec<Uuid>>();

        let rows = sqlx::query_as::<_, ItemRow>(
            r#"
                SELECT
                    i.item_id,
                    i.name,
                    i.description,
                    i.quantity,
                    i.category_id,
                    c.name AS category_name,
                    i.color,
                    i.location,
                    i.checked_out,
                    i.in_repair
                FROM items AS i
                LEFT OUTER JOIN categories AS c ON i.category_id = c.category_id
                WHERE i.item_id = ANY($1)
                ORDER BY i.created_at DESC
            "#,
        )
        .bind(&item_ids)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(PaginatedList {
            total,
            limit,
            offset,
            items: rows.into_iter().map(Item::from).collect(),
        })
    }

    async fn find_by_id(&self, item_id: ItemId) -> AppResult<Option<Item>> {
        let row = sqlx::query_as::<_, ItemRow>(
            r#"
                SELECT
                    i.item_id,
                    i.name,
                    i.description,
                    i.quantity,
                    i.category_id,
                    c.name AS category_name,
                    i.color,
                    i.location,
                    i.checked_out,
                    i.in_repair
                FROM items AS i
                LEFT OUTER JOIN categories AS c ON i.category_id = c.category_id
                WHERE i.item_id = $1
            "#,
        )
        .bind(item_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Item::from))
    }

    async fn update(&self, event: UpdateItem) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let stored = sqlx::query_as::<_, ItemRow>(
            r#"
                SELECT
                    i.item_id,
                    i.name,
                    i.description,
                    i.quantity,
                    i.category_id,
                    c.name AS category_name,
                    i.color,
                    i.location,
                    i.checked_out,
                    i.in_repair
                FROM items AS i
                LEFT OUTER JOIN categories AS c ON i.category_id = c.category_id
                WHERE i.item_id = $1
            "#,
        )
        .bind(event.item_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .ok_or_else(|| AppError::EntityNotFound("specified item not found".into()))?;

        // Merged view: supplied fields win, everything else keeps its stored
        // value. `Some(None)` clears the category.
        let name = event.name.unwrap_or(stored.name);
        let description = event.description.unwrap_or(stored.description);
        let quantity = event.quantity.unwrap_or(stored.quantity);
        let category_id = event.category_id.unwrap_or(stored.category_id);
        let color = event.color.unwrap_or(stored.color);
        let location = event.location.unwrap_or(stored.location);
        let checked_out = event.checked_out.unwrap_or(stored.checked_out);
        let in_repair = event.in_repair.unwrap_or(stored.in_repair);

        let res = sqlx::query(
            r#"
                UPDATE items
                SET
                    name = $2,
                    description = $3,
                    quantity = $4,
                    category_id = $5,
                    color = $6,
                    location = $7,
                    checked_out = $8,
                    in_repair = $9
                WHERE item_id = $1
            "#,
        )
        .bind(event.item_id)
        .bind(&name)
        .bind(&description)
        .bind(quantity)
        .bind(category_id)
        .bind(&color)
        .bind(&location)
        .bind(checked_out)
        .bind(in_repair)
        .execute(&mut *tx)
        .await
        .map_err(translate_item_write_error)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No item record has been updated".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    async fn delete(&self, event: DeleteItem) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                DELETE FROM items
                WHERE item_id = $1
            "#,
        )
        .bind(event.item_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("specified item not found".into()));
        }

        Ok(())
    }
}

fn translate_item_write_error(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.constraint() == Some("items_category_id_fkey") => {
            AppError::UnprocessableEntity("the specified category does not exist".into())
        }
        _ => AppError::SpecificOperationError(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::category::CategoryRepositoryImpl;
    use kernel::repository::category::CategoryRepository;

    #[sqlx::test(migrations = "../migrations")]
    async fn register_and_fetch_item(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = ItemRepositoryImpl::new(ConnectionPool::new(pool));

        let event = CreateItem::new(
            "Feather Boa".into(),
            "Purple, two meters".into(),
            4,
            None,
            "Purple".into(),
            "Shelf A1".into(),
            false,
            false,
        );
        let item_id = repo.create(event).await?;

        let item = repo.find_by_id(item_id).await?.unwrap();
        assert_eq!(item.name, "Feather Boa");
        assert_eq!(item.quantity, 4);
        assert!(item.category.is_none());
        assert_eq!(item.location, "Shelf A1");

        let list = repo
            .find_all(ListOptions {
                limit: 20,
                offset: 0,
            })
            .await?;
        assert_eq!(list.total, 1);
        assert_eq!(list.items.len(), 1);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn partial_update_merges_with_stored_fields(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = ItemRepositoryImpl::new(ConnectionPool::new(pool));

        let item_id = repo
            .create(CreateItem::new(
                "Top Hat".into(),
                String::new(),
                2,
                None,
                "Black".into(),
                "Bin 7".into(),
                false,
                false,
            ))
            .await?;

        repo.update(UpdateItem::new(
            item_id,
            None,
            None,
            Some(6),
            None,
            None,
            None,
            None,
            Some(true),
        ))
        .await?;

        let item = repo.find_by_id(item_id).await?.unwrap();
        assert_eq!(item.name, "Top Hat");
        assert_eq!(item.quantity, 6);
        assert_eq!(item.color, "Black");
        assert!(item.in_repair);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn deleting_a_category_clears_it_from_items(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let repo = ItemRepositoryImpl::new(db.clone());
        let categories = CategoryRepositoryImpl::new(db.clone());

        sqlx::query("INSERT INTO categories (name) VALUES ('Hats')")
            .execute(db.inner_ref())
            .await?;
        let category = categories.find_all().await?.pop().unwrap();

        let item_id = repo
            .create(CreateItem::new(
                "Tiara".into(),
                String::new(),
                1,
                Some(category.category_id),
                String::new(),
                String::new(),
                false,
                false,
            ))
            .await?;

        sqlx::query("DELETE FROM categories WHERE category_id = $1")
            .bind(category.category_id)
            .execute(db.inner_ref())
            .await?;

        let item = repo.find_by_id(item_id).await?.unwrap();
        assert!(item.category.is_none());

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn creating_with_unknown_category_is_rejected(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = ItemRepositoryImpl::new(ConnectionPool::new(pool));

        let res = repo
            .create(CreateItem::new(
                "Cape".into(),
                String::new(),
                1,
                Some(kernel::model::id::CategoryId::new()),
                String::new(),
                String::new(),
                false,
                false,
            ))
            .await;

        assert!(matches!(res, Err(AppError::UnprocessableEntity(_))));

        Ok(())
    }
}
