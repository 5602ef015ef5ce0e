use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::{
        booking::{
            event::{CreateBooking, DeleteBooking, UpdateBooking},
            Booking,
        },
        event::EventWindow,
        id::{BookingId, EventId, ItemId},
        list::{ListOptions, PaginatedList},
    },
    repository::booking::BookingRepository,
};
use shared::error::{AppError, AppResult};
use uuid::Uuid;

use crate::database::{
    model::booking::{BookingRow, PaginatedBookingRow, StoredBookingRow},
    set_transaction_serializable, ConnectionPool,
};

#[derive(new)]
pub struct BookingRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl BookingRepository for BookingRepositoryImpl {
    async fn create(&self, event: CreateBooking) -> AppResult<BookingId> {
        let mut tx = self.db.begin().await?;

        // The capacity read set must stay stable until the INSERT commits.
        set_transaction_serializable(&mut tx).await?;

        let window = self.fetch_event_window(&mut tx, event.event_id).await?;
        self.check_capacity(&mut tx, event.item_id, window, event.quantity, None)
            .await?;

        let booking_id = BookingId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO item_bookings (booking_id, item_id, event_id, quantity)
                VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(booking_id)
        .bind(event.item_id)
        .bind(event.event_id)
        .bind(event.quantity)
        .execute(&mut *tx)
        .await
        .map_err(translate_booking_write_error)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No booking record has been created".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(booking_id)
    }

    async fn update(&self, event: UpdateBooking) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        set_transaction_serializable(&mut tx).await?;

        // The stored item and event are authoritative; an update can only
        // change the quantity.
        let stored = sqlx::query_as::<_, StoredBookingRow>(
            r#"
                SELECT
                    b.item_id,
                    b.quantity,
                    e.start_datetime AS event_start_datetime,
                    e.end_datetime AS event_end_datetime
                FROM item_bookings AS b
                INNER JOIN events AS e ON b.event_id = e.event_id
                WHERE b.booking_id = $1
            "#,
        )
        .bind(event.booking_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .ok_or_else(|| AppError::EntityNotFound("specified booking not found".into()))?;

        let quantity = event.quantity.unwrap_or(stored.quantity);
        let window = EventWindow::new(stored.event_start_datetime, stored.event_end_datetime)?;

        self.check_capacity(
            &mut tx,
            stored.item_id,
            window,
            quantity,
            Some(event.booking_id),
        )
        .await?;

        let res = sqlx::query(
            r#"
                UPDATE item_bookings
                SET quantity = $2
                WHERE booking_id = $1
            "#,
        )
        .bind(event.booking_id)
        .bind(quantity)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No booking record has been updated".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    async fn delete(&self, event: DeleteBooking) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                DELETE FROM item_bookings
                WHERE booking_id = $1
            "#,
        )
        .bind(event.booking_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(
                "specified booking not found".into(),
            ));
        }

        Ok(())
    }

    async fn find_all(&self, options: ListOptions) -> AppResult<PaginatedList<Booking>> {
        let ListOptions { limit, offset } = options;

        let rows = sqlx::query_as::<_, PaginatedBookingRow>(
            r#"
                SELECT COUNT(*) OVER() AS total, booking_id
                FROM item_bookings
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
        let booking_ids = rows
            .into_iter()
            .map(|r| r.booking_id.raw())
            .collect::<Vec<Uuid>>();

        let rows = sqlx::query_as::<_, BookingRow>(
            r#"
                SELECT
                    b.booking_id,
                    b.item_id,
                    i.name AS item_name,
                    b.event_id,
                    e.name AS event_name,
                    e.start_datetime AS event_start_datetime,
                    e.end_datetime AS event_end_datetime,
                    b.quantity,
                    b.created_at
                FROM item_bookings AS b
                INNER JOIN items AS i ON b.item_id = i.item_id
                INNER JOIN events AS e ON b.event_id = e.event_id
                WHERE b.booking_id = ANY($1)
                ORDER BY b.created_at DESC
            "#,
        )
        .bind(&booking_ids)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(PaginatedList {
            total,
            limit,
            offset,
            items: rows.into_iter().map(Booking::from).collect(),
        })
    }

    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>> {
        let row = sqlx::query_as::<_, BookingRow>(
            r#"
                SELECT
                    b.booking_id,
                    b.item_id,
                    i.name AS item_name,
                    b.event_id,
                    e.name AS event_name,
                    e.start_datetime AS event_start_datetime,
                    e.end_datetime AS event_end_datetime,
                    b.quantity,
                    b.created_at
                FROM item_bookings AS b
                INNER JOIN items AS i ON b.item_id = i.item_id
                INNER JOIN events AS e ON b.event_id = e.event_id
                WHERE b.booking_id = $1
            "#,
        )
        .bind(booking_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Booking::from))
    }

    async fn find_by_item_id(&self, item_id: ItemId) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, BookingRow>(
            r#"
                SELECT
                    b.booking_id,
                    b.item_id,
                    i.name AS item_name,
                    b.event_id,
                    e.name AS event_name,
                    e.start_datetime AS event_start_datetime,
                    e.end_datetime AS event_end_datetime,
                    b.quantity,
                    b.created_at
                FROM item_bookings AS b
                INNER JOIN items AS i ON b.item_id = i.item_id
                INNER JOIN events AS e ON b.event_id = e.event_id
                WHERE b.item_id = $1
                ORDER BY e.start_datetime ASC
            "#,
        )
        .bind(item_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map(|rows| rows.into_iter().map(Booking::from).collect())
        .map_err(AppError::SpecificOperationError)
    }

    async fn find_by_event_id(&self, event_id: EventId) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, BookingRow>(
            r#"
                SELECT
                    b.booking_id,
                    b.item_id,
                    i.name AS item_name,
                    b.event_id,
                    e.name AS event_name,
                    e.start_datetime AS event_start_datetime,
                    e.end_datetime AS event_end_datetime,
                    b.quantity,
                    b.created_at
                FROM item_bookings AS b
                INNER JOIN items AS i ON b.item_id = i.item_id
                INNER JOIN events AS e ON b.event_id = e.event_id
                WHERE b.event_id = $1
                ORDER BY b.created_at DESC
            "#,
        )
        .bind(event_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map(|rows| rows.into_iter().map(Booking::from).collect())
        .map_err(AppError::SpecificOperationError)
    }
}

impl BookingRepositoryImpl {
    async fn fetch_event_window(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        event_id: EventId,
    ) -> AppResult<EventWindow> {
        let row = sqlx::query_as::<_, (chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>)>(
            r#"
                SELECT start_datetime, end_datetime
                FROM events
                WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .ok_or_else(|| AppError::EntityNotFound("specified event not found".into()))?;

        EventWindow::new(row.0, row.1)
    }

    // The authoritative overbooking guard. Every booking write path goes
    // through here, inside the caller's transaction.
    //
    // Overlap between half-open windows is strict on both ends
    // (existing.start < candidate.end AND existing.end > candidate.start),
    // so windows that merely touch at an endpoint do not compete for stock.
    // The reserved quantity is aggregated in the store, and on update the
    // booking being updated is excluded so it does not count against its own
    // prior reservation.
    async fn check_capacity(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        item_id: ItemId,
        window: EventWindow,
        quantity: i32,
        exclude: Option<BookingId>,
    ) -> AppResult<()> {
        let stock = sqlx::query_scalar::<_, i32>(
            r#"
                SELECT quantity
                FROM items
                WHERE item_id = $1
            "#,
        )
        .bind(item_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .ok_or_else(|| AppError::EntityNotFound("specified item not found".into()))?;

        let total_booked = sqlx::query_scalar::<_, i64>(
            r#"
                SELECT COALESCE(SUM(b.quantity), 0)
                FROM item_bookings AS b
                INNER JOIN events AS e ON b.event_id = e.event_id
                WHERE b.item_id = $1
                  AND e.start_datetime < $3
                  AND e.end_datetime > $2
                  AND ($4::uuid IS NULL OR b.booking_id <> $4)
            "#,
        )
        .bind(item_id)
        .bind(window.start_datetime())
        .bind(window.end_datetime())
        .bind(exclude.map(BookingId::raw))
        .fetch_one(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let available = stock as i64 - total_booked;
        if quantity as i64 > available {
            return Err(AppError::CapacityExceeded {
                quantity,
                available,
            });
        }

        Ok(())
    }
}

fn translate_booking_write_error(e: sqlx::Error) -> AppError {
    match &e {
        // Two racing creates for the same (item, event) pair: the one that
        // loses the unique_item_event constraint gets the same error as a
        // pre-check failure would produce.
        sqlx::Error::Database(db_err) if db_err.constraint() == Some("unique_item_event") => {
            AppError::DuplicateBooking
        }
        _ => AppError::SpecificOperationError(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{event::EventRepositoryImpl, item::ItemRepositoryImpl};
    use chrono::{DateTime, TimeZone, Utc};
    use kernel::{
        model::{event::event::CreateEvent, item::event::CreateItem},
        repository::{event::EventRepository, item::ItemRepository},
    };

    fn day(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0).unwrap()
    }

    async fn register_item(db: &ConnectionPool, name: &str, quantity: i32) -> ItemId {
        ItemRepositoryImpl::new(db.clone())
            .create(CreateItem::new(
                name.into(),
                String::new(),
                quantity,
                None,
                String::new(),
                String::new(),
                false,
                false,
            ))
            .await
            .unwrap()
    }

    async fn register_event(
        db: &ConnectionPool,
        name: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> EventId {
        EventRepositoryImpl::new(db.clone())
            .create(CreateEvent::new(
                name.into(),
                start,
                end,
                String::new(),
                String::new(),
            ))
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn overlapping_bookings_share_the_stock(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let repo = BookingRepositoryImpl::new(db.clone());

        let tent = register_item(&db, "Tent", 5).await;
        let event_a = register_event(&db, "A", day(1, 0), day(1, 2)).await;
        let event_b = register_event(&db, "B", day(1, 1), day(1, 3)).await;
        let event_c = register_event(&db, "C", day(2, 0), day(2, 2)).await;

        repo.create(CreateBooking::new(tent, event_a, 3)).await?;

        // B overlaps A, so only 2 of the 5 tents are left for it.
        let res = repo.create(CreateBooking::new(tent, event_b, 3)).await;
        assert!(matches!(
            res,
            Err(AppError::CapacityExceeded {
                quantity: 3,
                available: 2
            })
        ));

        repo.create(CreateBooking::new(tent, event_b, 2)).await?;

        // C overlaps neither, so the full stock is available again.
        repo.create(CreateBooking::new(tent, event_c, 5)).await?;

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn touching_windows_do_not_compete(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let repo = BookingRepositoryImpl::new(db.clone());

        let mirror = register_item(&db, "Mirror", 1).await;
        let morning = register_event(&db, "Morning", day(1, 10), day(1, 12)).await;
        let afternoon = register_event(&db, "Afternoon", day(1, 12), day(1, 14)).await;

        // afternoon.start == morning.end: no overlap, both get the one unit.
        repo.create(CreateBooking::new(mirror, morning, 1)).await?;
        repo.create(CreateBooking::new(mirror, afternoon, 1)).await?;

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn exact_fit_is_admitted_and_one_more_is_not(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let repo = BookingRepositoryImpl::new(db.clone());

        let wig = register_item(&db, "Wig", 3).await;
        let event_a = register_event(&db, "A", day(1, 0), day(1, 2)).await;
        let event_b = register_event(&db, "B", day(1, 1), day(1, 3)).await;

        repo.create(CreateBooking::new(wig, event_a, 3)).await?;

        let res = repo.create(CreateBooking::new(wig, event_b, 1)).await;
        assert!(matches!(
            res,
            Err(AppError::CapacityExceeded {
                quantity: 1,
                available: 0
            })
        ));

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn double_booking_the_same_event_is_rejected(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let repo = BookingRepositoryImpl::new(db.clone());

        let chair = register_item(&db, "Chair", 5).await;
        let event_a = register_event(&db, "A", day(1, 0), day(1, 2)).await;

        repo.create(CreateBooking::new(chair, event_a, 1)).await?;

        let res = repo.create(CreateBooking::new(chair, event_a, 1)).await;
        assert!(matches!(res, Err(AppError::DuplicateBooking)));

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn updating_a_booking_excludes_itself(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let repo = BookingRepositoryImpl::new(db.clone());

        let tent = register_item(&db, "Tent", 5).await;
        let event_a = register_event(&db, "A", day(1, 10), day(1, 12)).await;
        let event_b = register_event(&db, "B", day(1, 11), day(1, 13)).await;

        let booking_a = repo.create(CreateBooking::new(tent, event_a, 3)).await?;
        repo.create(CreateBooking::new(tent, event_b, 2)).await?;

        // 2 are held by B, so A can grow to 3 (a no-op) but not to 4.
        let res = repo
            .update(UpdateBooking::new(booking_a, Some(4)))
            .await;
        assert!(matches!(
            res,
            Err(AppError::CapacityExceeded {
                quantity: 4,
                available: 3
            })
        ));

        repo.update(UpdateBooking::new(booking_a, Some(3))).await?;

        // Decreasing always fits.
        repo.update(UpdateBooking::new(booking_a, Some(1))).await?;
        let stored = repo.find_by_id(booking_a).await?.unwrap();
        assert_eq!(stored.quantity, 1);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn update_without_quantity_keeps_the_stored_value(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let repo = BookingRepositoryImpl::new(db.clone());

        let tent = register_item(&db, "Tent", 5).await;
        let event_a = register_event(&db, "A", day(1, 10), day(1, 12)).await;

        let booking = repo.create(CreateBooking::new(tent, event_a, 2)).await?;
        repo.update(UpdateBooking::new(booking, None)).await?;

        let stored = repo.find_by_id(booking).await?.unwrap();
        assert_eq!(stored.quantity, 2);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn deleting_item_or_event_removes_its_bookings(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let repo = BookingRepositoryImpl::new(db.clone());
        let items = ItemRepositoryImpl::new(db.clone());
        let events = EventRepositoryImpl::new(db.clone());

        let tent = register_item(&db, "Tent", 5).await;
        let stilts = register_item(&db, "Stilts", 2).await;
        let event_a = register_event(&db, "A", day(1, 10), day(1, 12)).await;

        repo.create(CreateBooking::new(tent, event_a, 1)).await?;
        repo.create(CreateBooking::new(stilts, event_a, 1)).await?;

        items
            .delete(kernel::model::item::event::DeleteItem::new(tent))
            .await?;
        assert!(repo.find_by_item_id(tent).await?.is_empty());

        events
            .delete(kernel::model::event::event::DeleteEvent::new(event_a))
            .await?;
        assert!(repo.find_by_event_id(event_a).await?.is_empty());

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn booking_lists_carry_item_and_event_details(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let repo = BookingRepositoryImpl::new(db.clone());

        let tent = register_item(&db, "Tent", 5).await;
        let event_a = register_event(&db, "Summer Fair", day(1, 10), day(1, 12)).await;

        repo.create(CreateBooking::new(tent, event_a, 2)).await?;

        let list = repo
            .find_all(ListOptions {
                limit: 20,
                offset: 0,
            })
            .await?;
        assert_eq!(list.total, 1);

        let booking = &list.items[0];
        assert_eq!(booking.item.name, "Tent");
        assert_eq!(booking.event.name, "Summer Fair");
        assert_eq!(booking.event.start_datetime, day(1, 10));
        assert_eq!(booking.event.end_datetime, day(1, 12));
        assert_eq!(booking.quantity, 2);

        Ok(())
    }
}
