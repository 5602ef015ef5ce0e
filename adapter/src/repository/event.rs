use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::{
        event::{
            event::{CreateEvent, DeleteEvent, UpdateEvent},
            Event, EventWindow,
        },
        id::EventId,
        list::{ListOptions, PaginatedList},
    },
    repository::event::EventRepository,
};
use shared::error::{AppError, AppResult};
use uuid::Uuid;

use crate::database::{
    model::event::{EventRow, PaginatedEventRow},
    ConnectionPool,
};

#[derive(new)]
pub struct EventRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl EventRepository for EventRepositoryImpl {
    async fn create(&self, event: CreateEvent) -> AppResult<EventId> {
        let window = EventWindow::new(event.start_datetime, event.end_datetime)?;

        let event_id = EventId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO events
                (event_id, name, start_datetime, end_datetime, location, notes)
                VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(event_id)
        .bind(&event.name)
        .bind(window.start_datetime())
        .bind(window.end_datetime())
        .bind(&event.location)
        .bind(&event.notes)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No event record has been created".into(),
            ));
        }

        Ok(event_id)
    }

    async fn find_all(&self, options: ListOptions) -> AppResult<PaginatedList<Event>> {
        let ListOptions { limit, offset } = options;

        let rows = sqlx::query_as::<_, PaginatedEventRow>(
            r#"
                SELECT COUNT(*) OVER() AS total, event_id
                FROM events
                ORDER BY start_datetime ASC
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
        let event_ids = rows
            .into_iter()
            .map(|r| r.event_id.raw())
            .collect::<Vec<Uuid>>();

        let rows = sqlx::query_as::<_, EventRow>(
            r#"
                SELECT
                    event_id,
                    name,
                    start_datetime,
                    end_datetime,
                    location,
                    notes
                FROM events
                WHERE event_id = ANY($1)
                ORDER BY start_datetime ASC
            "#,
        )
        .bind(&event_ids)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(PaginatedList {
            total,
            limit,
            offset,
            items: rows.into_iter().map(Event::from).collect(),
        })
    }

    async fn find_by_id(&self, event_id: EventId) -> AppResult<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
                SELECT
                    event_id,
                    name,
                    start_datetime,
                    end_datetime,
                    location,
                    notes
                FROM events
                WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Event::from))
    }

    async fn update(&self, event: UpdateEvent) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let stored = sqlx::query_as::<_, EventRow>(
            r#"
                SELECT
                    event_id,
                    name,
                    start_datetime,
                    end_datetime,
                    location,
                    notes
                FROM events
                WHERE event_id = $1
            "#,
        )
        .bind(event.event_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .ok_or_else(|| AppError::EntityNotFound("specified event not found".into()))?;

        // The window rule is checked against the merged view, so supplying
        // only one endpoint cannot sneak past it.
        let name = event.name.unwrap_or(stored.name);
        let window = EventWindow::new(
            event.start_datetime.unwrap_or(stored.start_datetime),
            event.end_datetime.unwrap_or(stored.end_datetime),
        )?;
        let location = event.location.unwrap_or(stored.location);
        let notes = event.notes.unwrap_or(stored.notes);

        let res = sqlx::query(
            r#"
                UPDATE events
                SET
                    name = $2,
                    start_datetime = $3,
                    end_datetime = $4,
                    location = $5,
                    notes = $6
                WHERE event_id = $1
            "#,
        )
        .bind(event.event_id)
        .bind(&name)
        .bind(window.start_datetime())
        .bind(window.end_datetime())
        .bind(&location)
        .bind(&notes)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No event record has been updated".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    async fn delete(&self, event: DeleteEvent) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                DELETE FROM events
                WHERE event_id = $1
            "#,
        )
        .bind(event.event_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("specified event not found".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn day1(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, hour, 0, 0).unwrap()
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn event_with_zero_length_window_is_rejected(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = EventRepositoryImpl::new(ConnectionPool::new(pool));

        let res = repo
            .create(CreateEvent::new(
                "Load-in".into(),
                day1(10),
                day1(10),
                String::new(),
                String::new(),
            ))
            .await;
        assert!(matches!(res, Err(AppError::InvalidEventWindow)));

        // One second of duration is enough.
        let res = repo
            .create(CreateEvent::new(
                "Load-in".into(),
                day1(10),
                day1(10) + Duration::seconds(1),
                String::new(),
                String::new(),
            ))
            .await;
        assert!(res.is_ok());

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn partial_update_cannot_invert_the_window(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = EventRepositoryImpl::new(ConnectionPool::new(pool));

        let event_id = repo
            .create(CreateEvent::new(
                "Gala".into(),
                day1(10),
                day1(12),
                "Main hall".into(),
                String::new(),
            ))
            .await?;

        // end before the stored start
        let res = repo
            .update(UpdateEvent::new(
                event_id,
                None,
                None,
                Some(day1(9)),
                None,
                None,
            ))
            .await;
        assert!(matches!(res, Err(AppError::InvalidEventWindow)));

        // start after the stored end
        let res = repo
            .update(UpdateEvent::new(
                event_id,
                None,
                Some(day1(13)),
                None,
                None,
                None,
            ))
            .await;
        assert!(matches!(res, Err(AppError::InvalidEventWindow)));

        // consistent pair is fine, and unrelated fields merge through
        repo.update(UpdateEvent::new(
            event_id,
            Some("Winter Gala".into()),
            Some(day1(18)),
            Some(day1(22)),
            None,
            None,
        ))
        .await?;

        let stored = repo.find_by_id(event_id).await?.unwrap();
        assert_eq!(stored.name, "Winter Gala");
        assert_eq!(stored.start_datetime, day1(18));
        assert_eq!(stored.end_datetime, day1(22));
        assert_eq!(stored.location, "Main hall");

        Ok(())
    }
}
