use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::{Event, EventPatch, NewEvent, PatchValue, Registrant};
use crate::repository::{EventRepository, RepositoryError};

const EVENT_COLUMNS: &str =
    r#"id, title, description, "date", "time", location, poster, created_by, club_name"#;

#[derive(Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `UPDATE events SET <assignments> WHERE id = $n`, one bind per assignment.
/// Callers reject empty patches first.
fn update_query(id: i64, patch: &EventPatch) -> QueryBuilder<'_, Postgres> {
    let mut query = QueryBuilder::new("UPDATE events SET ");
    let mut assignments = query.separated(", ");
    for (column, value) in patch.assignments() {
        assignments.push(format!("\"{column}\" = "));
        match value {
            PatchValue::Text(text) => assignments.push_bind_unseparated(text),
            PatchValue::Date(date) => assignments.push_bind_unseparated(date),
            PatchValue::Time(time) => assignments.push_bind_unseparated(time),
        };
    }
    query.push(" WHERE id = ");
    query.push_bind(id);
    query
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn insert(&self, event: NewEvent) -> Result<i64, RepositoryError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO events (title, description, "date", "time", location, poster, created_by, club_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(event.title)
        .bind(event.description)
        .bind(event.date)
        .bind(event.time)
        .bind(event.location)
        .bind(event.poster)
        .bind(event.created_by)
        .bind(event.club_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update(&self, id: i64, patch: &EventPatch) -> Result<u64, RepositoryError> {
        let result = update_query(id, patch).build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn list_by_creator(&self, creator_id: i64) -> Result<Vec<Event>, RepositoryError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE created_by = $1"
        ))
        .bind(creator_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    async fn list_registrants(&self, event_id: i64) -> Result<Vec<Registrant>, RepositoryError> {
        let students = sqlx::query_as::<_, Registrant>(
            r#"
            SELECT u.id, u.name, u.email
            FROM student_registrations sr
            JOIN users u ON sr.student_id = u.id
            WHERE sr.event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }

    async fn delete(&self, id: i64) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
