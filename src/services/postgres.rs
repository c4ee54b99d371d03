use crate::models::{ClassroomPatch, ClassroomRecord, Coordinate};
use crate::services::directory::{ClassroomStore, DirectoryError};
use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};
use std::time::Duration;

const CLASSROOM_COLUMNS: &str = "id, latitude, longitude, building, floor, description";

/// PostgreSQL-backed classroom store
///
/// One row per classroom, keyed by the classroom id.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect to PostgreSQL and run pending migrations
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, DirectoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }
}

fn insert_query(record: &ClassroomRecord) -> Query<'_, Postgres, PgArguments> {
    sqlx::query(
        r#"
        INSERT INTO classrooms (id, latitude, longitude, building, floor, description)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(&record.id)
    .bind(record.coordinates.latitude)
    .bind(record.coordinates.longitude)
    .bind(&record.building)
    .bind(record.floor)
    .bind(&record.description)
}

fn record_from_row(row: &PgRow) -> Result<ClassroomRecord, sqlx::Error> {
    Ok(ClassroomRecord {
        id: row.try_get("id")?,
        coordinates: Coordinate::new(row.try_get("latitude")?, row.try_get("longitude")?),
        building: row.try_get("building")?,
        floor: row.try_get("floor")?,
        description: row.try_get("description")?,
    })
}

#[async_trait]
impl ClassroomStore for PostgresStore {
    async fn list_all(&self) -> Result<Vec<ClassroomRecord>, DirectoryError> {
        let query = format!("SELECT {} FROM classrooms ORDER BY created_at, id", CLASSROOM_COLUMNS);

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        let records = rows
            .iter()
            .map(record_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Fetched {} classrooms", records.len());

        Ok(records)
    }

    async fn get(&self, id: &str) -> Result<Option<ClassroomRecord>, DirectoryError> {
        let query = format!("SELECT {} FROM classrooms WHERE id = $1", CLASSROOM_COLUMNS);

        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;

        Ok(row.as_ref().map(record_from_row).transpose()?)
    }

    /// Uses `ON CONFLICT DO NOTHING` so a duplicate id surfaces as `AlreadyExists`
    async fn insert(&self, record: &ClassroomRecord) -> Result<(), DirectoryError> {
        let result = insert_query(record).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(DirectoryError::AlreadyExists(record.id.clone()));
        }

        Ok(())
    }

    /// Single transaction; any duplicate id rolls the whole batch back
    async fn insert_all(&self, records: &[ClassroomRecord]) -> Result<(), DirectoryError> {
        let mut tx = self.pool.begin().await?;

        for record in records {
            let result = insert_query(record).execute(&mut *tx).await?;
            if result.rows_affected() == 0 {
                // Dropping the transaction rolls it back
                return Err(DirectoryError::AlreadyExists(record.id.clone()));
            }
        }

        tx.commit().await?;
        tracing::debug!("Inserted {} classrooms", records.len());
        Ok(())
    }

    async fn update(
        &self,
        id: &str,
        patch: &ClassroomPatch,
    ) -> Result<Option<ClassroomRecord>, DirectoryError> {
        let query = format!(
            r#"
            UPDATE classrooms SET
                latitude = COALESCE($2, latitude),
                longitude = COALESCE($3, longitude),
                building = COALESCE($4, building),
                floor = COALESCE($5, floor),
                description = COALESCE($6, description)
            WHERE id = $1
            RETURNING {}
            "#,
            CLASSROOM_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(id)
            .bind(patch.coordinates.map(|c| c.latitude))
            .bind(patch.coordinates.map(|c| c.longitude))
            .bind(&patch.building)
            .bind(patch.floor)
            .bind(&patch.description)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(record_from_row).transpose()?)
    }

    async fn delete(&self, id: &str) -> Result<bool, DirectoryError> {
        let result = sqlx::query("DELETE FROM classrooms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, DirectoryError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM classrooms")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.try_get("total")?)
    }

    /// Health check for the database connection
    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await.is_ok()
    }
}
