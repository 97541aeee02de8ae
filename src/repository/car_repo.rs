use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::errors::RepoError;
use crate::models::{Car, Pagination};

/// Storage gateway for cars. Every method sees only live rows; soft
/// deleted cars behave exactly like rows that never existed.
#[async_trait]
pub trait CarRepository: Send + Sync {
    async fn create(&self, car: &Car) -> Result<(), RepoError>;

    /// Returns [`RepoError::NotFound`] when no live car has this id.
    async fn find_by_id(&self, id: Uuid) -> Result<Car, RepoError>;

    /// Returns one page of live cars plus the total live count, so the
    /// caller can derive page arithmetic from a single call.
    async fn find_all(&self, pagination: &Pagination) -> Result<(Vec<Car>, i64), RepoError>;

    /// Persists name and engine version and stamps a fresh update time.
    /// Returns [`RepoError::NotFound`] when no live car has this id.
    async fn update(&self, car: &Car) -> Result<(), RepoError>;

    /// Soft deletes. Returns [`RepoError::NotFound`] when no live car has
    /// this id, including when it was already deleted.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    async fn exists(&self, id: Uuid) -> Result<bool, RepoError>;

    /// Cheap connectivity probe for the health endpoint.
    async fn ping(&self) -> Result<(), RepoError>;
}

const CAR_COLUMNS: &str = "id, name, engine_version, created_at, updated_at, deleted_at";

#[derive(Clone)]
pub struct PgCarRepository {
    pool: PgPool,
}

impl PgCarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CarRepository for PgCarRepository {
    async fn create(&self, car: &Car) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO cars (id, name, engine_version, created_at, updated_at) VALUES ($1, $2, $3, $4, $5)"
        )
        .bind(car.id)
        .bind(&car.name)
        .bind(&car.engine_version)
        .bind(car.created_at)
        .bind(car.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Car, RepoError> {
        let query = format!("SELECT {CAR_COLUMNS} FROM cars WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Car>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepoError::NotFound)
    }

    async fn find_all(&self, pagination: &Pagination) -> Result<(Vec<Car>, i64), RepoError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cars WHERE deleted_at IS NULL")
            .fetch_one(&self.pool)
            .await?;

        // order_by() only ever yields whitelisted column and direction
        // tokens, so interpolating it is safe.
        let query = format!(
            "SELECT {CAR_COLUMNS} FROM cars WHERE deleted_at IS NULL ORDER BY {} LIMIT $1 OFFSET $2",
            pagination.order_by()
        );
        let cars = sqlx::query_as::<_, Car>(&query)
            .bind(pagination.page_size)
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((cars, total))
    }

    async fn update(&self, car: &Car) -> Result<(), RepoError> {
        let result = sqlx::query(
            "UPDATE cars SET name = $1, engine_version = $2, updated_at = $3 WHERE id = $4 AND deleted_at IS NULL"
        )
        .bind(&car.name)
        .bind(&car.engine_version)
        .bind(Utc::now())
        .bind(car.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result =
            sqlx::query("UPDATE cars SET deleted_at = $1 WHERE id = $2 AND deleted_at IS NULL")
                .bind(Utc::now())
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn exists(&self, id: Uuid) -> Result<bool, RepoError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM cars WHERE id = $1 AND deleted_at IS NULL)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn ping(&self) -> Result<(), RepoError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
