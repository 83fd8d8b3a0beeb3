use futures::TryStreamExt;
use futures::future::BoxFuture;
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, Pool, Postgres};
use tracing::{debug, info};

use super::{CarRepository, LIST_CARS_SQL, models::Car};
use crate::error::GscError;

pub type PgPool = Pool<Postgres>;

/// Process-wide database handle, built once before the server starts.
#[derive(Clone)]
pub struct CarsStorage {
    pool: PgPool,
}

impl CarsStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open the pool and establish the first connection eagerly.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, GscError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(database_url)
            .await?;
        info!(max_connections, "connected to database");
        Ok(Self::new(pool))
    }

    /// Stream the listing; stops at the first row that fails to decode.
    pub async fn list_all(&self) -> Result<Vec<Car>, GscError> {
        let mut rows = sqlx::query(LIST_CARS_SQL).fetch(&self.pool);
        let mut cars = Vec::new();
        while let Some(row) = rows.try_next().await.map_err(GscError::CarsQuery)? {
            cars.push(Car::from_row(&row).map_err(GscError::CarsScan)?);
        }
        debug!(count = cars.len(), "listed cars");
        Ok(cars)
    }
}

impl CarRepository for CarsStorage {
    fn list_cars(&self) -> BoxFuture<'_, Result<Vec<Car>, GscError>> {
        Box::pin(self.list_all())
    }
}
