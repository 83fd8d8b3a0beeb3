//! Database module: the car record and the Postgres-backed listing.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `queries.rs`: fixed SQL text
//! - `postgres.rs`: shared pool and the `CarRepository` implementation

pub mod models;
pub mod postgres;
pub mod queries;

use futures::future::BoxFuture;

use crate::error::GscError;

pub use models::Car;
pub use postgres::{CarsStorage, PgPool};
pub use queries::LIST_CARS_SQL;

/// Read access to the cars table.
///
/// Implementations must be safe to call from many requests at once.
pub trait CarRepository: Send + Sync {
    /// All cars in the order the store returns them.
    fn list_cars(&self) -> BoxFuture<'_, Result<Vec<Car>, GscError>>;
}
