use axum::{Json, extract::State};

use crate::db::Car;
use crate::{GscError, router::GscState};

/// GET /cars -> every row of the `cars` table as a JSON array.
pub async fn list_cars_handler(State(state): State<GscState>) -> Result<Json<Vec<Car>>, GscError> {
    let cars = state.cars.list_cars().await?;
    Ok(Json(cars))
}
