use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

/// One row of the `cars` table.
///
/// Field order is the JSON key order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Car {
    pub id: i64,
    pub brand: String,
    pub model: String,
    pub price: f64,
    pub description: String,
}

impl<'r> FromRow<'r, PgRow> for Car {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        // SERIAL and BIGSERIAL keys; REAL, DOUBLE PRECISION and NUMERIC prices.
        let id = row
            .try_get::<i64, _>("id")
            .or_else(|_| row.try_get::<i32, _>("id").map(i64::from))?;
        let price = row
            .try_get::<f64, _>("price")
            .or_else(|_| row.try_get::<f32, _>("price").map(f64::from))
            .or_else(|_| numeric_to_f64(row.try_get::<Decimal, _>("price")?))?;

        Ok(Self {
            id,
            brand: row.try_get("brand")?,
            model: row.try_get("model")?,
            price,
            description: row.try_get("description")?,
        })
    }
}

fn numeric_to_f64(value: Decimal) -> Result<f64, sqlx::Error> {
    value
        .to_f64()
        .ok_or_else(|| sqlx::Error::Decode(format!("price {value} does not fit in f64").into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_price_converts_to_float() {
        assert_eq!(numeric_to_f64(Decimal::new(2_000_000, 2)).unwrap(), 20000.0);
        assert_eq!(numeric_to_f64(Decimal::new(2_100_050, 2)).unwrap(), 21000.5);
    }

    #[test]
    fn serializes_fields_in_column_order() {
        let car = Car {
            id: 1,
            brand: "Toyota".to_string(),
            model: "Corolla".to_string(),
            price: 20000.5,
            description: "reliable".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&car).unwrap(),
            r#"{"id":1,"brand":"Toyota","model":"Corolla","price":20000.5,"description":"reliable"}"#
        );
    }
}
