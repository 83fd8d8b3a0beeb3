/// Listing query; column order matches `Car`.
pub const LIST_CARS_SQL: &str = "SELECT id, brand, model, price, description FROM cars";
