//! Result shaping: stored listings to their wire representation.

use crate::domain::{BodyType, FuelType, Transmission, format_timestamp};
use crate::entities::cars;
use serde::{Deserialize, Serialize};

/// A listing as clients see it.
///
/// Enumerated fields serialize in title case (`Gasoline`, `Suv`) and
/// timestamps in RFC 3339 with millisecond precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarDto {
    pub id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: i64,
    pub mileage: i64,
    pub color: String,
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    pub body_type: BodyType,
    pub images: Vec<String>,
    pub description: String,
    pub features: Vec<String>,
    pub is_available: bool,
    pub view_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<cars::Model> for CarDto {
    fn from(car: cars::Model) -> Self {
        Self {
            images: decode_list(&car.images),
            features: decode_list(&car.features),
            created_at: normalize_timestamp(&car.created_at),
            updated_at: normalize_timestamp(&car.updated_at),
            id: car.id,
            make: car.make,
            model: car.model,
            year: car.year,
            price: car.price,
            mileage: car.mileage,
            color: car.color,
            fuel_type: car.fuel_type,
            transmission: car.transmission,
            body_type: car.body_type,
            description: car.description,
            is_available: car.is_available,
            view_count: car.view_count,
        }
    }
}

#[must_use]
pub fn shape_all(cars: Vec<cars::Model>) -> Vec<CarDto> {
    cars.into_iter().map(CarDto::from).collect()
}

/// Decodes a JSON string list column. Anything that is not a JSON array of
/// strings decodes to an empty list.
#[must_use]
pub fn decode_list(stored: &str) -> Vec<String> {
    serde_json::from_str(stored).unwrap_or_default()
}

#[must_use]
pub fn encode_list(items: &[String]) -> String {
    serde_json::Value::from(items.to_vec()).to_string()
}

/// Re-renders a stored timestamp in the canonical wire form. Values that do
/// not parse are passed through untouched.
#[must_use]
pub fn normalize_timestamp(stored: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(stored).map_or_else(
        |_| stored.to_string(),
        |at| format_timestamp(at.with_timezone(&chrono::Utc)),
    )
}
