//! Filter normalization for inventory queries.
//!
//! Raw query parameters arrive as optional strings. Normalization turns them
//! into a [`CarFilter`] where every field is either a meaningful constraint or
//! absent. Malformed input never fails a request: it simply stops constraining.

use crate::domain::{BodyType, CarId, FuelType, Transmission};
use serde::Deserialize;

/// Sentinel the storefront sends for "no preference".
const ANY: &str = "any";

/// Query string of `GET /api/cars` and `GET /api/admin/cars`, as received.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCarFilter {
    pub make: Option<String>,
    pub model: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_year: Option<String>,
    pub max_year: Option<String>,
    pub fuel_type: Option<String>,
    pub body_type: Option<String>,
    pub transmission: Option<String>,
    pub search: Option<String>,
}

/// Inclusive range; either side may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T> Default for Bounds<T> {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
        }
    }
}

impl<T> Bounds<T> {
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// A normalized listing filter. Absent fields do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarFilter {
    pub make: Option<String>,
    pub model: Option<String>,
    pub price: Bounds<i64>,
    pub year: Bounds<i32>,
    pub fuel_type: Option<FuelType>,
    pub body_type: Option<BodyType>,
    pub transmission: Option<Transmission>,
    /// Whitespace-separated search tokens, in input order.
    pub search_tokens: Vec<String>,
}

impl CarFilter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl RawCarFilter {
    #[must_use]
    pub fn normalize(&self) -> CarFilter {
        CarFilter {
            make: text(self.make.as_deref()),
            model: text(self.model.as_deref()),
            price: Bounds {
                min: number(self.min_price.as_deref()),
                max: number(self.max_price.as_deref()),
            },
            year: Bounds {
                min: year(self.min_year.as_deref()),
                max: year(self.max_year.as_deref()),
            },
            fuel_type: category(self.fuel_type.as_deref()),
            body_type: category(self.body_type.as_deref()),
            transmission: category(self.transmission.as_deref()),
            search_tokens: meaningful(self.search.as_deref())
                .map(|s| s.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
        }
    }
}

/// Query string of `GET /api/cars/similar`, as received.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSimilarQuery {
    pub make: Option<String>,
    pub body_type: Option<String>,
    pub exclude: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    /// Center of a symmetric price band; used together with `band`.
    pub price: Option<String>,
    pub band: Option<String>,
    pub limit: Option<String>,
}

/// A normalized "similar vehicles" query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarQuery {
    /// Substring matched against make, case-insensitively.
    pub make: String,
    /// `None` when the supplied body type names no known body style; then
    /// only the make can match.
    pub body_type: Option<BodyType>,
    pub exclude: Option<CarId>,
    pub price: Bounds<i64>,
    pub limit: u64,
}

/// Limits applied to the `limit` parameter of a similar-vehicles query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimilarLimits {
    pub default: u64,
    pub max: u64,
}

impl RawSimilarQuery {
    /// Normalizes the query. `make` and `bodyType` must both be present.
    ///
    /// # Errors
    ///
    /// Returns the client-facing message when a required field is missing.
    pub fn normalize(&self, limits: SimilarLimits) -> Result<SimilarQuery, &'static str> {
        let (Some(make), Some(body_type)) = (
            present(self.make.as_deref()),
            present(self.body_type.as_deref()),
        ) else {
            return Err("Make and bodyType are required");
        };

        let band = match (
            number(self.price.as_deref()),
            number(self.band.as_deref()),
        ) {
            (Some(center), Some(half_width)) => {
                let half_width = half_width.saturating_abs();
                Bounds {
                    min: Some(center.saturating_sub(half_width)),
                    max: Some(center.saturating_add(half_width)),
                }
            }
            _ => Bounds {
                min: number(self.min_price.as_deref()),
                max: number(self.max_price.as_deref()),
            },
        };

        let max = limits.max.max(1);
        let limit = number(self.limit.as_deref())
            .map_or(limits.default, |n| u64::try_from(n).unwrap_or(0))
            .clamp(1, max);

        Ok(SimilarQuery {
            make: make.to_string(),
            body_type: body_type.parse().ok(),
            exclude: present(self.exclude.as_deref()).map(CarId::from),
            price: band,
            limit,
        })
    }
}

/// Trimmed, non-empty value.
fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Trimmed, non-empty value that is not the `Any` sentinel.
fn meaningful(raw: Option<&str>) -> Option<&str> {
    present(raw).filter(|s| !s.eq_ignore_ascii_case(ANY))
}

fn text(raw: Option<&str>) -> Option<String> {
    meaningful(raw).map(str::to_string)
}

fn category<T: std::str::FromStr>(raw: Option<&str>) -> Option<T> {
    meaningful(raw).and_then(|s| s.parse().ok())
}

/// Integer literal, or a finite decimal literal truncated toward zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn number(raw: Option<&str>) -> Option<i64> {
    let s = meaningful(raw)?;
    if let Ok(n) = s.parse::<i64>() {
        return Some(n);
    }

    let value = s.parse::<f64>().ok()?;
    if !value.is_finite() || value.abs() >= i64::MAX as f64 {
        return None;
    }
    Some(value.trunc() as i64)
}

fn year(raw: Option<&str>) -> Option<i32> {
    number(raw).and_then(|n| i32::try_from(n).ok())
}
