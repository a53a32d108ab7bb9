//! Domain types for the dealership with strong typing.
//!
//! Identifiers are newtypes so a car id can never be passed where a user id is
//! expected, and every enumerated column is a real enum whose storage form
//! (upper-case) is owned by `SeaORM` and whose wire form is produced by a
//! single rendering function per casing style.

use sea_orm::entity::prelude::*;
use sea_orm::{ActiveEnum, Iterable};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Unique identifier for a vehicle listing.
///
/// Opaque to callers; generated as a UUID v4 on insert.
///
/// # Examples
///
/// ```rust
/// use carlot::domain::CarId;
///
/// let id = CarId::from("abc");
/// assert_eq!(id.as_str(), "abc");
/// assert_eq!(id.to_string(), "abc");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CarId(String);

impl CarId {
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CarId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for CarId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Unique identifier for a user account.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Current UTC time in the canonical storage form: RFC 3339, millisecond
/// precision, `Z` suffix. Fixed width, so string order is time order.
#[must_use]
pub fn timestamp_now() -> String {
    format_timestamp(chrono::Utc::now())
}

#[must_use]
pub fn format_timestamp(at: chrono::DateTime<chrono::Utc>) -> String {
    at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Raised when a wire value names no member of an enumerated field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Renders an all-caps storage value as title case: first character upper,
/// the rest lower (`GASOLINE` -> `Gasoline`, `SUV` -> `Suv`).
#[must_use]
pub fn title_case(stored: &str) -> String {
    let mut chars = stored.chars();
    chars.next().map_or_else(String::new, |first| {
        first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect()
    })
}

/// Renders a storage value fully lower-cased (`CONTACTED` -> `contacted`).
#[must_use]
pub fn lower_case(stored: &str) -> String {
    stored.to_lowercase()
}

/// Matches `input` case-insensitively against the storage values of `E`.
fn parse_stored<E>(input: &str) -> Option<E>
where
    E: ActiveEnum<Value = String> + Iterable,
{
    let wanted = input.trim().to_uppercase();
    E::iter().find(|variant| variant.to_value() == wanted)
}

/// Wires an active enum to its textual forms: `Display` and `Serialize` use
/// `$render` over the storage value; `FromStr` and `Deserialize` accept any
/// casing.
macro_rules! wire_enum {
    ($ty:ty, $kind:literal, $render:path) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&$render(&self.to_value()))
            }
        }

        impl std::str::FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_stored(s).ok_or_else(|| UnknownVariant {
                    kind: $kind,
                    value: s.to_string(),
                })
            }
        }

        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum FuelType {
    #[sea_orm(string_value = "GASOLINE")]
    Gasoline,
    #[sea_orm(string_value = "DIESEL")]
    Diesel,
    #[sea_orm(string_value = "ELECTRIC")]
    Electric,
    #[sea_orm(string_value = "HYBRID")]
    Hybrid,
}

wire_enum!(FuelType, "fuel type", title_case);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Transmission {
    #[sea_orm(string_value = "MANUAL")]
    Manual,
    #[sea_orm(string_value = "AUTOMATIC")]
    Automatic,
}

wire_enum!(Transmission, "transmission", title_case);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum BodyType {
    #[sea_orm(string_value = "SEDAN")]
    Sedan,
    #[sea_orm(string_value = "SUV")]
    Suv,
    #[sea_orm(string_value = "HATCHBACK")]
    Hatchback,
    #[sea_orm(string_value = "COUPE")]
    Coupe,
    #[sea_orm(string_value = "TRUCK")]
    Truck,
}

wire_enum!(BodyType, "body type", title_case);

/// Lifecycle of a customer inquiry. Any state may move to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum InquiryStatus {
    #[default]
    #[sea_orm(string_value = "NEW")]
    New,
    #[sea_orm(string_value = "CONTACTED")]
    Contacted,
    #[sea_orm(string_value = "CLOSED")]
    Closed,
}

wire_enum!(InquiryStatus, "inquiry status", lower_case);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Role {
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    #[default]
    #[sea_orm(string_value = "CUSTOMER")]
    Customer,
}

wire_enum!(Role, "role", lower_case);

/// Currency listing prices are displayed in. Codes are matched exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Ngn,
}

impl Currency {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Ngn => "NGN",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USD" => Ok(Self::Usd),
            "NGN" => Ok(Self::Ngn),
            other => Err(UnknownVariant {
                kind: "currency",
                value: other.to_string(),
            }),
        }
    }
}

/// The resolved caller of a request. Produced by the HTTP auth layer and
/// handed to handlers as an input; nothing below the API ever authenticates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: UserId,
    pub role: Role,
}

impl Viewer {
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

/// Which listings a query may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Only listings still for sale.
    #[default]
    Public,
    /// Every listing, sold or not.
    Admin,
}

impl Visibility {
    #[must_use]
    pub const fn includes_sold(&self) -> bool {
        matches!(self, Self::Admin)
    }
}
