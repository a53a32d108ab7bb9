use serde::{Deserialize, Serialize};

use crate::domain::InquiryStatus;
use crate::entities::{cars, inquiries};
use crate::inventory::shape::normalize_timestamp;
use crate::inventory::CarDto;

/// An inquiry about to be stored; it always starts out as `new`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInquiry {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub car_id: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub car_id: Option<String>,
    pub user_id: Option<String>,
    pub status: InquiryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car: Option<CarDto>,
    pub created_at: String,
    pub updated_at: String,
}

impl InquiryDto {
    #[must_use]
    pub fn from_parts(inquiry: inquiries::Model, car: Option<cars::Model>) -> Self {
        Self {
            created_at: normalize_timestamp(&inquiry.created_at),
            updated_at: normalize_timestamp(&inquiry.updated_at),
            id: inquiry.id,
            name: inquiry.name,
            email: inquiry.email,
            phone: inquiry.phone,
            message: inquiry.message,
            car_id: inquiry.car_id,
            user_id: inquiry.user_id,
            status: inquiry.status,
            car: car.map(CarDto::from),
        }
    }
}

/// Admin dashboard figures.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_cars: u64,
    pub available_cars: u64,
    /// Customer accounts only; administrators are not counted.
    pub total_users: u64,
    pub new_inquiries: u64,
    pub total_inquiries: u64,
    pub recent_inquiries: Vec<InquiryDto>,
}
