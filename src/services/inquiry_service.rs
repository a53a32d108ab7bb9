//! Domain service for customer inquiries and the admin dashboard.

use crate::domain::{InquiryStatus, UserId};
use crate::models::inquiry::{DashboardStats, InquiryDto, NewInquiry};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InquiryError {
    #[error("Inquiry not found")]
    NotFound,

    #[error("Car not found")]
    CarNotFound,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for InquiryError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for InquiryError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

#[async_trait::async_trait]
pub trait InquiryService: Send + Sync {
    /// Stores a contact-form submission with status `new`.
    ///
    /// # Errors
    ///
    /// Returns [`InquiryError::CarNotFound`] when it references an unknown car.
    async fn submit(&self, inquiry: NewInquiry) -> Result<InquiryDto, InquiryError>;

    /// Every inquiry, newest first.
    async fn list_all(&self) -> Result<Vec<InquiryDto>, InquiryError>;

    /// Inquiries sent by one user, newest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<InquiryDto>, InquiryError>;

    /// Moves an inquiry to `status`. Any status may follow any other.
    ///
    /// # Errors
    ///
    /// Returns [`InquiryError::NotFound`] if no inquiry has this id.
    async fn set_status(&self, id: &str, status: InquiryStatus) -> Result<(), InquiryError>;

    async fn dashboard_stats(&self) -> Result<DashboardStats, InquiryError>;
}
