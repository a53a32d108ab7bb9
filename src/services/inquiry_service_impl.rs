//! `SeaORM` implementation of the `InquiryService` trait.

use crate::constants::limits::RECENT_INQUIRIES;
use crate::db::Store;
use crate::domain::{InquiryStatus, Role, UserId};
use crate::models::inquiry::{DashboardStats, InquiryDto, NewInquiry};
use crate::services::inquiry_service::{InquiryError, InquiryService};
use async_trait::async_trait;
use tracing::info;

pub struct SeaOrmInquiryService {
    store: Store,
}

impl SeaOrmInquiryService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn list(
        &self,
        user_id: Option<&str>,
        limit: Option<u64>,
    ) -> Result<Vec<InquiryDto>, InquiryError> {
        let rows = self.store.list_inquiries(user_id, limit).await?;
        Ok(rows
            .into_iter()
            .map(|(inquiry, car)| InquiryDto::from_parts(inquiry, car))
            .collect())
    }
}

#[async_trait]
impl InquiryService for SeaOrmInquiryService {
    async fn submit(&self, inquiry: NewInquiry) -> Result<InquiryDto, InquiryError> {
        let car = match &inquiry.car_id {
            Some(car_id) => Some(
                self.store
                    .get_car(car_id)
                    .await?
                    .ok_or(InquiryError::CarNotFound)?,
            ),
            None => None,
        };

        let stored = self.store.add_inquiry(inquiry).await?;

        metrics::counter!("inquiries_created_total").increment(1);
        info!(inquiry_id = %stored.id, car_id = ?stored.car_id, "Inquiry received");

        Ok(InquiryDto::from_parts(stored, car))
    }

    async fn list_all(&self) -> Result<Vec<InquiryDto>, InquiryError> {
        self.list(None, None).await
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<InquiryDto>, InquiryError> {
        self.list(Some(user_id.as_str()), None).await
    }

    async fn set_status(&self, id: &str, status: InquiryStatus) -> Result<(), InquiryError> {
        if !self.store.set_inquiry_status(id, status).await? {
            return Err(InquiryError::NotFound);
        }

        info!(inquiry_id = %id, status = %status, "Inquiry status changed");
        Ok(())
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, InquiryError> {
        let (total_cars, available_cars, total_users, new_inquiries, total_inquiries) = tokio::try_join!(
            self.store.count_cars(false),
            self.store.count_cars(true),
            self.store.count_users(Role::Customer),
            self.store.count_inquiries(Some(InquiryStatus::New)),
            self.store.count_inquiries(None),
        )?;

        let recent_inquiries = self.list(None, Some(RECENT_INQUIRIES)).await?;

        Ok(DashboardStats {
            total_cars,
            available_cars,
            total_users,
            new_inquiries,
            total_inquiries,
            recent_inquiries,
        })
    }
}
