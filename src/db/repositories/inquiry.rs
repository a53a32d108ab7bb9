use crate::domain::{InquiryStatus, timestamp_now};
use crate::entities::{cars, inquiries, prelude::*};
use crate::models::inquiry::NewInquiry;
use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

pub struct InquiryRepository {
    conn: DatabaseConnection,
}

impl InquiryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(&self, inquiry: NewInquiry) -> Result<inquiries::Model> {
        let now = timestamp_now();

        let active_model = inquiries::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            name: Set(inquiry.name),
            email: Set(inquiry.email),
            phone: Set(inquiry.phone),
            message: Set(inquiry.message),
            car_id: Set(inquiry.car_id),
            user_id: Set(inquiry.user_id),
            status: Set(InquiryStatus::New),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        active_model
            .insert(&self.conn)
            .await
            .context("Failed to insert inquiry")
    }

    /// Inquiries with the car they are about, newest first. Restricted to one
    /// user's inquiries when `user_id` is given.
    pub async fn list(
        &self,
        user_id: Option<&str>,
        limit: Option<u64>,
    ) -> Result<Vec<(inquiries::Model, Option<cars::Model>)>> {
        let mut query = Inquiries::find();
        if let Some(user_id) = user_id {
            query = query.filter(inquiries::Column::UserId.eq(user_id));
        }

        let mut query = query
            .order_by_desc(inquiries::Column::CreatedAt)
            .find_also_related(Cars);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        query
            .all(&self.conn)
            .await
            .context("Failed to query inquiries")
    }

    pub async fn set_status(&self, id: &str, status: InquiryStatus) -> Result<bool> {
        let result = Inquiries::update_many()
            .col_expr(
                inquiries::Column::Status,
                sea_orm::sea_query::Expr::value(status),
            )
            .col_expr(
                inquiries::Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(timestamp_now()),
            )
            .filter(inquiries::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to update inquiry status")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self, status: Option<InquiryStatus>) -> Result<u64> {
        let mut query = Inquiries::find();
        if let Some(status) = status {
            query = query.filter(inquiries::Column::Status.eq(status));
        }

        query
            .count(&self.conn)
            .await
            .context("Failed to count inquiries")
    }
}
