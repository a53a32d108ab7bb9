use axum::{Json, extract::State};
use std::sync::Arc;

use super::auth::{CurrentViewer, MaybeViewer};
use super::types::{ContactRequest, ContactResponse};
use super::validation::{optional, require, validate_email};
use super::{ApiError, AppState};
use crate::models::inquiry::{InquiryDto, NewInquiry};

const THANK_YOU: &str = "Thank you for your inquiry. We will contact you soon!";

/// POST /contact
///
/// Anyone may write in; a signed-in caller's inquiry is linked to their
/// account.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    MaybeViewer(viewer): MaybeViewer,
    Json(payload): Json<ContactRequest>,
) -> Result<Json<ContactResponse>, ApiError> {
    let name = require(payload.name.as_deref(), "name")?;
    let email = validate_email(require(payload.email.as_deref(), "email")?)?;
    let message = require(payload.message.as_deref(), "message")?;

    let inquiry = NewInquiry {
        name: name.to_string(),
        email: email.to_string(),
        phone: optional(payload.phone),
        message: message.to_string(),
        car_id: optional(payload.car_id),
        user_id: viewer.map(|v| v.user_id.as_str().to_string()),
    };

    let stored = state
        .inquiry_service()
        .submit(inquiry)
        .await
        .map_err(ApiError::fetch_failed("Failed to submit inquiry"))?;

    Ok(Json(ContactResponse {
        success: true,
        message: THANK_YOU,
        inquiry_id: stored.id,
    }))
}

/// GET /user/inquiries
pub async fn list_own(
    State(state): State<Arc<AppState>>,
    CurrentViewer(viewer): CurrentViewer,
) -> Result<Json<Vec<InquiryDto>>, ApiError> {
    let inquiries = state
        .inquiry_service()
        .list_for_user(&viewer.user_id)
        .await
        .map_err(ApiError::fetch_failed("Failed to fetch inquiries"))?;

    Ok(Json(inquiries))
}
