//! Membership handlers
//!
//! Endpoints for creating and listing memberships.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::app::CreateMembershipInput;
use crate::auth::Caller;
use crate::domain::dates::parse_date;
use crate::domain::entities::PaymentMethod;
use crate::error::AppError;
use crate::AppState;

use super::views::{
    create_membership_response, membership_list_entry, CreateMembershipResponse,
    MembershipListEntry,
};

/// Request body for creating a membership
///
/// Every field is optional here; the creation rules report what is missing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMembershipRequest {
    pub name: Option<String>,
    pub recurring_price: Option<f64>,
    pub payment_method: Option<String>,
    pub billing_interval: Option<String>,
    pub billing_periods: Option<i64>,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp
    pub valid_from: Option<String>,
}

impl CreateMembershipRequest {
    /// Combine the body with the caller's identity
    fn into_input(self, caller: Caller) -> Result<CreateMembershipInput, AppError> {
        let payment_method = self
            .payment_method
            .map(|method| method.parse::<PaymentMethod>())
            .transpose()
            .map_err(AppError::BadRequest)?;

        let valid_from = self
            .valid_from
            .map(|value| {
                parse_date(&value).map_err(|e| {
                    AppError::BadRequest(format!("Invalid validFrom '{}': {}", value, e))
                })
            })
            .transpose()?;

        Ok(CreateMembershipInput {
            name: self.name,
            recurring_price: self.recurring_price,
            payment_method,
            billing_interval: self.billing_interval,
            billing_periods: self.billing_periods.unwrap_or_default(),
            assigned_by: caller.assigned_by,
            user_id: caller.user_id,
            valid_from,
        })
    }
}

/// POST /memberships
///
/// Create a membership with its billing periods for the calling user.
pub async fn create_membership(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    body: Result<Json<CreateMembershipRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateMembershipResponse>), AppError> {
    let Json(request) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let input = request.into_input(caller)?;

    let membership = state.create_membership.execute(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(create_membership_response(&membership)),
    ))
}

/// GET /memberships
///
/// List every membership with its periods.
pub async fn list_memberships(
    State(state): State<AppState>,
) -> Result<Json<Vec<MembershipListEntry>>, AppError> {
    let memberships = state.list_memberships.execute().await?;

    Ok(Json(memberships.iter().map(membership_list_entry).collect()))
}
