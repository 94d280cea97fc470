//! Caller context middleware

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use crate::error::AppError;
use crate::AppState;

pub const USER_ID_HEADER: &str = "X-User-Id";
pub const ASSIGNED_BY_HEADER: &str = "X-Assigned-By";

/// The resolved identity of the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// User the created memberships belong to
    pub user_id: i64,
    /// Administrator recorded as `assignedBy`
    pub assigned_by: String,
}

/// A non-blank header value, or `BadRequest` when it is not UTF-8
fn header<'a>(request: &'a Request<Body>, name: &str) -> Result<Option<&'a str>, AppError> {
    let Some(value) = request.headers().get(name) else {
        return Ok(None);
    };

    let value = std::str::from_utf8(value.as_bytes())
        .map_err(|_| AppError::BadRequest(format!("{} must be valid UTF-8", name)))?
        .trim();

    Ok(Some(value).filter(|v| !v.is_empty()))
}

/// Resolve the caller and inject it into request extensions
///
/// Headers win over the configured defaults. A non-numeric user id or a
/// header that is not UTF-8 is rejected.
pub async fn caller_context_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = match header(&request, USER_ID_HEADER)? {
        Some(value) => value.parse::<i64>().map_err(|_| {
            AppError::BadRequest(format!("{} must be an integer", USER_ID_HEADER))
        })?,
        None => state.config.default_user_id,
    };

    let assigned_by = header(&request, ASSIGNED_BY_HEADER)?
        .map(str::to_string)
        .unwrap_or_else(|| state.config.default_assigned_by.clone());

    tracing::trace!(user_id, assigned_by = %assigned_by, "Resolved caller");

    request.extensions_mut().insert(Caller {
        user_id,
        assigned_by,
    });

    Ok(next.run(request).await)
}
