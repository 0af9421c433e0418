use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::application::AppError;
use crate::domain::AccountId;

use super::error::ApiError;
use super::state::AppState;

/// Identity of the authenticated caller, injected by [`authenticate`].
#[derive(Debug, Clone, Copy)]
pub struct Caller(pub AccountId);

pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| {
            tracing::debug!("missing bearer token");
            ApiError::from(AppError::InvalidToken)
        })?;

    let account = state.auth.authenticate(token)?;
    request.extensions_mut().insert(Caller(account));
    Ok(next.run(request).await)
}
