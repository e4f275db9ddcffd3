use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::{error::AuthError, repo_types::UserRecord, services};
use crate::state::AppState;

/// Resolves the current-user pointer; rejects with 401 when nobody is logged in.
pub struct CurrentUser(pub UserRecord);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        services::current_user(&state.credentials)
            .await
            .map(CurrentUser)
    }
}
