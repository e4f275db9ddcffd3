use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failures of the account flows. `Display` is the message shown to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Username is required")]
    UsernameRequired,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("User with this email already exists")]
    DuplicateEmail,

    #[error("Please enter both email and password")]
    MissingCredentials,

    #[error("No users found")]
    NoUsers,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("{0}")]
    Internal(&'static str),
}

impl AuthError {
    /// Log an infrastructure failure and collapse it to a generic message.
    pub(crate) fn internal(message: &'static str) -> impl FnOnce(anyhow::Error) -> AuthError {
        move |e| {
            error!(error = ?e, "{}", message);
            AuthError::Internal(message)
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::UsernameRequired
            | AuthError::InvalidEmail
            | AuthError::PasswordTooShort
            | AuthError::PasswordMismatch
            | AuthError::MissingCredentials => StatusCode::BAD_REQUEST,
            AuthError::DuplicateEmail => StatusCode::CONFLICT,
            AuthError::NoUsers | AuthError::InvalidCredentials | AuthError::NotLoggedIn => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(AuthError::PasswordMismatch.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::DuplicateEmail.status(), StatusCode::CONFLICT);
        assert_eq!(AuthError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::Internal("An error occurred during login").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_keeps_only_the_generic_message() {
        let err = AuthError::internal("An error occurred during registration")(anyhow::anyhow!(
            "disk full"
        ));
        assert_eq!(err.to_string(), "An error occurred during registration");
    }
}
