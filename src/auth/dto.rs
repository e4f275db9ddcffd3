use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::repo_types::UserRecord;

/// Request body for user registration. Missing fields read as empty and fail
/// validation like blank ones.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(alias = "confirm_password")]
    pub confirm_password: String,
}

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after login or register.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub username: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<UserRecord> for PublicUser {
    fn from(u: UserRecord) -> Self {
        Self {
            username: u.username,
            email: u.email,
            created_at: u.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_never_carries_the_hash() {
        let user = UserRecord::new("alice", "a@x.com", "$argon2id$secret-hash".into());
        let json = serde_json::to_string(&PublicUser::from(user)).unwrap();
        assert!(json.contains("\"username\":\"alice\""));
        assert!(json.contains("createdAt"));
        assert!(!json.contains("secret-hash"));
    }

    #[test]
    fn register_request_accepts_both_confirm_spellings() {
        let a: RegisterRequest =
            serde_json::from_str(r#"{"username":"a","confirmPassword":"x"}"#).unwrap();
        let b: RegisterRequest =
            serde_json::from_str(r#"{"username":"a","confirm_password":"x"}"#).unwrap();
        assert_eq!(a.confirm_password, "x");
        assert_eq!(b.confirm_password, "x");
        assert!(a.email.is_empty());
    }
}
