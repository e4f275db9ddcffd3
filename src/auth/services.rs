use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::auth::{
    dto::{LoginRequest, RegisterRequest},
    error::AuthError,
    password::{hash_password, is_long_enough, verify_password},
    repo::{Created, CredentialStore},
    repo_types::UserRecord,
};

const REGISTER_FAILED: &str = "An error occurred during registration";
const LOGIN_FAILED: &str = "An error occurred during login";
const LOGOUT_FAILED: &str = "An error occurred during logout";
const SESSION_FAILED: &str = "An error occurred while loading the current user";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[A-Za-z0-9_.-]+@[A-Za-z0-9_.-]+\.[a-zA-Z]{2,}$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Checks the registration form. The first failing rule wins.
pub fn validate_registration(req: &RegisterRequest) -> Result<(), AuthError> {
    if req.username.trim().is_empty() {
        return Err(AuthError::UsernameRequired);
    }
    if !is_valid_email(&req.email) {
        return Err(AuthError::InvalidEmail);
    }
    if !is_long_enough(&req.password) {
        return Err(AuthError::PasswordTooShort);
    }
    if req.password != req.confirm_password {
        return Err(AuthError::PasswordMismatch);
    }
    Ok(())
}

/// Registers a new user and makes it the current user.
pub async fn register(
    creds: &CredentialStore,
    req: RegisterRequest,
) -> Result<UserRecord, AuthError> {
    if let Err(e) = validate_registration(&req) {
        warn!(reason = %e, "registration rejected");
        return Err(e);
    }

    let hash = hash_password(&req.password).map_err(AuthError::internal(REGISTER_FAILED))?;
    let user = UserRecord::new(&req.username, &req.email, hash);

    match creds
        .create_and_activate(user.clone())
        .await
        .map_err(AuthError::internal(REGISTER_FAILED))?
    {
        Created::Yes => {
            info!(username = %user.username, email = %user.email, "user registered");
            Ok(user)
        }
        Created::DuplicateEmail => {
            warn!(email = %user.email, "email already registered");
            Err(AuthError::DuplicateEmail)
        }
    }
}

/// Linear scan for a case-insensitive email match whose hash verifies the
/// password; on success the record becomes the current user.
pub async fn login(creds: &CredentialStore, req: LoginRequest) -> Result<UserRecord, AuthError> {
    if req.email.trim().is_empty() || req.password.trim().is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    let users = creds
        .load_users()
        .await
        .map_err(AuthError::internal(LOGIN_FAILED))?
        .ok_or_else(|| {
            warn!("login attempted before any registration");
            AuthError::NoUsers
        })?;

    let mut matched = None;
    for user in users.into_iter().filter(|u| u.has_email(&req.email)) {
        if verify_password(&req.password, &user.password_hash)
            .map_err(AuthError::internal(LOGIN_FAILED))?
        {
            matched = Some(user);
            break;
        }
    }

    let Some(user) = matched else {
        warn!(email = %req.email.trim(), "login invalid email or password");
        return Err(AuthError::InvalidCredentials);
    };

    creds
        .set_current(&user)
        .await
        .map_err(AuthError::internal(LOGIN_FAILED))?;

    info!(username = %user.username, email = %user.email, "user logged in");
    Ok(user)
}

/// Clears the current-user pointer. Safe to call without a session.
pub async fn logout(creds: &CredentialStore) -> Result<(), AuthError> {
    creds
        .clear_current()
        .await
        .map_err(AuthError::internal(LOGOUT_FAILED))?;
    debug!("current user cleared");
    Ok(())
}

pub async fn current_user(creds: &CredentialStore) -> Result<UserRecord, AuthError> {
    creds
        .current()
        .await
        .map_err(AuthError::internal(SESSION_FAILED))?
        .ok_or(AuthError::NotLoggedIn)
}
