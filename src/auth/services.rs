use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, warn};

use super::{
    dto::{AuthResponse, PublicUser, SignInRequest, SignUpRequest},
    jwt::JwtKeys,
    password::{hash_password, verify_password},
    repo_types::Account,
};
use crate::{
    error::AppError,
    state::AppState,
    users::{repo_types::UserProfile, services::save_profile},
};

pub const MIN_PASSWORD_LEN: usize = 6;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex compiles");
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Creates the account, then its profile. A failed profile write leaves the
/// account in place.
pub async fn sign_up(st: &AppState, req: SignUpRequest) -> Result<AuthResponse, AppError> {
    let email = normalize_email(&req.email);
    if !is_valid_email(&email) {
        warn!(%email, "invalid email");
        return Err(AppError::BadRequest("Invalid email".into()));
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(AppError::BadRequest("Password too short".into()));
    }

    if st.accounts.find_by_email(&email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let hash = hash_password(&req.password)?;
    // the lookup above can race another sign-up for the same email
    let Some(account) = st.accounts.create(&email, &hash).await? else {
        warn!(%email, "email registered concurrently");
        return Err(AppError::Conflict("Email already registered".into()));
    };
    info!(user_id = %account.id, %email, "account created");

    let profile = UserProfile {
        user_id: account.id,
        name: req.name,
        age: req.age,
        address: req.address,
        phone: req.phone,
        email: account.email.clone(),
        profile_picture: None,
    };
    if !save_profile(st, account.id, profile).await {
        return Err(AppError::Internal("Failed to save user info".into()));
    }

    issue_tokens(st, account)
}

pub async fn sign_in(st: &AppState, req: SignInRequest) -> Result<AuthResponse, AppError> {
    let email = normalize_email(&req.email);
    if !is_valid_email(&email) {
        warn!(%email, "invalid email");
        return Err(AppError::BadRequest("Invalid email".into()));
    }

    let Some(account) = st.accounts.find_by_email(&email).await? else {
        warn!(%email, "sign-in with unknown email");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    };

    if !verify_password(&req.password, &account.password_hash)? {
        warn!(%email, user_id = %account.id, "sign-in with wrong password");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    info!(user_id = %account.id, "signed in");
    issue_tokens(st, account)
}

pub async fn refresh(st: &AppState, refresh_token: &str) -> Result<AuthResponse, AppError> {
    let keys = JwtKeys::from_ref(st);
    let claims = keys.verify_refresh(refresh_token).map_err(|e| {
        warn!(error = %e, "refresh rejected");
        AppError::Unauthorized("Invalid refresh token".into())
    })?;

    let account = st
        .accounts
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;
    issue_tokens(st, account)
}

fn issue_tokens(st: &AppState, account: Account) -> Result<AuthResponse, AppError> {
    let keys = JwtKeys::from_ref(st);
    let access_token = keys.sign_access(account.id).map_err(|e| {
        error!(error = %e, "jwt sign access failed");
        AppError::from(e)
    })?;
    let refresh_token = keys.sign_refresh(account.id).map_err(|e| {
        error!(error = %e, "jwt sign refresh failed");
        AppError::from(e)
    })?;
    Ok(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser {
            id: account.id,
            email: account.email,
        },
    })
}
