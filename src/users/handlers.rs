use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::{error, instrument, warn};

use super::{
    dto::ProfileRequest,
    repo_types::UserProfile,
    services::{load_profile, save_profile},
};
use crate::{
    auth::jwt::AuthUser,
    error::AppError,
    images::services::{profile_picture_url, replace_profile_picture, UploadItem},
    state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(put_profile))
        .route(
            "/profile/picture",
            post(upload_picture)
                .get(get_picture)
                .layer(DefaultBodyLimit::max(10 * 1024 * 1024)),
        )
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserProfile>, AppError> {
    load_profile(&state, user_id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Failed to load user data".into()))
}

#[instrument(skip(state, body))]
pub async fn put_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<ProfileRequest>,
) -> Result<Json<UserProfile>, AppError> {
    // a lost read must not wipe the stored picture key
    let picture = match state.users.fetch(user_id).await {
        Ok(existing) => existing.and_then(|p| p.profile_picture),
        Err(e) => {
            error!(error = ?e, %user_id, "read profile before update failed");
            return Err(AppError::Internal("Failed to update profile".into()));
        }
    };
    let profile = body.into_profile(user_id, picture);
    if !save_profile(&state, user_id, profile.clone()).await {
        return Err(AppError::Internal("Failed to update profile".into()));
    }
    Ok(Json(profile))
}

/// POST /profile/picture (multipart, field `file`)
#[instrument(skip(state, mp))]
pub async fn upload_picture(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mut mp: Multipart,
) -> Result<Json<UserProfile>, AppError> {
    let mut upload = None;
    loop {
        let field = match mp.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "malformed multipart body");
                return Err(AppError::BadRequest("Malformed upload".into()));
            }
        };
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let body = field.bytes().await.map_err(|e| {
            warn!(error = %e, "failed reading upload");
            AppError::BadRequest("Malformed upload".into())
        })?;
        upload = Some(UploadItem { body, content_type });
        break;
    }

    let Some(item) = upload else {
        return Err(AppError::BadRequest("file is required".into()));
    };
    if item.body.is_empty() {
        return Err(AppError::BadRequest("file is empty".into()));
    }

    match replace_profile_picture(&state, user_id, item).await {
        Ok(Some(profile)) => Ok(Json(profile)),
        Ok(None) => Err(AppError::NotFound("Failed to load user data".into())),
        Err(e) => {
            error!(error = ?e, %user_id, "profile picture upload failed");
            Err(AppError::Internal("Failed to upload picture".into()))
        }
    }
}

/// 307 to a presigned url of the current picture.
#[instrument(skip(state))]
pub async fn get_picture(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Response, AppError> {
    match profile_picture_url(&state, user_id).await {
        Ok(Some(url)) => Ok(Redirect::temporary(&url).into_response()),
        Ok(None) => Err(AppError::NotFound("No profile picture".into())),
        Err(e) => {
            error!(error = ?e, %user_id, "presign profile picture failed");
            Err(AppError::Internal("Failed to load picture".into()))
        }
    }
}
