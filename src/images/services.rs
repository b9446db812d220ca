use anyhow::Context;
use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{state::AppState, users::repo_types::UserProfile};

const PRESIGN_TTL_SECS: u64 = 30 * 60;

pub struct UploadItem {
    pub body: Bytes,
    pub content_type: String,
}

/// Stores a new picture for `user_id` and rewrites the profile to point at
/// it. Returns `Ok(None)` when the user has no profile yet.
pub async fn replace_profile_picture(
    st: &AppState,
    user_id: Uuid,
    item: UploadItem,
) -> anyhow::Result<Option<UserProfile>> {
    let Some(mut profile) = st.users.fetch(user_id).await.context("fetch profile")? else {
        return Ok(None);
    };

    let ext = ext_from_mime(&item.content_type).unwrap_or("bin");
    let key = picture_key(user_id, Uuid::new_v4(), ext);
    st.storage
        .put_object(&key, item.body, &item.content_type)
        .await
        .with_context(|| format!("put_object {}", key))?;

    let previous = profile.profile_picture.replace(key.clone());
    if let Err(e) = st.users.upsert(&profile).await {
        if let Err(cleanup) = st.storage.delete_object(&key).await {
            warn!(error = ?cleanup, %key, "orphaned profile picture");
        }
        return Err(e.context("store profile picture key"));
    }
    info!(%user_id, %key, "profile picture replaced");

    if let Some(old) = previous {
        if let Err(e) = st.storage.delete_object(&old).await {
            warn!(error = ?e, key = %old, "failed to delete previous profile picture");
        }
    }
    Ok(Some(profile))
}

/// Presigned url of the current picture, `None` when there is none.
pub async fn profile_picture_url(st: &AppState, user_id: Uuid) -> anyhow::Result<Option<String>> {
    let profile = st.users.fetch(user_id).await.context("fetch profile")?;
    let Some(key) = profile.and_then(|p| p.profile_picture) else {
        return Ok(None);
    };
    let url = st
        .storage
        .presign_get(&key, PRESIGN_TTL_SECS)
        .await
        .with_context(|| format!("presign url for key {}", key))?;
    Ok(Some(url))
}

fn picture_key(user_id: Uuid, picture_id: Uuid, ext: &str) -> String {
    format!("profiles/{}/{}.{}", user_id, picture_id, ext)
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

#[cfg(test)]
mod image_tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::MemoryStorage;

    fn state_with_storage() -> (AppState, Arc<MemoryStorage>) {
        let mut st = AppState::fake();
        let storage = Arc::new(MemoryStorage::default());
        st.storage = storage.clone();
        (st, storage)
    }

    async fn seed_profile(st: &AppState) -> Uuid {
        let user_id = Uuid::new_v4();
        st.users
            .upsert(&UserProfile {
                user_id,
                name: "Julia".into(),
                age: 51,
                address: String::new(),
                phone: String::new(),
                email: "julia@example.com".into(),
                profile_picture: None,
            })
            .await
            .unwrap();
        user_id
    }

    fn jpeg(bytes: &'static [u8]) -> UploadItem {
        UploadItem {
            body: Bytes::from_static(bytes),
            content_type: "image/jpeg".into(),
        }
    }

    #[test]
    fn test_ext_from_mime() {
        assert_eq!(ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/jpg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/png"), Some("png"));
        assert_eq!(ext_from_mime("image/webp"), Some("webp"));
        assert_eq!(ext_from_mime("image/heic"), Some("heic"));
        assert_eq!(ext_from_mime("application/octet-stream"), None);
    }

    #[test]
    fn keys_are_scoped_per_user() {
        let user = Uuid::new_v4();
        let pic = Uuid::new_v4();
        assert_eq!(
            picture_key(user, pic, "png"),
            format!("profiles/{}/{}.png", user, pic)
        );
    }

    #[tokio::test]
    async fn upload_requires_a_profile() {
        let (st, _) = state_with_storage();
        let got = replace_profile_picture(&st, Uuid::new_v4(), jpeg(b"\xff\xd8"))
            .await
            .unwrap();
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn upload_stores_object_and_replaces_previous() {
        let (st, storage) = state_with_storage();
        let user_id = seed_profile(&st).await;

        let first = replace_profile_picture(&st, user_id, jpeg(b"one"))
            .await
            .unwrap()
            .unwrap();
        let first_key = first.profile_picture.clone().unwrap();
        assert!(first_key.starts_with(&format!("profiles/{}/", user_id)));
        assert!(first_key.ends_with(".jpg"));
        assert!(storage.contains(&first_key).await);

        let second = replace_profile_picture(&st, user_id, jpeg(b"two"))
            .await
            .unwrap()
            .unwrap();
        let second_key = second.profile_picture.clone().unwrap();
        assert_ne!(first_key, second_key);
        assert!(storage.contains(&second_key).await);
        assert!(!storage.contains(&first_key).await);

        // the rest of the record is untouched
        assert_eq!(second.name, "Julia");
        assert_eq!(second.age, 51);
    }

    #[tokio::test]
    async fn url_is_presigned_for_current_picture() {
        let (st, _) = state_with_storage();
        let user_id = seed_profile(&st).await;
        assert!(profile_picture_url(&st, user_id).await.unwrap().is_none());

        let profile = replace_profile_picture(&st, user_id, jpeg(b"img"))
            .await
            .unwrap()
            .unwrap();
        let url = profile_picture_url(&st, user_id).await.unwrap().unwrap();
        assert!(url.contains(&profile.profile_picture.unwrap()));
    }
}
