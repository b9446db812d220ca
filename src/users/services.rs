use tracing::{debug, error};
use uuid::Uuid;

use super::repo_types::UserProfile;
use crate::state::AppState;

/// Writes the whole profile under `user_id`. Any failure is logged and
/// reported as `false`.
pub async fn save_profile(st: &AppState, user_id: Uuid, profile: UserProfile) -> bool {
    let profile = UserProfile { user_id, ..profile };
    match st.users.upsert(&profile).await {
        Ok(()) => {
            debug!(%user_id, "profile saved");
            true
        }
        Err(e) => {
            error!(error = ?e, %user_id, "save profile failed");
            false
        }
    }
}

/// The profile of `user_id`; `None` when missing or on any failure.
pub async fn load_profile(st: &AppState, user_id: Uuid) -> Option<UserProfile> {
    match st.users.fetch(user_id).await {
        Ok(profile) => profile,
        Err(e) => {
            error!(error = ?e, %user_id, "load profile failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::users::repo::UserRepo;

    struct BrokenRepo;

    #[async_trait]
    impl UserRepo for BrokenRepo {
        async fn upsert(&self, _profile: &UserProfile) -> anyhow::Result<()> {
            anyhow::bail!("permission denied")
        }
        async fn fetch(&self, _user_id: Uuid) -> anyhow::Result<Option<UserProfile>> {
            anyhow::bail!("network unreachable")
        }
    }

    fn profile(name: &str) -> UserProfile {
        UserProfile {
            user_id: Uuid::nil(),
            name: name.into(),
            age: 29,
            address: "12 Rue des Fleurs".into(),
            phone: "555-0101".into(),
            email: "ada@example.com".into(),
            profile_picture: None,
        }
    }

    #[tokio::test]
    async fn saved_profile_reads_back_unchanged() {
        let st = AppState::fake();
        let user_id = Uuid::new_v4();
        assert!(save_profile(&st, user_id, profile("Ada")).await);

        let loaded = load_profile(&st, user_id).await.expect("profile exists");
        assert_eq!(loaded, UserProfile { user_id, ..profile("Ada") });
    }

    #[tokio::test]
    async fn save_overwrites_the_whole_record() {
        let st = AppState::fake();
        let user_id = Uuid::new_v4();
        assert!(save_profile(&st, user_id, profile("Ada")).await);

        let sparse = UserProfile {
            user_id,
            name: "Ada L.".into(),
            age: 0,
            address: String::new(),
            phone: String::new(),
            email: String::new(),
            profile_picture: None,
        };
        assert!(save_profile(&st, user_id, sparse.clone()).await);
        assert_eq!(load_profile(&st, user_id).await, Some(sparse));
    }

    #[tokio::test]
    async fn key_comes_from_the_caller_not_the_body() {
        let st = AppState::fake();
        let user_id = Uuid::new_v4();
        let forged = UserProfile {
            user_id: Uuid::new_v4(),
            ..profile("Mallory")
        };
        assert!(save_profile(&st, user_id, forged.clone()).await);
        assert!(load_profile(&st, forged.user_id).await.is_none());
        assert_eq!(load_profile(&st, user_id).await.unwrap().name, "Mallory");
    }

    #[tokio::test]
    async fn missing_profile_is_none() {
        let st = AppState::fake();
        assert!(load_profile(&st, Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn repo_failures_degrade() {
        let mut st = AppState::fake();
        st.users = Arc::new(BrokenRepo);
        assert!(!save_profile(&st, Uuid::new_v4(), profile("Ada")).await);
        assert!(load_profile(&st, Uuid::new_v4()).await.is_none());
    }
}
