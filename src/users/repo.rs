use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repo_types::UserProfile;

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Replaces the whole record for `profile.user_id`.
    async fn upsert(&self, profile: &UserProfile) -> anyhow::Result<()>;
    async fn fetch(&self, user_id: Uuid) -> anyhow::Result<Option<UserProfile>>;
}

pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn upsert(&self, profile: &UserProfile) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, name, age, address, phone, email, profile_picture)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO UPDATE
               SET name = EXCLUDED.name,
                   age = EXCLUDED.age,
                   address = EXCLUDED.address,
                   phone = EXCLUDED.phone,
                   email = EXCLUDED.email,
                   profile_picture = EXCLUDED.profile_picture
            "#,
        )
        .bind(profile.user_id)
        .bind(&profile.name)
        .bind(profile.age)
        .bind(&profile.address)
        .bind(&profile.phone)
        .bind(&profile.email)
        .bind(&profile.profile_picture)
        .execute(&self.db)
        .await
        .context("upsert user")?;
        Ok(())
    }

    async fn fetch(&self, user_id: Uuid) -> anyhow::Result<Option<UserProfile>> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT user_id, name, age, address, phone, email, profile_picture
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("fetch user")?;
        Ok(profile)
    }
}

#[derive(Default)]
pub struct MemoryUserRepo {
    users: RwLock<HashMap<Uuid, UserProfile>>,
}

#[async_trait]
impl UserRepo for MemoryUserRepo {
    async fn upsert(&self, profile: &UserProfile) -> anyhow::Result<()> {
        self.users
            .write()
            .await
            .insert(profile.user_id, profile.clone());
        Ok(())
    }

    async fn fetch(&self, user_id: Uuid) -> anyhow::Result<Option<UserProfile>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }
}
