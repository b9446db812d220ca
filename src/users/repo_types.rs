use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One profile per account, keyed by the account id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub name: String,
    pub age: i32,
    pub address: String,
    pub phone: String,
    pub email: String,
    /// Storage key of the profile picture, if one was uploaded.
    pub profile_picture: Option<String>,
}
