use serde::Deserialize;
use uuid::Uuid;

use super::repo_types::UserProfile;
use crate::parse::lenient_i32;

/// Body of `PUT /profile`. Omitted fields are written as empty, the record
/// is replaced as a whole. The picture key is not client-editable.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProfileRequest {
    pub name: String,
    #[serde(deserialize_with = "lenient_i32")]
    pub age: i32,
    pub address: String,
    pub phone: String,
    pub email: String,
}

impl ProfileRequest {
    pub fn into_profile(self, user_id: Uuid, profile_picture: Option<String>) -> UserProfile {
        UserProfile {
            user_id,
            name: self.name,
            age: self.age,
            address: self.address,
            phone: self.phone,
            email: self.email,
            profile_picture,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_and_age_is_lenient() {
        let req: ProfileRequest =
            serde_json::from_str(r#"{"name": "Grace", "age": "not a number", "profile_picture": "x"}"#)
                .unwrap();
        let user_id = Uuid::new_v4();
        let profile = req.into_profile(user_id, None);
        assert_eq!(profile.user_id, user_id);
        assert_eq!(profile.name, "Grace");
        assert_eq!(profile.age, 0);
        assert_eq!(profile.address, "");
        assert!(profile.profile_picture.is_none());
    }
}
