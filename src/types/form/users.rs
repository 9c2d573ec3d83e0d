use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::util::validation::{validate_gender, validate_phone};

/// Body of `PUT /users/me`. Every field is written as given, so
/// omitting an optional field clears it.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct EditProfile {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(length(max = 150))]
    pub bio: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,
    #[validate(custom = "validate_gender")]
    pub gender: Option<String>,
}

/// Body of `PUT /users/me/profile-image`. The url is whatever the
/// upload storage handed back to the client.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct SetProfileImage {
    #[validate(url)]
    pub url: String,
}
