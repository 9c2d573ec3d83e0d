use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    types::id::{CommentId, ImageId},
    util::validation::validate_tags,
};

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct PostImage {
    #[validate(url)]
    pub url: String,
    #[validate(length(max = 2200))]
    pub caption: Option<String>,
    /// Hashtags with or without the leading `#`.
    #[serde(default)]
    #[validate(length(max = 30), custom = "validate_tags")]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PostImageResponse {
    pub id: ImageId,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct PostComment {
    #[validate(length(min = 1, max = 500))]
    pub content: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PostCommentResponse {
    pub id: CommentId,
}
