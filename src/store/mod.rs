//! Collaborator interfaces the services read from and write to.
//!
//! Every call is an independent, read-committed round trip. Callers
//! hold a `&dyn DataStore` for the span of one request and never share
//! mutable session state between requests.

use async_trait::async_trait;

use crate::{
    database::Result,
    schema::{Comment, Image, ImageWithCounts, InsertComment, InsertImage, UpdateUser, User},
    types::id::{CommentId, ImageId, UserId},
};

mod postgres;
pub use postgres::PgStore;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod memory;

/// Account records owned by the account service.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_user(&self, id: UserId) -> Result<Option<User>>;

    /// Writes the given changes and returns the updated user, or
    /// `None` if the user does not exist.
    async fn update_user(&self, changes: &UpdateUser) -> Result<Option<User>>;
}

/// Directed follow edges between users.
#[async_trait]
pub trait RelationshipStore: Send + Sync {
    /// Number of users following `user_id`. Unknown users have none.
    async fn follower_count(&self, user_id: UserId) -> Result<u64>;

    /// Number of users `user_id` follows. Unknown users follow nobody.
    async fn following_count(&self, user_id: UserId) -> Result<u64>;

    /// Always `false` if both ids are the same user or if either id
    /// does not resolve to a user.
    async fn is_following(&self, follower: UserId, followee: UserId) -> Result<bool>;

    /// Returns `true` if a new edge was recorded.
    async fn follow(&self, follower: UserId, followee: UserId) -> Result<bool>;

    /// Returns `true` if an edge was removed.
    async fn unfollow(&self, follower: UserId, followee: UserId) -> Result<bool>;
}

/// Images and their engagement.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Every image of `owner_id` with like and comment counts, ordered
    /// by ascending image id. Costs one round trip no matter how many
    /// images the owner has.
    async fn images_with_counts(&self, owner_id: UserId) -> Result<Vec<ImageWithCounts>>;

    async fn find_image(&self, id: ImageId) -> Result<Option<Image>>;

    /// Stores the image and its tags together; either both are
    /// written or neither.
    async fn post_image(&self, image: &InsertImage<'_>) -> Result<Image>;

    /// Returns `true` if a new like was recorded.
    async fn like(&self, user_id: UserId, image_id: ImageId) -> Result<bool>;

    /// Returns `true` if a like was removed.
    async fn unlike(&self, user_id: UserId, image_id: ImageId) -> Result<bool>;

    async fn comment(&self, comment: &InsertComment<'_>) -> Result<Comment>;

    /// Returns `true` if `author_id` had written the comment and it
    /// got deleted.
    async fn delete_comment(&self, id: CommentId, author_id: UserId) -> Result<bool>;
}

/// Everything a request handler may need from the data layer.
pub trait DataStore: UserDirectory + RelationshipStore + ContentStore {}

impl<T> DataStore for T where T: UserDirectory + RelationshipStore + ContentStore {}
