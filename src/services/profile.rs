use error_stack::{Report, ResultExt};
use serde::Serialize;
use thiserror::Error;

use crate::{
    schema::{ImageWithCounts, User},
    store::DataStore,
    types::id::{ImageId, UserId},
    util::Sensitive,
};

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Could not find user specified")]
    UserNotFound,
    #[error("Could not read profile from the data store")]
    Store,
}

/// Public part of a user shown on their profile page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUser {
    pub id: UserId,
    pub name: String,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub profile_image_url: Option<String>,
}

impl From<User> for ProfileUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            bio: user.bio,
            website: user.website,
            phone: user.phone,
            gender: user.gender,
            profile_image_url: user.profile_image_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileImage {
    pub id: ImageId,
    pub url: String,
    pub like_count: u64,
    pub comment_count: u64,
}

impl From<ImageWithCounts> for ProfileImage {
    fn from(row: ImageWithCounts) -> Self {
        Self {
            id: row.id,
            url: row.url,
            like_count: row.like_count.unsigned_abs(),
            comment_count: row.comment_count.unsigned_abs(),
        }
    }
}

/// Snapshot of a user's profile as seen by one viewer. Nothing in
/// here points back into the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub user: ProfileUser,
    pub is_self: bool,
    pub follow_state: bool,
    pub follower_count: u64,
    pub following_count: u64,
    pub image_count: u64,
    pub images: Vec<ProfileImage>,
}

#[derive(Debug)]
pub struct BuildProfile {
    pub target: Sensitive<UserId>,
}

impl BuildProfile {
    #[must_use]
    pub const fn new(target: UserId) -> Self {
        Self {
            target: Sensitive::new(target),
        }
    }

    /// Assembles the profile of the target user.
    ///
    /// The reads after the user lookup run concurrently and each sees
    /// whatever was committed when it ran, so counts may disagree with
    /// each other if writers race with the request. Any store failure
    /// fails the whole profile.
    #[tracing::instrument(skip(store, viewer), name = "services.profile.build")]
    pub async fn perform(
        self,
        store: &dyn DataStore,
        viewer: UserId,
    ) -> error_stack::Result<ProfileView, ProfileError> {
        let target = *self.target.value();
        let Some(user) = store
            .get_user(target)
            .await
            .change_context(ProfileError::Store)?
        else {
            return Err(Report::new(ProfileError::UserNotFound));
        };

        let (images, follower_count, following_count, follow_state) = futures::try_join!(
            store.images_with_counts(user.id),
            store.follower_count(user.id),
            store.following_count(user.id),
            store.is_following(viewer, user.id),
        )
        .change_context(ProfileError::Store)?;

        let images: Vec<ProfileImage> = images.into_iter().map(ProfileImage::from).collect();
        Ok(ProfileView {
            is_self: user.id == viewer,
            follow_state,
            follower_count,
            following_count,
            image_count: images.len() as u64,
            images,
            user: ProfileUser::from(user),
        })
    }
}
