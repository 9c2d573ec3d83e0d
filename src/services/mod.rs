//! Operations a request can perform. Each one is a plain struct
//! holding the request's input with a `perform` method taking the
//! request's store handle and, where needed, the viewing user.

use thiserror::Error;

use crate::{
    http::Error,
    store::DataStore,
    types::{self, id::UserId},
};

pub mod comments;
pub mod follows;
pub mod images;
pub mod likes;
pub mod profile;
pub mod users;

pub use comments::DeleteComment;
pub use follows::{FollowUser, UnfollowUser};
pub use images::{PostComment, PostImage};
pub use likes::{LikeImage, UnlikeImage};
pub use profile::{BuildProfile, ProfileError, ProfileImage, ProfileUser, ProfileView};
pub use users::{EditProfile, SetProfileImage};

#[derive(Debug, Error)]
#[error("Viewing user no longer exists")]
struct UnknownViewer;

/// Writes need a viewer that still has an account.
async fn ensure_viewer(store: &dyn DataStore, viewer: UserId) -> Result<(), Error> {
    if store.get_user(viewer).await?.is_none() {
        return Err(Error::from_context(
            types::Error::Unauthorized,
            UnknownViewer,
        ));
    }
    Ok(())
}
