//! Row types and the parameterized statements that read and write
//! them. Every statement is built with [`sea_query`] so that values
//! given by users are always bound as parameters.

mod comment;
mod follow;
mod image;
mod like;
mod tag;
mod user;

pub use comment::{Comment, CommentIdent, InsertComment};
pub use follow::{Follow, FollowIdent};
pub use image::{Image, ImageIdent, ImageWithCounts, InsertImage};
pub use like::{Like, LikeIdent};
pub use tag::{Tag, TagIdent};
pub use user::{UpdateUser, User, UserIdent};

#[cfg(test)]
pub(crate) fn bound_values(values: &sea_query_binder::SqlxValues) -> usize {
    values.0 .0.len()
}
