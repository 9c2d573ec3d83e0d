use thiserror::Error;

use crate::{
    http::Error,
    store::DataStore,
    types::{
        self,
        id::{CommentId, UserId},
    },
    util::Sensitive,
};

/// Deletes one of the viewer's own comments. Comments of other users
/// look like they do not exist.
#[derive(Debug)]
pub struct DeleteComment {
    pub comment: Sensitive<CommentId>,
}

impl DeleteComment {
    #[tracing::instrument(skip(store, viewer), name = "services.comments.delete")]
    pub async fn perform(self, store: &dyn DataStore, viewer: UserId) -> Result<(), Error> {
        #[derive(Debug, Error)]
        #[error("Could not find comment specified")]
        struct CommentNotFound;

        if !store.delete_comment(*self.comment.value(), viewer).await? {
            return Err(Error::from_context(
                types::Error::NotFound,
                CommentNotFound,
            ));
        }
        Ok(())
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        schema::{InsertComment, InsertImage},
        services::test_utils::assert_error_type,
        store::{memory::MemoryStore, ContentStore},
    };

    #[tokio::test]
    async fn should_only_delete_own_comment() {
        let store = MemoryStore::new();
        let alice = store.insert_user("alice");
        let bob = store.insert_user("bob");

        let image = InsertImage {
            owner_id: alice,
            url: "https://cdn.example.com/1.png",
            caption: None,
            tags: &[],
        };
        let image = store.post_image(&image).await.unwrap();

        let comment = InsertComment {
            author_id: bob,
            image_id: image.id,
            content: "first",
        };
        let comment = store.comment(&comment).await.unwrap();

        let request = DeleteComment {
            comment: Sensitive::new(comment.id),
        };
        assert_error_type(request.perform(&store, alice).await, &types::Error::NotFound);

        let request = DeleteComment {
            comment: Sensitive::new(comment.id),
        };
        request.perform(&store, bob).await.unwrap();

        let images = store.images_with_counts(alice).await.unwrap();
        assert_eq!(images[0].comment_count, 0);
    }
}
