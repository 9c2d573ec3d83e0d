use validator::Validate;

use crate::{
    http::Error,
    schema::{InsertComment, InsertImage},
    store::DataStore,
    types::{
        form,
        id::{ImageId, UserId},
    },
    util::Sensitive,
};

/// Strips the leading `#` and lowercases every tag, keeping the first
/// occurrence of each.
fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim_start_matches('#').to_lowercase();
        if !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    normalized
}

/// Records an image the viewer already uploaded to the storage service.
#[derive(Debug)]
pub struct PostImage {
    pub form: form::images::PostImage,
}

impl PostImage {
    #[tracing::instrument(skip_all, name = "services.images.post")]
    pub async fn perform(
        self,
        store: &dyn DataStore,
        viewer: UserId,
    ) -> Result<form::images::PostImageResponse, Error> {
        self.form.validate()?;
        super::ensure_viewer(store, viewer).await?;

        let tags = normalize_tags(&self.form.tags);
        let image = InsertImage {
            owner_id: viewer,
            url: &self.form.url,
            caption: self.form.caption.as_deref(),
            tags: &tags,
        };
        let image = store.post_image(&image).await?;
        tracing::info!(image.id = %image.id, tags = tags.len(), "posted image");

        Ok(form::images::PostImageResponse { id: image.id })
    }
}

#[derive(Debug)]
pub struct PostComment {
    pub image: Sensitive<ImageId>,
    pub form: form::images::PostComment,
}

impl PostComment {
    #[tracing::instrument(skip(store, viewer), name = "services.images.comment")]
    pub async fn perform(
        self,
        store: &dyn DataStore,
        viewer: UserId,
    ) -> Result<form::images::PostCommentResponse, Error> {
        self.form.validate()?;

        let image_id = *self.image.value();
        super::ensure_viewer(store, viewer).await?;
        super::likes::ensure_image(store, image_id).await?;

        let comment = InsertComment {
            author_id: viewer,
            image_id,
            content: &self.form.content,
        };
        let comment = store.comment(&comment).await?;

        Ok(form::images::PostCommentResponse { id: comment.id })
    }
}
