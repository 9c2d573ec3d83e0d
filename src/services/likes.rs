use thiserror::Error;

use crate::{
    http::Error,
    store::DataStore,
    types::{
        self,
        id::{ImageId, UserId},
    },
    util::Sensitive,
};

#[derive(Debug, Error)]
#[error("Could not find image specified")]
pub(crate) struct ImageNotFound;

pub(crate) async fn ensure_image(store: &dyn DataStore, image: ImageId) -> Result<(), Error> {
    if store.find_image(image).await?.is_none() {
        return Err(Error::from_context(types::Error::NotFound, ImageNotFound));
    }
    Ok(())
}

#[derive(Debug)]
pub struct LikeImage {
    pub image: Sensitive<ImageId>,
}

impl LikeImage {
    #[tracing::instrument(skip(store, viewer), name = "services.likes.like")]
    pub async fn perform(self, store: &dyn DataStore, viewer: UserId) -> Result<(), Error> {
        let image = *self.image.value();
        super::ensure_viewer(store, viewer).await?;
        ensure_image(store, image).await?;

        if !store.like(viewer, image).await? {
            tracing::debug!("viewer already liked this image");
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct UnlikeImage {
    pub image: Sensitive<ImageId>,
}

impl UnlikeImage {
    #[tracing::instrument(skip(store, viewer), name = "services.likes.unlike")]
    pub async fn perform(self, store: &dyn DataStore, viewer: UserId) -> Result<(), Error> {
        let image = *self.image.value();
        super::ensure_viewer(store, viewer).await?;
        ensure_image(store, image).await?;

        if !store.unlike(viewer, image).await? {
            tracing::debug!("viewer has not liked this image");
        }
        Ok(())
    }
}
