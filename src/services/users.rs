use validator::Validate;

use super::{ProfileUser, UnknownViewer};
use crate::{
    http::Error,
    schema::UpdateUser,
    store::DataStore,
    types::{self, form, id::UserId},
};

/// Writes the changes explicitly; nothing else about the user is
/// touched.
async fn apply(store: &dyn DataStore, changes: UpdateUser) -> Result<ProfileUser, Error> {
    let Some(user) = store.update_user(&changes).await? else {
        return Err(Error::from_context(
            types::Error::Unauthorized,
            UnknownViewer,
        ));
    };
    Ok(ProfileUser::from(user))
}

#[derive(Debug)]
pub struct EditProfile {
    pub form: form::users::EditProfile,
}

impl EditProfile {
    #[tracing::instrument(skip_all, name = "services.users.edit_profile")]
    pub async fn perform(self, store: &dyn DataStore, viewer: UserId) -> Result<ProfileUser, Error> {
        self.form.validate()?;

        let form = self.form;
        let mut changes = UpdateUser::new(viewer);
        changes.name = Some(form.name);
        changes.bio = Some(form.bio);
        changes.website = Some(form.website);
        changes.phone = Some(form.phone);
        changes.gender = Some(form.gender);

        apply(store, changes).await
    }
}

#[derive(Debug)]
pub struct SetProfileImage {
    pub form: form::users::SetProfileImage,
}

impl SetProfileImage {
    #[tracing::instrument(skip_all, name = "services.users.set_profile_image")]
    pub async fn perform(self, store: &dyn DataStore, viewer: UserId) -> Result<ProfileUser, Error> {
        self.form.validate()?;

        let mut changes = UpdateUser::new(viewer);
        changes.profile_image_url = Some(Some(self.form.url));

        apply(store, changes).await
    }
}
