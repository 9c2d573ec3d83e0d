use actix_web::{web, HttpResponse};

use super::parse_id;
use crate::{
    http::{Actor, Error},
    services::DeleteComment,
    util::Sensitive,
    App,
};

#[tracing::instrument(skip_all, name = "http.comments.delete")]
pub async fn delete_comment(
    app: web::Data<App>,
    path: web::Path<String>,
    actor: Actor,
) -> Result<HttpResponse, Error> {
    let viewer = actor.user_id()?;
    let request = DeleteComment {
        comment: Sensitive::new(parse_id(&path)?),
    };

    request.perform(app.store(), viewer).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};

    use crate::http::controllers::test_utils::{bearer, init_service, test_data};
    use crate::schema::{InsertComment, InsertImage};
    use crate::store::ContentStore;

    #[actix_web::test]
    async fn test_delete_comment() {
        let (data, store) = test_data();
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
            content: "mine",
        };
        let comment = store.comment(&comment).await.unwrap();
        let service = init_service!(data);

        let request = test::TestRequest::delete()
            .uri(&format!("/comments/{}", comment.id))
            .insert_header(bearer(alice))
            .to_request();
        let response = test::call_service(&service, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let request = test::TestRequest::delete()
            .uri(&format!("/comments/{}", comment.id))
            .insert_header(bearer(bob))
            .to_request();
        let response = test::call_service(&service, request).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
