use actix_web::{web, HttpResponse};

use super::parse_id;
use crate::{
    http::{Actor, Error},
    services::{BuildProfile, EditProfile, SetProfileImage},
    types::form,
    App,
};

/// `GET /users/{user_id}` where `me` stands for the viewer.
#[tracing::instrument(skip_all, name = "http.users.profile")]
pub async fn profile(
    app: web::Data<App>,
    path: web::Path<String>,
    actor: Actor,
) -> Result<HttpResponse, Error> {
    let viewer = actor.user_id()?;
    let target = if path.as_str() == "me" {
        viewer
    } else {
        parse_id(&path)?
    };

    let view = BuildProfile::new(target)
        .perform(app.store(), viewer)
        .await?;

    Ok(HttpResponse::Ok().json(view))
}

#[tracing::instrument(skip_all, name = "http.users.edit_profile")]
pub async fn edit_profile(
    app: web::Data<App>,
    actor: Actor,
    form: web::Json<form::users::EditProfile>,
) -> Result<HttpResponse, Error> {
    let viewer = actor.user_id()?;
    let request = EditProfile {
        form: form.into_inner(),
    };

    let user = request.perform(app.store(), viewer).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[tracing::instrument(skip_all, name = "http.users.set_profile_image")]
pub async fn set_profile_image(
    app: web::Data<App>,
    actor: Actor,
    form: web::Json<form::users::SetProfileImage>,
) -> Result<HttpResponse, Error> {
    let viewer = actor.user_id()?;
    let request = SetProfileImage {
        form: form.into_inner(),
    };

    let user = request.perform(app.store(), viewer).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    use crate::http::controllers::test_utils::{bearer, init_service, test_data};
    use crate::store::{ContentStore, RelationshipStore};

    #[actix_web::test]
    async fn test_profile_response() {
        let (data, store) = test_data();
        let alice = store.insert_user("alice");
        let bob = store.insert_user("bob");
        store.follow(bob, alice).await.unwrap();

        let image = crate::schema::InsertImage {
            owner_id: alice,
            url: "https://cdn.example.com/1.png",
            caption: None,
            tags: &[],
        };
        let image = store.post_image(&image).await.unwrap();
        store.like(bob, image.id).await.unwrap();

        let service = init_service!(data);
        let request = test::TestRequest::get()
            .uri(&format!("/users/{alice}"))
            .insert_header(bearer(bob))
            .to_request();

        let body: Value = test::call_and_read_body_json(&service, request).await;
        assert_eq!(body["user"]["id"], json!(alice.to_string()));
        assert_eq!(body["isSelf"], json!(false));
        assert_eq!(body["followState"], json!(true));
        assert_eq!(body["followerCount"], json!(1));
        assert_eq!(body["followingCount"], json!(0));
        assert_eq!(body["imageCount"], json!(1));
        assert_eq!(body["images"][0]["likeCount"], json!(1));
        assert_eq!(body["images"][0]["commentCount"], json!(0));
    }

    #[actix_web::test]
    async fn test_profile_of_self() {
        let (data, store) = test_data();
        let alice = store.insert_user("alice");

        let service = init_service!(data);
        let request = test::TestRequest::get()
            .uri("/users/me")
            .insert_header(bearer(alice))
            .to_request();

        let body: Value = test::call_and_read_body_json(&service, request).await;
        assert_eq!(body["isSelf"], json!(true));
        assert_eq!(body["images"], json!([]));
    }

    #[actix_web::test]
    async fn test_profile_errors() {
        let (data, store) = test_data();
        let alice = store.insert_user("alice");
        let service = init_service!(data);

        let request = test::TestRequest::get()
            .uri(&format!("/users/{alice}"))
            .to_request();
        let response = test::call_service(&service, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let request = test::TestRequest::get()
            .uri("/users/424242")
            .insert_header(bearer(alice))
            .to_request();
        let response = test::call_service(&service, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let request = test::TestRequest::get()
            .uri("/users/-1")
            .insert_header(bearer(alice))
            .to_request();
        let response = test::call_service(&service, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["type"], json!("invalid_request"));
    }

    #[actix_web::test]
    async fn test_store_failure_is_internal() {
        let (data, store) = test_data();
        let alice = store.insert_user("alice");
        store.set_unavailable(true);

        let service = init_service!(data);
        let request = test::TestRequest::get()
            .uri(&format!("/users/{alice}"))
            .insert_header(bearer(alice))
            .to_request();

        let response = test::call_service(&service, request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body, json!({ "type": "internal" }));
    }

    #[actix_web::test]
    async fn test_edit_profile() {
        let (data, store) = test_data();
        let alice = store.insert_user("alice");
        let service = init_service!(data);

        let request = test::TestRequest::put()
            .uri("/users/me")
            .insert_header(bearer(alice))
            .set_json(json!({ "name": "Alice", "bio": "hi", "phone": "010-1234-5678" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&service, request).await;
        assert_eq!(body["name"], json!("Alice"));
        assert_eq!(body["phone"], json!("010-1234-5678"));
        assert_eq!(body["website"], json!(null));

        let request = test::TestRequest::put()
            .uri("/users/me")
            .insert_header(bearer(alice))
            .set_json(json!({ "name": "" }))
            .to_request();
        let response = test::call_service(&service, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["type"], json!("invalid_form_body"));

        let request = test::TestRequest::put()
            .uri("/users/me/profile-image")
            .insert_header(bearer(alice))
            .set_json(json!({ "url": "https://cdn.example.com/me.png" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&service, request).await;
        assert_eq!(body["profileImageUrl"], json!("https://cdn.example.com/me.png"));
        assert_eq!(body["bio"], json!("hi"));
    }
}
