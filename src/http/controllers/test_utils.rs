use actix_web::{http::header, web};
use std::sync::Arc;

use crate::{config, http::Jwt, store::memory::MemoryStore, types::id::UserId, App};

pub fn test_data() -> (web::Data<App>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let app = App::with_store(config::Server::for_tests(), store.clone());
    (web::Data::new(app), store)
}

#[allow(clippy::unwrap_used)]
pub fn bearer(user_id: UserId) -> (header::HeaderName, String) {
    let token = Jwt::new(user_id)
        .encode(&config::Server::for_tests())
        .unwrap();
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

/// Builds the actix service with every controller mounted.
macro_rules! init_service {
    ($data:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($data)
                .configure($crate::http::controllers::configure),
        )
        .await
    };
}
pub(crate) use init_service;
