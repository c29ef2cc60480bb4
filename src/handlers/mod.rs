//! HTTP handlers. Each handler owns its collaborators and is shared with
//! actix through `web::Data`.

pub mod cart;
pub mod item;
pub mod order;
pub mod user;

use actix_web::web;

use crate::auth::TokenIssuer;
use crate::error::ApiError;
use crate::middleware::AuthMiddleware;

pub use cart::CartHandler;
pub use item::ItemHandler;
pub use order::OrderHandler;
pub use user::UserHandler;

/// Registers every route. Only registration and login are reachable
/// without a bearer token. Malformed bodies and paths are reported as
/// validation errors.
pub fn configure(tokens: TokenIssuer) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(
            web::JsonConfig::default()
                .error_handler(|e, _| ApiError::validation(e.to_string()).into()),
        );
        cfg.app_data(
            web::PathConfig::default()
                .error_handler(|e, _| ApiError::validation(e.to_string()).into()),
        );

        cfg.route("/user/create", web::post().to(user::create_user))
            .route("/login", web::post().to(user::login))
            .service(
                web::scope("")
                    .wrap(AuthMiddleware::new(tokens))
                    .route("/user/id/{id}", web::get().to(user::find_by_id))
                    .route("/user/{username}", web::get().to(user::find_by_username))
                    .route("/cart/addToCart", web::post().to(cart::add_to_cart))
                    .route("/cart/removeFromCart", web::post().to(cart::remove_from_cart))
                    .route("/item", web::get().to(item::list_items))
                    .route("/item/{id}", web::get().to(item::find_by_id))
                    .route("/item/name/{name}", web::get().to(item::find_by_name))
                    .route("/order/submit/{username}", web::post().to(order::submit))
                    .route("/order/history/{username}", web::get().to(order::history)),
            );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::{header, StatusCode};
    use actix_web::{test, App};

    use crate::auth::TokenIssuer;
    use crate::store::MockItemStore;
    use crate::test_helpers::{bearer, round_widget, test_tokens};

    use super::*;

    fn catalogue() -> ItemHandler {
        let mut items = MockItemStore::new();
        items
            .expect_find_by_id()
            .returning(|id| Ok((id == 1).then(round_widget)));
        ItemHandler::new(Arc::new(items))
    }

    #[actix_web::test]
    async fn protected_routes_check_the_bearer_token() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(catalogue()))
                .configure(configure(test_tokens())),
        )
        .await;

        let cases = [
            (None, StatusCode::UNAUTHORIZED),
            (Some("Basic dGVzdDp0ZXN0".to_string()), StatusCode::UNAUTHORIZED),
            (Some("Bearer not-a-jwt".to_string()), StatusCode::UNAUTHORIZED),
            (
                Some(format!(
                    "Bearer {}",
                    TokenIssuer::new("other-secret", 1).issue("test").unwrap()
                )),
                StatusCode::UNAUTHORIZED,
            ),
            (Some(bearer("test").1), StatusCode::OK),
        ];

        for (authorization, expected) in cases {
            let mut req = test::TestRequest::get().uri("/item/1");
            if let Some(value) = &authorization {
                req = req.insert_header((header::AUTHORIZATION, value.as_str()));
            }

            let res = test::call_service(&app, req.to_request()).await;

            assert_eq!(res.status(), expected, "authorization: {authorization:?}");
        }
    }

    #[actix_web::test]
    async fn rejected_requests_get_a_json_error() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(catalogue()))
                .configure(configure(test_tokens())),
        )
        .await;

        let req = test::TestRequest::get().uri("/item/1").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["error"], "Authorization header missing");
    }
}
