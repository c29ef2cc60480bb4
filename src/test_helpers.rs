//! Test helpers.

use std::sync::{Arc, Mutex};

use actix_web::http::header;
use rust_decimal::Decimal;

use crate::auth::TokenIssuer;
use crate::models::{Cart, Item, User};
use crate::store::MockUserStore;

pub(crate) const TEST_SECRET: &str = "test-secret";

pub(crate) fn dec(value: &str) -> Decimal {
    value.parse().expect("valid decimal literal")
}

pub(crate) fn round_widget() -> Item {
    Item {
        id: 1,
        name: "Round Widget".to_string(),
        price: dec("2.99"),
        description: "A widget that is round".to_string(),
    }
}

/// A stored user with an empty cart sharing the user's id.
pub(crate) fn user(id: i64, username: &str) -> User {
    User {
        id,
        username: username.to_string(),
        password: "thisIsHashed".to_string(),
        cart: Cart::new(id, id),
    }
}

pub(crate) fn test_tokens() -> TokenIssuer {
    TokenIssuer::new(TEST_SECRET, 1)
}

pub(crate) fn bearer(username: &str) -> (header::HeaderName, String) {
    let token = test_tokens().issue(username).expect("token");
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

/// User store mock holding a single user whose cart survives `save_cart`,
/// so consecutive cart operations see each other's writes.
pub(crate) fn stateful_user_store(user: User) -> MockUserStore {
    let state = Arc::new(Mutex::new(user));
    let mut store = MockUserStore::new();

    let read = Arc::clone(&state);
    store.expect_find_by_username().returning(move |username| {
        let user = read.lock().expect("user state");
        Ok((user.username == username).then(|| user.clone()))
    });

    let write = Arc::clone(&state);
    store.expect_save_cart().returning(move |cart| {
        write.lock().expect("user state").cart = cart.clone();
        Ok(())
    });

    store
}
