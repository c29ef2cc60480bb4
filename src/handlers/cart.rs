use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::models::{Cart, Item, ModifyCartRequest, User};
use crate::store::{ItemStore, UserStore};

/// Largest quantity a single add or remove request may carry.
const MAX_QUANTITY: u32 = 1000;

/// Carts are embedded in the user document, which Mongo caps at 16 MB.
const MAX_CART_ENTRIES: usize = 10_000;

pub struct CartHandler {
    users: Arc<dyn UserStore>,
    items: Arc<dyn ItemStore>,
}

impl CartHandler {
    pub fn new(users: Arc<dyn UserStore>, items: Arc<dyn ItemStore>) -> Self {
        CartHandler { users, items }
    }

    pub async fn add_to_cart(&self, request: ModifyCartRequest) -> Result<Cart, ApiError> {
        let (user, item) = self.resolve(&request).await?;

        let mut cart = user.cart;
        if cart.items.len() + request.quantity as usize > MAX_CART_ENTRIES {
            log::warn!("cart of {} is full", user.username);
            return Err(ApiError::validation(format!(
                "a cart holds at most {MAX_CART_ENTRIES} items"
            )));
        }
        cart.add_item(&item, request.quantity);
        self.users.save_cart(&cart).await?;

        log::info!(
            "added {} x item {} to cart of {}, total {}",
            request.quantity,
            item.id,
            user.username,
            cart.total
        );
        Ok(cart)
    }

    pub async fn remove_from_cart(&self, request: ModifyCartRequest) -> Result<Cart, ApiError> {
        let (user, item) = self.resolve(&request).await?;

        let mut cart = user.cart;
        cart.remove_item(item.id, request.quantity);
        self.users.save_cart(&cart).await?;

        log::info!(
            "removed up to {} x item {} from cart of {}, total {}",
            request.quantity,
            item.id,
            user.username,
            cart.total
        );
        Ok(cart)
    }

    async fn resolve(&self, request: &ModifyCartRequest) -> Result<(User, Item), ApiError> {
        if !(1..=MAX_QUANTITY).contains(&request.quantity) {
            return Err(ApiError::validation(format!(
                "quantity must be between 1 and {MAX_QUANTITY}"
            )));
        }

        let user = self
            .users
            .find_by_username(&request.username)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("user {}", request.username)))?;
        let item = self
            .items
            .find_by_id(request.item_id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("item {}", request.item_id)))?;

        Ok((user, item))
    }
}

pub async fn add_to_cart(
    handler: web::Data<CartHandler>,
    request: web::Json<ModifyCartRequest>,
) -> Result<HttpResponse, ApiError> {
    let cart = handler.add_to_cart(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(cart))
}

pub async fn remove_from_cart(
    handler: web::Data<CartHandler>,
    request: web::Json<ModifyCartRequest>,
) -> Result<HttpResponse, ApiError> {
    let cart = handler.remove_from_cart(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(cart))
}
