use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::models::{User, UserOrder};
use crate::store::{NewOrder, OrderStore, UserStore};

pub struct OrderHandler {
    users: Arc<dyn UserStore>,
    orders: Arc<dyn OrderStore>,
}

impl OrderHandler {
    pub fn new(users: Arc<dyn UserStore>, orders: Arc<dyn OrderStore>) -> Self {
        OrderHandler { users, orders }
    }

    /// Records the user's current cart as an order. The cart itself is kept.
    pub async fn submit(&self, username: &str) -> Result<UserOrder, ApiError> {
        let user = self.user(username).await?;

        let order = self
            .orders
            .create(NewOrder {
                user_id: user.id,
                items: user.cart.items,
                total: user.cart.total,
            })
            .await?;

        log::info!(
            "order {} submitted for {} with total {}",
            order.id,
            user.username,
            order.total
        );
        Ok(order)
    }

    pub async fn history(&self, username: &str) -> Result<Vec<UserOrder>, ApiError> {
        let user = self.user(username).await?;
        Ok(self.orders.find_by_user(user.id).await?)
    }

    async fn user(&self, username: &str) -> Result<User, ApiError> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("user {username}")))
    }
}

pub async fn submit(
    handler: web::Data<OrderHandler>,
    username: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(handler.submit(&username.into_inner()).await?))
}

pub async fn history(
    handler: web::Data<OrderHandler>,
    username: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(handler.history(&username.into_inner()).await?))
}
