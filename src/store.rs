//! Persistence seams for the handlers.
//!
//! Handlers only ever see these traits; the MongoDB implementations live in
//! [`crate::db`] and tests substitute the generated mocks.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{Cart, Item, User, UserOrder};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record already exists")]
    Duplicate,

    #[error("no user {0} owns this cart")]
    MissingOwner(i64),

    #[error("failed to generate sequence value for {0}")]
    Sequence(&'static str),

    #[error("failed to encode document")]
    Encode(#[from] mongodb::bson::ser::Error),

    #[error("database error")]
    Database(#[from] mongodb::error::Error),
}

/// A user about to be persisted. The store assigns ids for both the user and
/// its cart.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub user_id: i64,
    pub items: Vec<Item>,
    pub total: Decimal,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists the user together with a fresh empty cart.
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Replaces the stored cart of `cart.user_id`.
    async fn save_cart(&self, cart: &Cart) -> Result<(), StoreError>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Item>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Item>, StoreError>;

    async fn find_by_name(&self, name: &str) -> Result<Vec<Item>, StoreError>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn create(&self, order: NewOrder) -> Result<UserOrder, StoreError>;

    async fn find_by_user(&self, user_id: i64) -> Result<Vec<UserOrder>, StoreError>;
}
