//! MongoDB-backed stores.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, to_bson};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{
    ClientOptions, FindOneAndUpdateOptions, IndexOptions, ReturnDocument,
};
use mongodb::{Client, Collection, Database, IndexModel};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::models::{Cart, Item, User, UserOrder};
use crate::store::{ItemStore, NewOrder, NewUser, OrderStore, StoreError, UserStore};

const USERS: &str = "users";
const ITEMS: &str = "items";
const ORDERS: &str = "orders";
const COUNTERS: &str = "counters";

const DUPLICATE_KEY: i32 = 11000;

pub async fn connect(config: &Config) -> Result<Database, StoreError> {
    let options = ClientOptions::parse(&config.database_url).await?;
    let client = Client::with_options(options)?;

    Ok(client.database(&config.database_name))
}

pub async fn ensure_indexes(db: &Database) -> Result<(), StoreError> {
    let username = IndexModel::builder()
        .keys(doc! { "username": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build();
    db.collection::<UserDocument>(USERS)
        .create_index(username, None)
        .await?;

    let order_owner = IndexModel::builder().keys(doc! { "user_id": 1 }).build();
    db.collection::<OrderDocument>(ORDERS)
        .create_index(order_owner, None)
        .await?;

    Ok(())
}

/// Inserts the default catalogue into an empty `items` collection.
/// Returns how many items were written.
pub async fn seed_items(db: &Database) -> Result<usize, StoreError> {
    let items = db.collection::<ItemDocument>(ITEMS);
    if items.count_documents(None, None).await? > 0 {
        return Ok(0);
    }

    let counters = db.collection::<Counter>(COUNTERS);
    let mut catalogue = Vec::new();
    for (name, price, description) in [
        ("Round Widget", Decimal::new(299, 2), "A widget that is round"),
        ("Square Widget", Decimal::new(199, 2), "A widget that is square"),
    ] {
        catalogue.push(ItemDocument {
            id: next_id(&counters, ITEMS).await?,
            name: name.to_string(),
            price,
            description: description.to_string(),
        });
    }

    let result = items.insert_many(&catalogue, None).await?;
    Ok(result.inserted_ids.len())
}

#[derive(Serialize, Deserialize, Debug)]
struct Counter {
    #[serde(rename = "_id")]
    id: String,
    seq: i64,
}

async fn next_id(counters: &Collection<Counter>, sequence: &'static str) -> Result<i64, StoreError> {
    let options = FindOneAndUpdateOptions::builder()
        .upsert(true)
        .return_document(ReturnDocument::After)
        .build();

    counters
        .find_one_and_update(doc! { "_id": sequence }, doc! { "$inc": { "seq": 1_i64 } }, options)
        .await?
        .map(|counter| counter.seq)
        .ok_or(StoreError::Sequence(sequence))
}

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY
    )
}

fn require_owner(matched: u64, user_id: i64) -> Result<(), StoreError> {
    if matched == 0 {
        return Err(StoreError::MissingOwner(user_id));
    }
    Ok(())
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct UserDocument {
    #[serde(rename = "_id")]
    id: i64,
    username: String,
    password: String,
    cart: Cart,
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        User {
            id: doc.id,
            username: doc.username,
            password: doc.password,
            cart: doc.cart,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct ItemDocument {
    #[serde(rename = "_id")]
    id: i64,
    name: String,
    price: Decimal,
    description: String,
}

impl From<ItemDocument> for Item {
    fn from(doc: ItemDocument) -> Self {
        Item {
            id: doc.id,
            name: doc.name,
            price: doc.price,
            description: doc.description,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct OrderDocument {
    #[serde(rename = "_id")]
    id: i64,
    user_id: i64,
    items: Vec<Item>,
    total: Decimal,
}

impl From<OrderDocument> for UserOrder {
    fn from(doc: OrderDocument) -> Self {
        UserOrder {
            id: doc.id,
            user_id: doc.user_id,
            items: doc.items,
            total: doc.total,
        }
    }
}

/// Users with their cart embedded in the same document.
#[derive(Clone, Debug)]
pub struct MongoUserStore {
    users: Collection<UserDocument>,
    counters: Collection<Counter>,
}

impl MongoUserStore {
    pub fn new(db: &Database) -> Self {
        MongoUserStore {
            users: db.collection(USERS),
            counters: db.collection(COUNTERS),
        }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let id = next_id(&self.counters, USERS).await?;
        let cart_id = next_id(&self.counters, "carts").await?;

        let document = UserDocument {
            id,
            username: user.username,
            password: user.password_hash,
            cart: Cart::new(cart_id, id),
        };

        match self.users.insert_one(&document, None).await {
            Ok(_) => Ok(document.into()),
            Err(e) if is_duplicate_key(&e) => Err(StoreError::Duplicate),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let found = self.users.find_one(doc! { "_id": id }, None).await?;
        Ok(found.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let found = self
            .users
            .find_one(doc! { "username": username }, None)
            .await?;
        Ok(found.map(User::from))
    }

    async fn save_cart(&self, cart: &Cart) -> Result<(), StoreError> {
        let update = doc! { "$set": { "cart": to_bson(cart)? } };
        let result = self
            .users
            .update_one(doc! { "_id": cart.user_id }, update, None)
            .await?;

        require_owner(result.matched_count, cart.user_id)
    }
}

#[derive(Clone, Debug)]
pub struct MongoItemStore {
    items: Collection<ItemDocument>,
}

impl MongoItemStore {
    pub fn new(db: &Database) -> Self {
        MongoItemStore {
            items: db.collection(ITEMS),
        }
    }
}

#[async_trait]
impl ItemStore for MongoItemStore {
    async fn find_all(&self) -> Result<Vec<Item>, StoreError> {
        let cursor = self.items.find(None, None).await?;
        let documents: Vec<ItemDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(Item::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Item>, StoreError> {
        let found = self.items.find_one(doc! { "_id": id }, None).await?;
        Ok(found.map(Item::from))
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Item>, StoreError> {
        let cursor = self.items.find(doc! { "name": name }, None).await?;
        let documents: Vec<ItemDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(Item::from).collect())
    }
}

#[derive(Clone, Debug)]
pub struct MongoOrderStore {
    orders: Collection<OrderDocument>,
    counters: Collection<Counter>,
}

impl MongoOrderStore {
    pub fn new(db: &Database) -> Self {
        MongoOrderStore {
            orders: db.collection(ORDERS),
            counters: db.collection(COUNTERS),
        }
    }
}

#[async_trait]
impl OrderStore for MongoOrderStore {
    async fn create(&self, order: NewOrder) -> Result<UserOrder, StoreError> {
        let document = OrderDocument {
            id: next_id(&self.counters, ORDERS).await?,
            user_id: order.user_id,
            items: order.items,
            total: order.total,
        };

        self.orders.insert_one(&document, None).await?;
        Ok(document.into())
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Vec<UserOrder>, StoreError> {
        let cursor = self.orders.find(doc! { "user_id": user_id }, None).await?;
        let documents: Vec<OrderDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(UserOrder::from).collect())
    }
}
