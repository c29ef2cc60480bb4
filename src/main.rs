use std::io;
use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};

mod auth;
mod config;
mod db;
mod error;
mod handlers;
mod hasher;
mod middleware;
mod models;
mod store;
#[cfg(test)]
mod test_helpers;

use crate::auth::TokenIssuer;
use crate::config::Config;
use crate::handlers::{CartHandler, ItemHandler, OrderHandler, UserHandler};
use crate::hasher::Argon2Hasher;
use crate::store::{ItemStore, OrderStore, UserStore};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(io::Error::other)?;

    let database = db::connect(&config).await.map_err(io::Error::other)?;
    db::ensure_indexes(&database)
        .await
        .map_err(io::Error::other)?;
    if config.seed_items {
        let seeded = db::seed_items(&database).await.map_err(io::Error::other)?;
        if seeded > 0 {
            log::info!("seeded {seeded} catalogue items");
        }
    }

    let users: Arc<dyn UserStore> = Arc::new(db::MongoUserStore::new(&database));
    let items: Arc<dyn ItemStore> = Arc::new(db::MongoItemStore::new(&database));
    let orders: Arc<dyn OrderStore> = Arc::new(db::MongoOrderStore::new(&database));
    let tokens = TokenIssuer::new(config.jwt_secret.clone(), config.jwt_ttl_hours);

    let user_handler = web::Data::new(UserHandler::new(
        users.clone(),
        Arc::new(Argon2Hasher),
        tokens.clone(),
    ));
    let cart_handler = web::Data::new(CartHandler::new(users.clone(), items.clone()));
    let item_handler = web::Data::new(ItemHandler::new(items));
    let order_handler = web::Data::new(OrderHandler::new(users, orders));

    log::info!("listening on {}", config.bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(user_handler.clone())
            .app_data(cart_handler.clone())
            .app_data(item_handler.clone())
            .app_data(order_handler.clone())
            .configure(handlers::configure(tokens.clone()))
    })
    .bind(config.bind_address.as_str())?
    .run()
    .await
}
