use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::models::Item;
use crate::store::ItemStore;

/// Read-only access to the item catalogue.
pub struct ItemHandler {
    items: Arc<dyn ItemStore>,
}

impl ItemHandler {
    pub fn new(items: Arc<dyn ItemStore>) -> Self {
        ItemHandler { items }
    }

    pub async fn list(&self) -> Result<Vec<Item>, ApiError> {
        Ok(self.items.find_all().await?)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Item, ApiError> {
        self.items
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("item {id}")))
    }

    /// Names are not unique, so every match is returned.
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Item>, ApiError> {
        let items = self.items.find_by_name(name).await?;
        if items.is_empty() {
            return Err(ApiError::not_found(format!("item {name}")));
        }
        Ok(items)
    }
}

pub async fn list_items(handler: web::Data<ItemHandler>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(handler.list().await?))
}

pub async fn find_by_id(
    handler: web::Data<ItemHandler>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(handler.find_by_id(id.into_inner()).await?))
}

pub async fn find_by_name(
    handler: web::Data<ItemHandler>,
    name: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(handler.find_by_name(&name.into_inner()).await?))
}
