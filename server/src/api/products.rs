//! Product catalog endpoints (admin CRUD, public listing).

use crate::auth::RequireAdmin;
use crate::server::state::AppState;
use crate::store::{CatalogStore as _, ListFilter};
use crate::types::{Money, NotificationKind, Product, ProductId};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use fitsphere_web::AppError;
use serde::Deserialize;
use uuid::Uuid;

use super::MessageResponse;

/// Listing filters.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    /// Restrict to one category
    pub category: Option<String>,
    /// Case-insensitive name substring
    pub search: Option<String>,
    /// Rows to skip
    #[serde(default)]
    pub skip: i64,
    /// Maximum rows returned
    #[serde(default)]
    pub limit: i64,
}

/// New product body.
#[derive(Debug, Deserialize)]
pub struct ProductCreate {
    /// Product name
    pub name: String,
    /// Product description
    pub description: String,
    /// Unit price in rupees
    pub price: Money,
    /// Discount percentage
    #[serde(default)]
    pub discount: f64,
    /// Initial stock
    pub stock: i64,
    /// Category label
    pub category: String,
    /// Stock-keeping unit
    pub sku: String,
    /// Product image URLs
    #[serde(default)]
    pub image_urls: Vec<String>,
}

/// Partial product update; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct ProductUpdate {
    /// New name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New price
    pub price: Option<Money>,
    /// New discount percentage
    pub discount: Option<f64>,
    /// New stock level
    pub stock: Option<i64>,
    /// New category
    pub category: Option<String>,
    /// New SKU
    pub sku: Option<String>,
    /// New image URLs
    pub image_urls: Option<Vec<String>>,
    /// List or delist the product
    pub is_active: Option<bool>,
}

/// Create a product (admin).
pub async fn create_product(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<ProductCreate>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    if body.name.trim().is_empty() {
        return Err(AppError::bad_request("Product name is required"));
    }
    let now = Utc::now();
    let product = Product {
        id: ProductId::new(),
        name: body.name,
        description: body.description,
        price: body.price,
        discount: body.discount,
        stock: body.stock,
        category: body.category,
        sku: body.sku,
        image_urls: body.image_urls,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    state.stores().catalog.insert_product(&product).await?;

    if product.stock < 10 {
        state
            .engine
            .notify(
                NotificationKind::LowStock,
                format!(
                    "Low stock alert: {} has only {} items left",
                    product.name, product.stock
                ),
            )
            .await;
    }

    Ok((StatusCode::CREATED, Json(product)))
}

/// List products.
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = state
        .stores()
        .catalog
        .list_products(&ListFilter {
            category: query.category,
            search: query.search,
            skip: query.skip,
            limit: query.limit,
        })
        .await?;
    Ok(Json(products))
}

/// Fetch one product.
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, AppError> {
    let id = ProductId::from_uuid(id);
    let product = state
        .stores()
        .catalog
        .product(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Product", id))?;
    Ok(Json(product))
}

/// Update a product (admin).
pub async fn update_product(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<ProductUpdate>,
) -> Result<Json<Product>, AppError> {
    let id = ProductId::from_uuid(id);
    let mut product = state
        .stores()
        .catalog
        .product(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Product", id))?;

    if let Some(name) = update.name {
        product.name = name;
    }
    if let Some(description) = update.description {
        product.description = description;
    }
    if let Some(price) = update.price {
        product.price = price;
    }
    if let Some(discount) = update.discount {
        product.discount = discount;
    }
    if let Some(stock) = update.stock {
        product.stock = stock;
    }
    if let Some(category) = update.category {
        product.category = category;
    }
    if let Some(sku) = update.sku {
        product.sku = sku;
    }
    if let Some(image_urls) = update.image_urls {
        product.image_urls = image_urls;
    }
    if let Some(is_active) = update.is_active {
        product.is_active = is_active;
    }
    product.updated_at = Utc::now();

    state.stores().catalog.update_product(&product).await?;

    if product.stock < 10 {
        state
            .engine
            .notify(
                NotificationKind::LowStock,
                format!(
                    "Low stock alert: {} has only {} items left",
                    product.name, product.stock
                ),
            )
            .await;
    }

    Ok(Json(product))
}

/// Delete a product (admin).
pub async fn delete_product(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = ProductId::from_uuid(id);
    if !state.stores().catalog.delete_product(&id).await? {
        return Err(AppError::not_found("Product", id));
    }
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}
