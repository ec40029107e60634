//! # Product Commands
//!
//! Catalog search, CRUD, and stock operations.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::DbState;
use ferro_core::validation::{
    validate_article_number, validate_name, validate_price_cents, validate_search_query,
    validate_stock,
};
use ferro_core::{CoreError, Product, DEFAULT_MIN_STOCK};

/// Product DTO for shell display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub article_number: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price_cents: i64,
    pub stock: i64,
    pub min_stock: i64,
    pub needs_restock: bool,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        let needs_restock = p.needs_restock();
        ProductDto {
            id: p.id,
            article_number: p.article_number,
            name: p.name,
            description: p.description,
            category: p.category,
            price_cents: p.price_cents,
            stock: p.stock,
            min_stock: p.min_stock,
            needs_restock,
        }
    }
}

/// Input for registering a new catalog product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub article_number: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price_cents: i64,
    pub stock: i64,
}

/// Searches the catalog by name, article number, or category.
///
/// An empty query lists the active catalog.
pub async fn search_products(
    db: &DbState,
    query: &str,
    limit: Option<u32>,
) -> Result<Vec<ProductDto>, AppError> {
    let limit = limit.unwrap_or(20).min(100);
    let query = validate_search_query(query).map_err(CoreError::from)?;

    debug!(query = %query, limit = %limit, "search_products command");

    let products = db.inner().products().search(&query, limit).await?;
    Ok(products.into_iter().map(ProductDto::from).collect())
}

/// Looks up a single product by its article number.
pub async fn get_product(db: &DbState, article: &str) -> Result<ProductDto, AppError> {
    debug!(article = %article, "get_product command");

    let product = db
        .inner()
        .products()
        .get_by_article_number(article)
        .await?
        .ok_or_else(|| AppError::not_found("Product", article))?;

    Ok(ProductDto::from(product))
}

/// Registers a new catalog product after validating the input.
pub async fn add_product(db: &DbState, input: NewProduct) -> Result<ProductDto, AppError> {
    debug!(article = %input.article_number, "add_product command");

    validate_article_number(&input.article_number).map_err(CoreError::from)?;
    validate_name(&input.name).map_err(CoreError::from)?;
    validate_price_cents(input.price_cents).map_err(CoreError::from)?;
    validate_stock(input.stock).map_err(CoreError::from)?;

    let now = Utc::now();
    let product = Product {
        id: Uuid::new_v4().to_string(),
        article_number: input.article_number.trim().to_string(),
        name: input.name.trim().to_string(),
        description: input.description,
        category: input.category.trim().to_string(),
        price_cents: input.price_cents,
        stock: input.stock,
        min_stock: DEFAULT_MIN_STOCK,
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    db.inner().products().insert(&product).await?;

    info!(article = %product.article_number, "Product registered");
    Ok(ProductDto::from(product))
}

/// Changes the price of a product.
///
/// Open cart lines keep the price they were added with; only future adds
/// see the new price.
pub async fn set_price(
    db: &DbState,
    article: &str,
    price_cents: i64,
) -> Result<ProductDto, AppError> {
    debug!(article = %article, price_cents = %price_cents, "set_price command");

    validate_price_cents(price_cents).map_err(CoreError::from)?;

    let mut product = db
        .inner()
        .products()
        .get_by_article_number(article)
        .await?
        .ok_or_else(|| AppError::not_found("Product", article))?;

    product.price_cents = price_cents;
    db.inner().products().update(&product).await?;

    info!(article = %article, price_cents = %price_cents, "Price updated");
    Ok(ProductDto::from(product))
}

/// Adds stock to a product (goods received).
pub async fn restock(db: &DbState, article: &str, quantity: i64) -> Result<ProductDto, AppError> {
    debug!(article = %article, quantity = %quantity, "restock command");

    if quantity <= 0 {
        return Err(AppError::validation("Restock quantity must be positive"));
    }

    let product = db
        .inner()
        .products()
        .get_by_article_number(article)
        .await?
        .ok_or_else(|| AppError::not_found("Product", article))?;

    db.inner().products().adjust_stock(&product.id, quantity).await?;

    let refreshed = db
        .inner()
        .products()
        .get_by_id(&product.id)
        .await?
        .ok_or_else(|| AppError::not_found("Product", article))?;

    info!(article = %article, stock = %refreshed.stock, "Stock received");
    Ok(ProductDto::from(refreshed))
}

/// Removes a product from the active catalog (soft delete).
pub async fn remove_product(db: &DbState, article: &str) -> Result<(), AppError> {
    debug!(article = %article, "remove_product command");

    let product = db
        .inner()
        .products()
        .get_by_article_number(article)
        .await?
        .ok_or_else(|| AppError::not_found("Product", article))?;

    db.inner().products().soft_delete(&product.id).await?;

    info!(article = %article, "Product removed from catalog");
    Ok(())
}

/// Lists active products whose stock is below their minimum.
pub async fn restock_alerts(db: &DbState) -> Result<Vec<ProductDto>, AppError> {
    debug!("restock_alerts command");

    let products = db.inner().products().restock_alerts().await?;
    Ok(products.into_iter().map(ProductDto::from).collect())
}
