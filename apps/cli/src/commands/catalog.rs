//! # Catalog Commands

use masa_core::Product;
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// A product as the shell lists it, with swatch indexes spelled out.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub price: String,
    pub category: String,
    pub colors: Vec<ColorItem>,
    pub sizes: Vec<SizeItem>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorItem {
    /// Value to pass as `--color`.
    pub index: usize,
    pub name: String,
    pub hex: String,
    pub out_of_stock: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeItem {
    pub number: String,
    pub dimensions: String,
    pub available: bool,
}

impl CatalogItem {
    fn new(id: &str, product: &Product) -> Self {
        CatalogItem {
            id: id.to_string(),
            name: product.name.clone(),
            price: product.price.clone(),
            category: product.category.clone(),
            colors: product
                .colors
                .iter()
                .enumerate()
                .map(|(index, c)| ColorItem {
                    index,
                    name: c.name.clone(),
                    hex: c.hex.clone(),
                    out_of_stock: c.out_of_stock,
                })
                .collect(),
            sizes: product
                .sizes
                .iter()
                .map(|s| SizeItem {
                    number: s.number.clone(),
                    dimensions: s.dimensions.clone(),
                    available: s.available,
                })
                .collect(),
        }
    }
}

/// Lists every product in catalog order.
pub fn list_products(state: &AppState) -> Vec<CatalogItem> {
    debug!("list_products command");
    state
        .catalog
        .iter()
        .map(|(id, product)| CatalogItem::new(id, product))
        .collect()
}

/// Gets one product.
pub fn get_product(state: &AppState, product_id: &str) -> Result<CatalogItem, ApiError> {
    debug!(product_id, "get_product command");
    state
        .catalog
        .get(product_id)
        .map(|product| CatalogItem::new(product_id, product))
        .ok_or_else(|| ApiError::not_found("Product", product_id))
}
