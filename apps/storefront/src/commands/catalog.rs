//! # Catalog Commands

use mildar_core::{Catalog, Product};
use tracing::debug;

use crate::error::ApiError;

/// Lists the product cards in display order.
pub fn list_products(catalog: &Catalog) -> Vec<Product> {
    debug!("list_products command");
    catalog.iter().cloned().collect()
}

/// Gets one product card.
pub fn get_product(catalog: &Catalog, product_id: &str) -> Result<Product, ApiError> {
    debug!(%product_id, "get_product command");
    Ok(catalog.require(product_id)?.clone())
}
