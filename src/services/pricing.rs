use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    entities::product_variant, errors::ServiceError, services::catalog::ProductCatalogService,
};

/// Server-side price quote for a package selection. `total_price` is fixed
/// here, at submission time, and written to the order as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotedPrice {
    pub variant: product_variant::Model,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

/// Resolves a package/variant identifier plus quantity to catalog prices.
/// Client-supplied prices are never consulted.
#[derive(Clone)]
pub struct PricingService {
    catalog: Arc<ProductCatalogService>,
}

impl PricingService {
    pub fn new(catalog: Arc<ProductCatalogService>) -> Self {
        Self { catalog }
    }

    /// Quotes `identifier` (weight/size code or variant UUID) at `quantity`
    /// units. Unknown or inactive variants fail closed.
    #[instrument(skip(self))]
    pub async fn resolve(
        &self,
        identifier: &str,
        quantity: i32,
    ) -> Result<QuotedPrice, ServiceError> {
        if quantity < 1 {
            return Err(ServiceError::ValidationError(
                "Quantity must be a positive integer".to_string(),
            ));
        }

        let variant = self
            .catalog
            .find_active_by_identifier(identifier)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Product variant '{}' not found or inactive",
                    identifier
                ))
            })?;

        let unit_price = variant.price;
        let total_price = total_price(unit_price, quantity);

        Ok(QuotedPrice {
            variant,
            unit_price,
            total_price,
        })
    }
}

/// total = unit price × quantity, in exact decimal arithmetic.
pub fn total_price(unit_price: Decimal, quantity: i32) -> Decimal {
    unit_price * Decimal::from(quantity)
}
