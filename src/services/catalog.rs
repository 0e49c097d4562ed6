use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{order, product_variant},
    errors::ServiceError,
    events::{Event, EventSender},
};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateVariantInput {
    #[validate(length(min = 1, message = "Variant name is required"))]
    pub variant_name: String,
    #[validate(length(min = 1, message = "Weight/size code is required"))]
    pub weight_size: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub original_price: Option<Decimal>,
    #[validate(range(min = 0, message = "Stock quantity cannot be negative"))]
    #[serde(default)]
    pub stock_quantity: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub display_order: i32,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateVariantInput {
    pub variant_name: Option<String>,
    pub weight_size: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub original_price: Option<Decimal>,
    #[validate(range(min = 0, message = "Stock quantity cannot be negative"))]
    pub stock_quantity: Option<i32>,
    pub is_active: Option<bool>,
    pub badge: Option<String>,
    pub image_url: Option<String>,
    pub display_order: Option<i32>,
}

/// Catalog store for product variants. Plain CRUD; the only business rule is
/// that a variant referenced by existing orders cannot be deleted.
#[derive(Clone)]
pub struct ProductCatalogService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl ProductCatalogService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Active variants in display order, as shown on the landing page.
    #[instrument(skip(self))]
    pub async fn list_active(&self) -> Result<Vec<product_variant::Model>, ServiceError> {
        product_variant::Entity::find()
            .filter(product_variant::Column::IsActive.eq(true))
            .order_by_asc(product_variant::Column::DisplayOrder)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// All variants, active or not, for the admin screen.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<product_variant::Model>, ServiceError> {
        product_variant::Entity::find()
            .order_by_asc(product_variant::Column::DisplayOrder)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    #[instrument(skip(self))]
    pub async fn get_variant(
        &self,
        variant_id: Uuid,
    ) -> Result<product_variant::Model, ServiceError> {
        product_variant::Entity::find_by_id(variant_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Product variant {} not found", variant_id))
            })
    }

    /// Looks up an active variant by weight/size code or UUID.
    #[instrument(skip(self))]
    pub async fn find_active_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<product_variant::Model>, ServiceError> {
        let mut query =
            product_variant::Entity::find().filter(product_variant::Column::IsActive.eq(true));

        query = if let Ok(uuid) = Uuid::parse_str(identifier) {
            query.filter(product_variant::Column::Id.eq(uuid))
        } else {
            query.filter(product_variant::Column::WeightSize.eq(identifier))
        };

        query.one(&*self.db).await.map_err(Into::into)
    }

    /// The identifiers a checkout submission may reference: each active
    /// variant's weight/size code plus its UUID.
    pub async fn offered_package_identifiers(&self) -> Result<Vec<String>, ServiceError> {
        let variants = self.list_active().await?;
        let mut identifiers = Vec::with_capacity(variants.len() * 2);
        for variant in &variants {
            identifiers.push(variant.weight_size.clone());
            identifiers.push(variant.id.to_string());
        }
        Ok(identifiers)
    }

    #[instrument(skip(self, input), fields(variant_name = %input.variant_name))]
    pub async fn create_variant(
        &self,
        input: CreateVariantInput,
    ) -> Result<product_variant::Model, ServiceError> {
        input.validate()?;

        let now = Utc::now();
        let variant_id = Uuid::new_v4();

        let variant = product_variant::ActiveModel {
            id: Set(variant_id),
            variant_name: Set(input.variant_name),
            weight_size: Set(input.weight_size),
            description: Set(input.description),
            price: Set(input.price),
            original_price: Set(input.original_price),
            stock_quantity: Set(input.stock_quantity),
            is_active: Set(input.is_active),
            badge: Set(input.badge),
            image_url: Set(input.image_url),
            display_order: Set(input.display_order),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let variant = variant.insert(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::VariantCreated(variant_id))
            .await;
        info!(variant_id = %variant_id, "Product variant created");
        Ok(variant)
    }

    #[instrument(skip(self, input))]
    pub async fn update_variant(
        &self,
        variant_id: Uuid,
        input: UpdateVariantInput,
    ) -> Result<product_variant::Model, ServiceError> {
        input.validate()?;

        let variant = self.get_variant(variant_id).await?;
        let mut active: product_variant::ActiveModel = variant.into();

        if let Some(variant_name) = input.variant_name {
            active.variant_name = Set(variant_name);
        }
        if let Some(weight_size) = input.weight_size {
            active.weight_size = Set(weight_size);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(price) = input.price {
            active.price = Set(price);
        }
        if let Some(original_price) = input.original_price {
            active.original_price = Set(Some(original_price));
        }
        if let Some(stock_quantity) = input.stock_quantity {
            active.stock_quantity = Set(stock_quantity);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(badge) = input.badge {
            active.badge = Set(Some(badge));
        }
        if let Some(image_url) = input.image_url {
            active.image_url = Set(Some(image_url));
        }
        if let Some(display_order) = input.display_order {
            active.display_order = Set(display_order);
        }
        active.updated_at = Set(Utc::now());

        let variant = active.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::VariantUpdated(variant_id))
            .await;
        info!(variant_id = %variant_id, "Product variant updated");
        Ok(variant)
    }

    /// Deletes a variant. Blocked with a Conflict while any order still
    /// references it, so order rows never dangle.
    #[instrument(skip(self))]
    pub async fn delete_variant(&self, variant_id: Uuid) -> Result<(), ServiceError> {
        let variant = self.get_variant(variant_id).await?;

        let referencing_orders = order::Entity::find()
            .filter(order::Column::ProductVariantId.eq(variant_id))
            .count(&*self.db)
            .await?;

        if referencing_orders > 0 {
            return Err(ServiceError::Conflict(format!(
                "Product variant {} is referenced by {} order(s) and cannot be deleted",
                variant_id, referencing_orders
            )));
        }

        variant.delete(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::VariantDeleted(variant_id))
            .await;
        info!(variant_id = %variant_id, "Product variant deleted");
        Ok(())
    }

    /// Active variants whose stock has fallen below `threshold`, lowest
    /// stock first.
    #[instrument(skip(self))]
    pub async fn low_stock(
        &self,
        threshold: i32,
    ) -> Result<Vec<product_variant::Model>, ServiceError> {
        product_variant::Entity::find()
            .filter(product_variant::Column::IsActive.eq(true))
            .filter(product_variant::Column::StockQuantity.lt(threshold))
            .order_by_asc(product_variant::Column::StockQuantity)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }
}
