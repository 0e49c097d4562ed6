use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entities::{order, order_status_history, product_variant},
    errors::ServiceError,
    events::{Event, EventSender},
};

const ORDER_NUMBER_ATTEMPTS: usize = 5;
const ORDER_NUMBER_SUFFIX_LEN: usize = 4;
const ORDER_NUMBER_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// A validated, server-priced order draft ready for persistence.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_name: String,
    pub phone_number: String,
    pub delivery_address: String,
    pub product_variant_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub customer_notes: Option<String>,
}

/// Admin-side filter for the order list and the CSV export.
#[derive(Debug, Clone, Default)]
pub struct OrderListFilter {
    pub status: Option<order::OrderStatus>,
    pub search: Option<String>,
}

/// One page of orders, each joined with its product variant.
#[derive(Debug)]
pub struct OrderListPage {
    pub orders: Vec<(order::Model, Option<product_variant::Model>)>,
    pub total: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateOrderNotesRequest {
    /// Admin notes
    pub notes: Option<String>,
    pub customer_notes: Option<String>,
}

/// Service for the persisted order collection.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl OrderService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Persists a new order in `Pending` state, together with the opening
    /// status-history row. The price fields are taken from the draft verbatim
    /// and never touched again.
    #[instrument(skip(self, draft), fields(variant_id = %draft.product_variant_id, quantity = draft.quantity))]
    pub async fn create_order(&self, draft: NewOrder) -> Result<order::Model, ServiceError> {
        let now = Utc::now();
        let order_id = Uuid::new_v4();
        let order_number = self.generate_order_number().await?;
        let initial_status = order::OrderStatus::Pending;

        let txn = self.db.begin().await?;

        let order_model = order::ActiveModel {
            id: Set(order_id),
            order_number: Set(order_number.clone()),
            customer_name: Set(draft.customer_name),
            phone_number: Set(draft.phone_number),
            delivery_address: Set(draft.delivery_address),
            product_variant_id: Set(draft.product_variant_id),
            quantity: Set(draft.quantity),
            unit_price: Set(draft.unit_price),
            total_price: Set(draft.total_price),
            order_status: Set(initial_status.as_str().to_string()),
            payment_method: Set("Cash on Delivery".to_string()),
            customer_notes: Set(draft.customer_notes),
            notes: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            cancelled_at: Set(None),
            delivered_at: Set(None),
        }
        .insert(&txn)
        .await?;

        order_status_history::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            old_status: Set(None),
            new_status: Set(initial_status.as_str().to_string()),
            changed_at: Set(now),
            changed_by: Set(None),
            notes: Set(None),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(order_id = %order_id, order_number = %order_number, "Order created");
        Ok(order_model)
    }

    #[instrument(skip(self))]
    pub async fn get_order(&self, order_id: Uuid) -> Result<order::Model, ServiceError> {
        order::Entity::find_by_id(order_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))
    }

    #[instrument(skip(self))]
    pub async fn get_order_by_number(
        &self,
        order_number: &str,
    ) -> Result<order::Model, ServiceError> {
        order::Entity::find()
            .filter(order::Column::OrderNumber.eq(order_number))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_number)))
    }

    /// Lists orders newest first. The status filter runs in SQL; the
    /// free-text search is applied in-process over the filtered set, matching
    /// case-insensitively against customer name, phone and order number.
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        filter: &OrderListFilter,
        page: u64,
        limit: u64,
    ) -> Result<OrderListPage, ServiceError> {
        let rows = self.fetch_filtered(filter).await?;
        let total = rows.len() as u64;

        let page = page.max(1);
        let limit = limit.max(1);
        let offset = ((page - 1) * limit) as usize;
        let orders = rows.into_iter().skip(offset).take(limit as usize).collect();

        Ok(OrderListPage { orders, total })
    }

    /// Updates admin/customer notes on an order.
    #[instrument(skip(self, request))]
    pub async fn update_notes(
        &self,
        order_id: Uuid,
        request: UpdateOrderNotesRequest,
    ) -> Result<order::Model, ServiceError> {
        let existing = self.get_order(order_id).await?;
        let mut active: order::ActiveModel = existing.into();

        if let Some(notes) = request.notes {
            active.notes = Set(Some(notes));
        }
        if let Some(customer_notes) = request.customer_notes {
            active.customer_notes = Set(Some(customer_notes));
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::OrderUpdated(order_id))
            .await;
        Ok(updated)
    }

    /// Hard-deletes an order and its status history. Irreversible.
    #[instrument(skip(self))]
    pub async fn delete_order(&self, order_id: Uuid) -> Result<(), ServiceError> {
        let existing = self.get_order(order_id).await?;

        let txn = self.db.begin().await?;

        // The FK cascades on backends that enforce it; the explicit delete
        // keeps SQLite deployments without foreign_keys pragma correct too.
        order_status_history::Entity::delete_many()
            .filter(order_status_history::Column::OrderId.eq(order_id))
            .exec(&txn)
            .await?;

        order::Entity::delete_by_id(existing.id).exec(&txn).await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::OrderDeleted(order_id))
            .await;
        info!(order_id = %order_id, "Order deleted");
        Ok(())
    }

    /// The transition audit trail for one order, oldest first.
    #[instrument(skip(self))]
    pub async fn status_history(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<order_status_history::Model>, ServiceError> {
        // Surface a 404 for unknown orders rather than an empty trail.
        self.get_order(order_id).await?;

        order_status_history::Entity::find()
            .filter(order_status_history::Column::OrderId.eq(order_id))
            .order_by_asc(order_status_history::Column::ChangedAt)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// Serializes the currently filtered order list to CSV, one row per
    /// order, all matching rows (no pagination).
    #[instrument(skip(self))]
    pub async fn export_csv(&self, filter: &OrderListFilter) -> Result<String, ServiceError> {
        let rows = self.fetch_filtered(filter).await?;
        Ok(render_orders_csv(&rows))
    }

    async fn fetch_filtered(
        &self,
        filter: &OrderListFilter,
    ) -> Result<Vec<(order::Model, Option<product_variant::Model>)>, ServiceError> {
        let mut query = order::Entity::find()
            .find_also_related(product_variant::Entity)
            .order_by_desc(order::Column::CreatedAt);

        if let Some(status) = filter.status {
            query = query.filter(order::Column::OrderStatus.eq(status.as_str()));
        }

        let mut rows = query.all(&*self.db).await?;

        if let Some(search) = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            rows.retain(|(order, _)| search_matches(order, search));
        }

        Ok(rows)
    }

    /// Generates a human-readable order number, re-checking uniqueness
    /// against the store with a bounded retry.
    async fn generate_order_number(&self) -> Result<String, ServiceError> {
        for attempt in 0..ORDER_NUMBER_ATTEMPTS {
            let candidate = new_order_number_candidate();

            let taken = order::Entity::find()
                .filter(order::Column::OrderNumber.eq(candidate.as_str()))
                .count(&*self.db)
                .await?;

            if taken == 0 {
                return Ok(candidate);
            }
            warn!(candidate = %candidate, attempt = attempt, "Order number collision, retrying");
        }

        Err(ServiceError::InternalError(
            "Could not allocate a unique order number".to_string(),
        ))
    }
}

/// Case-insensitive substring match over customer name, phone number and
/// order number.
pub fn search_matches(order: &order::Model, search: &str) -> bool {
    let needle = search.to_lowercase();
    order.customer_name.to_lowercase().contains(&needle)
        || order.phone_number.to_lowercase().contains(&needle)
        || order.order_number.to_lowercase().contains(&needle)
}

fn new_order_number_candidate() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ORDER_NUMBER_SUFFIX_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..ORDER_NUMBER_CHARSET.len());
            ORDER_NUMBER_CHARSET[idx] as char
        })
        .collect();
    format!("ORD-{}-{}", Utc::now().format("%Y%m%d"), suffix)
}

/// Renders the order list as CSV with a fixed column order. Commas inside
/// free-text fields are replaced with semicolons to preserve row integrity.
pub fn render_orders_csv(rows: &[(order::Model, Option<product_variant::Model>)]) -> String {
    let mut csv = String::from(
        "Order Number,Customer Name,Phone,Address,Product,Quantity,Total,Status,Date\n",
    );

    for (order, variant) in rows {
        let product = variant
            .as_ref()
            .map(|v| v.variant_name.as_str())
            .unwrap_or("");
        let line = [
            sanitize_csv_field(&order.order_number),
            sanitize_csv_field(&order.customer_name),
            sanitize_csv_field(&order.phone_number),
            sanitize_csv_field(&order.delivery_address),
            sanitize_csv_field(product),
            order.quantity.to_string(),
            order.total_price.to_string(),
            order.order_status.clone(),
            order.created_at.format("%Y-%m-%d %H:%M").to_string(),
        ]
        .join(",");
        csv.push_str(&line);
        csv.push('\n');
    }

    csv
}

fn sanitize_csv_field(value: &str) -> String {
    value.replace(',', ";").replace(['\r', '\n'], " ")
}
