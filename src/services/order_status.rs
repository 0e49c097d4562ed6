use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entities::{order, order_status_history},
    errors::ServiceError,
    events::{Event, EventSender},
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateOrderStatusRequest {
    pub status: order::OrderStatus,
    #[serde(default)]
    pub changed_by: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Drives the order-status state machine.
///
/// The admin workflow allows free reassignment between the five states
/// (any → any). The service's job is the side effects: stamping or clearing
/// `cancelled_at`/`delivered_at` so each is set exactly when the order is in
/// the matching state, and appending one audit row per transition.
#[derive(Clone)]
pub struct OrderStatusService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl OrderStatusService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Moves an order to `new_status`. Fails with NotFound for unknown ids;
    /// any target state is accepted.
    #[instrument(skip(self, request), fields(order_id = %order_id, new_status = %request.status))]
    pub async fn update_status(
        &self,
        order_id: Uuid,
        request: UpdateOrderStatusRequest,
    ) -> Result<order::Model, ServiceError> {
        let new_status = request.status;
        let now = Utc::now();

        let txn = self.db.begin().await?;

        let existing = order::Entity::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        let old_status_raw = existing.order_status.clone();

        let mut active: order::ActiveModel = existing.into();
        active.order_status = Set(new_status.as_str().to_string());
        active.updated_at = Set(now);
        // Terminal timestamps mirror the current state exactly: stamped on
        // entry, cleared when the order leaves the state again.
        active.cancelled_at = Set(matches!(new_status, order::OrderStatus::Cancelled).then_some(now));
        active.delivered_at = Set(matches!(new_status, order::OrderStatus::Delivered).then_some(now));

        let updated = active.update(&txn).await?;

        order_status_history::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            old_status: Set(Some(old_status_raw.clone())),
            new_status: Set(new_status.as_str().to_string()),
            changed_at: Set(now),
            changed_by: Set(request.changed_by),
            notes: Set(request.notes),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(
            order_id = %order_id,
            old_status = %old_status_raw,
            new_status = %new_status,
            "Order status updated"
        );

        self.event_sender
            .send_or_log(Event::OrderStatusChanged {
                order_id,
                old_status: old_status_raw,
                new_status: new_status.as_str().to_string(),
            })
            .await;

        Ok(updated)
    }

    /// Current status of an order, parsed into the typed enum.
    #[instrument(skip(self))]
    pub async fn get_status(&self, order_id: Uuid) -> Result<order::OrderStatus, ServiceError> {
        let existing = order::Entity::find_by_id(order_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        order::OrderStatus::from_str(&existing.order_status).map_err(|_| {
            ServiceError::InvalidStatus(format!(
                "Order {} carries unknown status '{}'",
                order_id, existing.order_status
            ))
        })
    }
}
