use std::sync::Arc;

use chrono::{DateTime, Datelike, Local, LocalResult, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use crate::{
    entities::{order, product_variant},
    errors::ServiceError,
    services::{catalog::ProductCatalogService, settings::SiteSettingsService},
};

/// Aggregate dashboard metrics. Derived on every request from current store
/// state; nothing here is cached or written back.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub total_orders: u64,
    pub pending_orders: u64,
    pub today_orders: u64,
    pub month_orders: u64,
    pub total_revenue: Decimal,
    pub today_revenue: Decimal,
    pub low_stock_threshold: i32,
    pub low_stock: Vec<product_variant::Model>,
}

/// Order-derived counters, separated from the service so the arithmetic is
/// testable without a database.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct OrderTotals {
    pub total_orders: u64,
    pub pending_orders: u64,
    pub today_orders: u64,
    pub month_orders: u64,
    pub total_revenue: Decimal,
    pub today_revenue: Decimal,
}

/// Folds the order set into dashboard counters.
///
/// Revenue sums `total_price` over every order except Cancelled ones; the
/// today/month counters bucket by `created_at` against the supplied window
/// starts.
pub fn summarize_orders(
    orders: &[order::Model],
    today_start: DateTime<Utc>,
    month_start: DateTime<Utc>,
) -> OrderTotals {
    let mut totals = OrderTotals::default();

    for order in orders {
        totals.total_orders += 1;

        let cancelled = order.order_status == order::OrderStatus::Cancelled.as_str();
        let today = order.created_at >= today_start;

        if order.order_status == order::OrderStatus::Pending.as_str() {
            totals.pending_orders += 1;
        }
        if today {
            totals.today_orders += 1;
        }
        if order.created_at >= month_start {
            totals.month_orders += 1;
        }
        if !cancelled {
            totals.total_revenue += order.total_price;
            if today {
                totals.today_revenue += order.total_price;
            }
        }
    }

    totals
}

/// Start of the local calendar day and month, expressed in UTC.
pub fn local_windows(now: DateTime<Local>) -> (DateTime<Utc>, DateTime<Utc>) {
    let today = now.date_naive();
    let day_start = resolve_local(today.and_hms_opt(0, 0, 0).expect("midnight exists"), now);

    let month_first = today
        .with_day(1)
        .expect("first of month exists")
        .and_hms_opt(0, 0, 0)
        .expect("midnight exists");
    let month_start = resolve_local(month_first, now);

    (day_start, month_start)
}

fn resolve_local(naive: chrono::NaiveDateTime, fallback: DateTime<Local>) -> DateTime<Utc> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        // A DST gap swallowed midnight; the fallback keeps the window sane.
        LocalResult::None => fallback.with_timezone(&Utc),
    }
}

/// Read-side aggregator behind the admin dashboard.
#[derive(Clone)]
pub struct DashboardService {
    db: Arc<DatabaseConnection>,
    catalog: Arc<ProductCatalogService>,
    settings: Arc<SiteSettingsService>,
}

impl DashboardService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        catalog: Arc<ProductCatalogService>,
        settings: Arc<SiteSettingsService>,
    ) -> Self {
        Self {
            db,
            catalog,
            settings,
        }
    }

    /// Computes the dashboard metrics from the current order and variant
    /// collections. The low-stock threshold comes from site settings
    /// (default 10).
    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<DashboardStats, ServiceError> {
        let orders = order::Entity::find().all(&*self.db).await?;

        let (today_start, month_start) = local_windows(Local::now());
        let totals = summarize_orders(&orders, today_start, month_start);

        let threshold = self.settings.typed().await?.low_stock_threshold;
        let low_stock = self.catalog.low_stock(threshold).await?;

        Ok(DashboardStats {
            total_orders: totals.total_orders,
            pending_orders: totals.pending_orders,
            today_orders: totals.today_orders,
            month_orders: totals.month_orders,
            total_revenue: totals.total_revenue,
            today_revenue: totals.today_revenue,
            low_stock_threshold: threshold,
            low_stock,
        })
    }

    /// The newest orders for the dashboard feed, joined with their variants.
    #[instrument(skip(self))]
    pub async fn recent_orders(
        &self,
        limit: u64,
    ) -> Result<Vec<(order::Model, Option<product_variant::Model>)>, ServiceError> {
        order::Entity::find()
            .find_also_related(product_variant::Entity)
            .order_by_desc(order::Column::CreatedAt)
            .limit(limit)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }
}
