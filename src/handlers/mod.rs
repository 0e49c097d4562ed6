pub mod checkout;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod settings;
pub mod testimonials;

use std::sync::Arc;

use crate::db::DbPool;
use crate::events::EventSender;
use crate::services::{
    catalog::ProductCatalogService, checkout::CheckoutService, order_status::OrderStatusService,
    orders::OrderService, pricing::PricingService, reports::DashboardService,
    settings::SiteSettingsService, testimonials::TestimonialService,
};

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Arc<ProductCatalogService>,
    pub pricing: Arc<PricingService>,
    pub checkout: Arc<CheckoutService>,
    pub orders: Arc<OrderService>,
    pub order_status: Arc<OrderStatusService>,
    pub testimonials: Arc<TestimonialService>,
    pub settings: Arc<SiteSettingsService>,
    pub dashboard: Arc<DashboardService>,
}

impl AppServices {
    /// Wires every service against the shared pool and event channel.
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        let catalog = Arc::new(ProductCatalogService::new(db.clone(), event_sender.clone()));
        let pricing = Arc::new(PricingService::new(catalog.clone()));
        let orders = Arc::new(OrderService::new(db.clone(), event_sender.clone()));
        let order_status = Arc::new(OrderStatusService::new(db.clone(), event_sender.clone()));
        let checkout = Arc::new(CheckoutService::new(
            catalog.clone(),
            pricing.clone(),
            orders.clone(),
            event_sender.clone(),
        ));
        let testimonials = Arc::new(TestimonialService::new(db.clone(), event_sender.clone()));
        let settings = Arc::new(SiteSettingsService::new(db.clone(), event_sender.clone()));
        let dashboard = Arc::new(DashboardService::new(
            db.clone(),
            catalog.clone(),
            settings.clone(),
        ));

        Self {
            catalog,
            pricing,
            checkout,
            orders,
            order_status,
            testimonials,
            settings,
            dashboard,
        }
    }
}
