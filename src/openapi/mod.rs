use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI document for the v1 API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Dokan API",
        version = "0.3.0",
        description = r#"
Backend for a direct-to-consumer storefront.

- **Checkout**: validated, server-priced order submission
- **Orders**: admin list/search, status lifecycle with audit history, CSV export
- **Catalog**: product variant CRUD with low-stock alerts
- **Testimonials**: admin-managed customer testimonials
- **Settings**: flat key/value site configuration with a typed view
- **Dashboard**: derived order and revenue statistics
"#
    ),
    paths(
        crate::handlers::checkout::submit_checkout,
        crate::handlers::orders::list_orders,
        crate::handlers::orders::get_order,
        crate::handlers::orders::get_order_by_number,
        crate::handlers::orders::update_order_status,
        crate::handlers::orders::update_order,
        crate::handlers::orders::delete_order,
        crate::handlers::orders::order_history,
        crate::handlers::orders::export_orders_csv,
        crate::handlers::products::list_active_products,
        crate::handlers::products::list_all_products,
        crate::handlers::products::list_low_stock,
        crate::handlers::products::get_product,
        crate::handlers::products::create_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,
        crate::handlers::testimonials::list_active_testimonials,
        crate::handlers::testimonials::list_all_testimonials,
        crate::handlers::testimonials::create_testimonial,
        crate::handlers::testimonials::update_testimonial,
        crate::handlers::testimonials::delete_testimonial,
        crate::handlers::settings::get_settings,
        crate::handlers::settings::list_setting_rows,
        crate::handlers::settings::get_typed_settings,
        crate::handlers::settings::update_settings,
        crate::handlers::dashboard::dashboard_stats,
        crate::handlers::dashboard::recent_orders,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::entities::order::OrderStatus,
        crate::entities::product_variant::Model,
        crate::entities::testimonial::Model,
        crate::entities::site_setting::Model,
        crate::services::checkout::CheckoutRequest,
        crate::services::checkout::CheckoutConfirmation,
        crate::services::order_status::UpdateOrderStatusRequest,
        crate::services::orders::UpdateOrderNotesRequest,
        crate::services::catalog::CreateVariantInput,
        crate::services::catalog::UpdateVariantInput,
        crate::services::testimonials::CreateTestimonialInput,
        crate::services::testimonials::UpdateTestimonialInput,
        crate::services::settings::SettingUpdate,
        crate::services::settings::SiteSettings,
        crate::services::reports::DashboardStats,
        crate::handlers::orders::OrderResponse,
        crate::handlers::orders::OrderProductInfo,
        crate::handlers::orders::StatusHistoryResponse,
    )),
    tags(
        (name = "dokan-api", description = "Storefront order and back-office API")
    )
)]
pub struct ApiDoc;

/// Swagger UI served at /docs, backed by the generated document.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
