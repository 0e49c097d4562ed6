pub mod order;
pub mod order_status_history;
pub mod product_variant;
pub mod site_setting;
pub mod testimonial;

pub use order::Entity as Order;
pub use order_status_history::Entity as OrderStatusHistory;
pub use product_variant::Entity as ProductVariant;
pub use site_setting::Entity as SiteSetting;
pub use testimonial::Entity as Testimonial;
