//! Seed data script - populates the database with the launch catalog
//!
//! Run with: cargo run --bin seed-data
//!
//! This creates:
//! - the three launch packages (100g / 250g / 500g)
//! - the default site settings rows
//! - a couple of testimonials for the landing page

use std::time::Duration;

use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectOptions, Database, EntityTrait, PaginatorTrait, QueryFilter, Set};
use sea_orm_migration::MigratorTrait;
use tracing::info;
use uuid::Uuid;

use dokan_api::entities::{product_variant, site_setting, testimonial};
use dokan_api::migrator::Migrator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("=== dokan-api seed data ===");

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://dokan.db?mode=rwc".to_string());

    let mut options = ConnectOptions::new(database_url.clone());
    options
        .max_connections(5)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10));

    info!("Connecting to database: {}", database_url);
    let db = Database::connect(options).await?;
    Migrator::up(&db, None).await?;

    let variants = seed_variants(&db).await?;
    info!("Seeded {} product variants", variants);

    let settings = seed_settings(&db).await?;
    info!("Seeded {} site settings", settings);

    let testimonials = seed_testimonials(&db).await?;
    info!("Seeded {} testimonials", testimonials);

    info!("=== seed complete ===");
    Ok(())
}

async fn seed_variants(db: &sea_orm::DatabaseConnection) -> anyhow::Result<usize> {
    let launch_packages = [
        ("100g Pack", "100g", dec!(499), None, 100, None, 1),
        (
            "250g Pack",
            "250g",
            dec!(999),
            Some(dec!(1199)),
            60,
            Some("Most Popular"),
            2,
        ),
        (
            "500g Pack",
            "500g",
            dec!(1499),
            Some(dec!(1999)),
            40,
            Some("Best Value"),
            3,
        ),
    ];

    let mut created = 0;
    for (name, weight_size, price, original_price, stock, badge, order) in launch_packages {
        let exists = product_variant::Entity::find()
            .filter(product_variant::Column::WeightSize.eq(weight_size))
            .count(db)
            .await?;
        if exists > 0 {
            continue;
        }

        let now = chrono::Utc::now();
        product_variant::ActiveModel {
            id: Set(Uuid::new_v4()),
            variant_name: Set(name.to_string()),
            weight_size: Set(weight_size.to_string()),
            description: Set(None),
            price: Set(price),
            original_price: Set(original_price),
            stock_quantity: Set(stock),
            is_active: Set(true),
            badge: Set(badge.map(str::to_string)),
            image_url: Set(None),
            display_order: Set(order),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;
        created += 1;
    }
    Ok(created)
}

async fn seed_settings(db: &sea_orm::DatabaseConnection) -> anyhow::Result<usize> {
    let defaults = [
        ("site_name", "Dokan", "text", "Site name shown in the header"),
        ("contact_phone", "01700000000", "text", "Support phone number"),
        (
            "contact_email",
            "hello@dokan.example",
            "text",
            "Support email address",
        ),
        (
            "free_delivery_threshold",
            "1500",
            "number",
            "Order total above which delivery is free",
        ),
        (
            "low_stock_threshold",
            "10",
            "number",
            "Stock level that triggers restock alerts",
        ),
        (
            "enable_countdown_timer",
            "true",
            "boolean",
            "Show the offer countdown on the landing page",
        ),
        (
            "limited_stock_message",
            "Only a few packs left!",
            "text",
            "Urgency banner text",
        ),
    ];

    let mut created = 0;
    for (key, value, setting_type, description) in defaults {
        let exists = site_setting::Entity::find_by_id(key.to_string())
            .one(db)
            .await?;
        if exists.is_some() {
            continue;
        }

        site_setting::ActiveModel {
            setting_key: Set(key.to_string()),
            setting_value: Set(Some(value.to_string())),
            setting_type: Set(Some(setting_type.to_string())),
            description: Set(Some(description.to_string())),
            updated_at: Set(chrono::Utc::now()),
        }
        .insert(db)
        .await?;
        created += 1;
    }
    Ok(created)
}

async fn seed_testimonials(db: &sea_orm::DatabaseConnection) -> anyhow::Result<usize> {
    let existing = testimonial::Entity::find().count(db).await?;
    if existing > 0 {
        return Ok(0);
    }

    let samples = [
        (
            "Rahim Ahmed",
            Some("Dhanmondi, Dhaka"),
            "Ordered the 250g pack and it arrived in two days. Quality is excellent.",
            5,
            true,
            1,
        ),
        (
            "Nusrat Jahan",
            Some("Chattogram"),
            "Second order already. The 500g pack is great value.",
            4,
            false,
            2,
        ),
    ];

    let mut created = 0;
    for (name, location, text, rating, verified, order) in samples {
        let now = chrono::Utc::now();
        testimonial::ActiveModel {
            id: Set(Uuid::new_v4()),
            customer_name: Set(name.to_string()),
            customer_location: Set(location.map(str::to_string)),
            testimonial_text: Set(text.to_string()),
            rating: Set(rating),
            is_verified: Set(verified),
            is_active: Set(true),
            display_order: Set(order),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;
        created += 1;
    }
    Ok(created)
}
