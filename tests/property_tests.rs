//! Property-based tests for the pure validation, pricing and aggregation
//! rules.

use chrono::{Duration, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use dokan_api::entities::order;
use dokan_api::services::checkout::{validate_checkout, CheckoutRequest};
use dokan_api::services::pricing::total_price;
use dokan_api::services::reports::summarize_orders;

fn request_with_phone(phone: &str) -> CheckoutRequest {
    CheckoutRequest {
        name: "Rahim Ahmed".to_string(),
        phone: phone.to_string(),
        address: "House 12, Road 5, Dhanmondi, Dhaka-1209".to_string(),
        package: "250g".to_string(),
        quantity: 1,
        customer_notes: None,
    }
}

fn request_with_address(address: &str) -> CheckoutRequest {
    CheckoutRequest {
        address: address.to_string(),
        ..request_with_phone("01712345678")
    }
}

fn offered() -> Vec<String> {
    vec!["100g".to_string(), "250g".to_string(), "500g".to_string()]
}

fn order_with(total: Decimal, status: &str, days_ago: i64) -> order::Model {
    let created_at = Utc::now() - Duration::days(days_ago);
    order::Model {
        id: Uuid::new_v4(),
        order_number: format!("ORD-{}", Uuid::new_v4().simple()),
        customer_name: "Customer".to_string(),
        phone_number: "01712345678".to_string(),
        delivery_address: "House 12, Road 5, Dhanmondi, Dhaka-1209".to_string(),
        product_variant_id: Uuid::new_v4(),
        quantity: 1,
        unit_price: total,
        total_price: total,
        order_status: status.to_string(),
        payment_method: "Cash on Delivery".to_string(),
        customer_notes: None,
        notes: None,
        created_at,
        updated_at: created_at,
        cancelled_at: None,
        delivered_at: None,
    }
}

proptest! {
    /// A phone string is accepted exactly when it is "01" followed by nine
    /// ASCII digits (eleven characters total).
    #[test]
    fn phone_accepted_iff_01_plus_nine_digits(phone in "\\PC{0,16}") {
        let trimmed = phone.trim();
        let expected = trimmed.len() == 11
            && trimmed.starts_with("01")
            && trimmed.chars().all(|c| c.is_ascii_digit());

        let result = validate_checkout(&request_with_phone(&phone), &offered());
        let phone_ok = match &result {
            Ok(()) => true,
            Err(errors) => !errors.contains_key("phone"),
        };
        prop_assert_eq!(phone_ok, expected);
    }

    /// Digit-only strings: length alone decides, and only with the 01 prefix.
    #[test]
    fn digit_phone_lengths(digits in proptest::collection::vec(0u8..10, 0..14)) {
        let phone: String = digits.iter().map(|d| char::from(b'0' + d)).collect();
        let expected = phone.len() == 11 && phone.starts_with("01");

        let result = validate_checkout(&request_with_phone(&phone), &offered());
        let phone_ok = match &result {
            Ok(()) => true,
            Err(errors) => !errors.contains_key("phone"),
        };
        prop_assert_eq!(phone_ok, expected);
    }

    /// An address is accepted exactly when its trimmed length is at least 20.
    #[test]
    fn address_accepted_iff_at_least_20_chars(address in "[a-zA-Z0-9 ,/-]{0,40}") {
        let expected = address.trim().len() >= 20;

        let result = validate_checkout(&request_with_address(&address), &offered());
        let address_ok = match &result {
            Ok(()) => true,
            Err(errors) => !errors.contains_key("address"),
        };
        prop_assert_eq!(address_ok, expected);
    }

    /// total_price is always unit_price × quantity.
    #[test]
    fn total_price_is_product(unit in 0u32..1_000_000, quantity in 1i32..=10) {
        let unit_price = Decimal::from(unit);
        let total = total_price(unit_price, quantity);
        prop_assert_eq!(total, unit_price * Decimal::from(quantity));
    }

    /// Revenue sums every non-cancelled order and nothing else, for any mix
    /// of statuses.
    #[test]
    fn revenue_excludes_exactly_the_cancelled_orders(
        amounts in proptest::collection::vec((0u32..100_000, 0usize..5), 0..24)
    ) {
        let statuses = ["Pending", "Confirmed", "Out for Delivery", "Delivered", "Cancelled"];
        let orders: Vec<order::Model> = amounts
            .iter()
            .map(|(amount, status_idx)| {
                order_with(Decimal::from(*amount), statuses[*status_idx], 0)
            })
            .collect();

        let expected: Decimal = orders
            .iter()
            .filter(|o| o.order_status != "Cancelled")
            .map(|o| o.total_price)
            .sum();

        let month_start = Utc::now() - Duration::days(30);
        let today_start = Utc::now() - Duration::days(1);
        let totals = summarize_orders(&orders, today_start, month_start);

        prop_assert_eq!(totals.total_revenue, expected);
        prop_assert_eq!(totals.total_orders, orders.len() as u64);
    }

    /// The window counters bucket orders by created_at, independent of
    /// status.
    #[test]
    fn window_counters_follow_created_at(
        days in proptest::collection::vec(0i64..60, 0..24)
    ) {
        let orders: Vec<order::Model> = days
            .iter()
            .map(|d| order_with(Decimal::from(100u32), "Pending", *d))
            .collect();

        let now = Utc::now();
        let today_start = now - Duration::days(1);
        let month_start = now - Duration::days(31);
        let totals = summarize_orders(&orders, today_start, month_start);

        let expected_today = days.iter().filter(|d| **d < 1).count() as u64;
        let expected_month = days.iter().filter(|d| **d < 31).count() as u64;
        prop_assert_eq!(totals.today_orders, expected_today);
        prop_assert_eq!(totals.month_orders, expected_month);
    }
}
