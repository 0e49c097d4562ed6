use std::collections::BTreeMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    errors::ServiceError,
    events::{Event, EventSender},
    services::{
        catalog::ProductCatalogService,
        orders::{NewOrder, OrderService},
        pricing::PricingService,
    },
};

const MIN_NAME_LEN: usize = 3;
const MIN_ADDRESS_LEN: usize = 20;
const MAX_QUANTITY: i32 = 10;

/// Bangladeshi mobile numbers: "01" followed by exactly nine digits.
/// ASCII digits only; the regex class `\d` would also admit other scripts.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^01[0-9]{9}$").expect("valid phone regex"));

/// Raw checkout form input as submitted by the landing page.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CheckoutRequest {
    pub name: String,
    pub phone: String,
    pub address: String,
    /// Package identifier: a variant's weight/size code ("250g") or its UUID.
    pub package: String,
    pub quantity: i32,
    #[serde(default)]
    pub customer_notes: Option<String>,
}

/// Successful checkout result surfaced to the shopper.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckoutConfirmation {
    pub order_id: Uuid,
    pub order_number: String,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

/// Validates raw checkout input against the currently offered packages.
///
/// Pure: checks every field and returns the complete field → message map, or
/// `Ok(())` when all rules pass. Persistence is the caller's job.
pub fn validate_checkout(
    request: &CheckoutRequest,
    offered_packages: &[String],
) -> Result<(), BTreeMap<String, String>> {
    let mut errors = BTreeMap::new();

    if request.name.trim().len() < MIN_NAME_LEN {
        errors.insert(
            "name".to_string(),
            "Please enter your full name (at least 3 characters)".to_string(),
        );
    }

    if !PHONE_RE.is_match(request.phone.trim()) {
        errors.insert(
            "phone".to_string(),
            "Enter a valid 11-digit mobile number starting with 01".to_string(),
        );
    }

    if request.address.trim().len() < MIN_ADDRESS_LEN {
        errors.insert(
            "address".to_string(),
            "Enter your complete address including area and district".to_string(),
        );
    }

    // Unknown package identifiers fail closed; never silently defaulted.
    let package = request.package.trim();
    if package.is_empty() || !offered_packages.iter().any(|p| p == package) {
        errors.insert(
            "package".to_string(),
            "Select one of the available packages".to_string(),
        );
    }

    if request.quantity < 1 || request.quantity > MAX_QUANTITY {
        errors.insert(
            "quantity".to_string(),
            format!("Quantity must be between 1 and {}", MAX_QUANTITY),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Orchestrates a checkout submission: validate, price server-side, persist.
#[derive(Clone)]
pub struct CheckoutService {
    catalog: Arc<ProductCatalogService>,
    pricing: Arc<PricingService>,
    orders: Arc<OrderService>,
    event_sender: Arc<EventSender>,
}

impl CheckoutService {
    pub fn new(
        catalog: Arc<ProductCatalogService>,
        pricing: Arc<PricingService>,
        orders: Arc<OrderService>,
        event_sender: Arc<EventSender>,
    ) -> Self {
        Self {
            catalog,
            pricing,
            orders,
            event_sender,
        }
    }

    /// Accepts a checkout submission or rejects it with field-scoped errors.
    ///
    /// The price is always resolved from current catalog state; the request
    /// carries no price field, so a tampered client cannot influence it.
    #[instrument(skip(self, request), fields(package = %request.package, quantity = request.quantity))]
    pub async fn submit(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutConfirmation, ServiceError> {
        let offered = self.catalog.offered_package_identifiers().await?;
        validate_checkout(&request, &offered).map_err(ServiceError::FieldValidation)?;

        let quote = self
            .pricing
            .resolve(request.package.trim(), request.quantity)
            .await?;

        let order = self
            .orders
            .create_order(NewOrder {
                customer_name: request.name.trim().to_string(),
                phone_number: request.phone.trim().to_string(),
                delivery_address: request.address.trim().to_string(),
                product_variant_id: quote.variant.id,
                quantity: request.quantity,
                unit_price: quote.unit_price,
                total_price: quote.total_price,
                customer_notes: request.customer_notes,
            })
            .await?;

        info!(
            order_number = %order.order_number,
            total_price = %order.total_price,
            "Checkout accepted"
        );
        self.event_sender
            .send_or_log(Event::OrderCreated(order.id))
            .await;

        Ok(CheckoutConfirmation {
            order_id: order.id,
            order_number: order.order_number,
            unit_price: order.unit_price,
            total_price: order.total_price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn offered() -> Vec<String> {
        vec!["100g".to_string(), "250g".to_string(), "500g".to_string()]
    }

    fn valid_request() -> CheckoutRequest {
        CheckoutRequest {
            name: "Rahim Ahmed".to_string(),
            phone: "01712345678".to_string(),
            address: "House 12, Road 5, Dhanmondi, Dhaka-1209".to_string(),
            package: "250g".to_string(),
            quantity: 1,
            customer_notes: None,
        }
    }

    #[test]
    fn accepts_a_complete_submission() {
        assert!(validate_checkout(&valid_request(), &offered()).is_ok());
    }

    #[test]
    fn rejects_short_name_and_address_together() {
        let request = CheckoutRequest {
            name: "Ra".to_string(),
            address: "short".to_string(),
            ..valid_request()
        };
        let errors = validate_checkout(&request, &offered()).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("address"));
    }

    #[test_case("01712345678", true; "valid grameenphone")]
    #[test_case("01987654321", true; "valid banglalink")]
    #[test_case("0171234567", false; "ten digits")]
    #[test_case("017123456789", false; "twelve digits")]
    #[test_case("02712345678", false; "wrong prefix")]
    #[test_case("01x12345678", false; "letter inside")]
    #[test_case("", false; "empty")]
    fn phone_rule(phone: &str, expected: bool) {
        let request = CheckoutRequest {
            phone: phone.to_string(),
            ..valid_request()
        };
        let result = validate_checkout(&request, &offered());
        if expected {
            assert!(result.is_ok());
        } else {
            assert!(result.unwrap_err().contains_key("phone"));
        }
    }

    #[test]
    fn unknown_package_fails_closed() {
        let request = CheckoutRequest {
            package: "750g".to_string(),
            ..valid_request()
        };
        let errors = validate_checkout(&request, &offered()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key("package"));
    }

    #[test_case(0, false; "zero")]
    #[test_case(1, true; "lower bound")]
    #[test_case(10, true; "upper bound")]
    #[test_case(11, false; "above cap")]
    #[test_case(-3, false; "negative")]
    fn quantity_rule(quantity: i32, expected: bool) {
        let request = CheckoutRequest {
            quantity,
            ..valid_request()
        };
        let result = validate_checkout(&request, &offered());
        if expected {
            assert!(result.is_ok());
        } else {
            assert!(result.unwrap_err().contains_key("quantity"));
        }
    }

    #[test]
    fn every_failing_field_is_reported_at_once() {
        let request = CheckoutRequest {
            name: "X".to_string(),
            phone: "123".to_string(),
            address: "nowhere".to_string(),
            package: "bogus".to_string(),
            quantity: 99,
            customer_notes: None,
        };
        let errors = validate_checkout(&request, &offered()).unwrap_err();
        assert_eq!(errors.len(), 5);
    }
}
