//! # Validation Module
//!
//! Input validation for every body the API accepts.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde, in the HTTP extractor)               │
//! │  ├── Wrong JSON types, unknown status literal                          │
//! │  └── → 400 VALIDATION_ERROR                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (business rules on typed input)                  │
//! │  ├── Non-empty sale products, quantities, prices, ids                  │
//! │  └── → 400 VALIDATION_ERROR, nothing reaches the database              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign keys → 409 CONFLICT                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::types::{
    AlertInput, IngredientInput, MovementInput, ProductInput, ProviderInput, QuantityInput,
    SaleInput, SaleStatus, SubscriptionInput,
};
use crate::{INSUFFICIENT_STOCK_LITERAL, MAX_LINE_QUANTITY, MAX_MOVING_AVERAGE_WINDOW};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_TEXT_LEN: usize = 2000;

// =============================================================================
// Primitive Validators
// =============================================================================

/// Validates an entity id (UUID v4 string).
///
/// ## Example
/// ```rust
/// use gastro_core::validation::validate_id;
///
/// assert!(validate_id("id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_id("id", "12").is_err());
/// assert!(validate_id("id", "").is_err());
/// ```
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required(field));
    }

    uuid::Uuid::parse_str(id)
        .map_err(|_| ValidationError::invalid_format(field, "must be a valid UUID"))?;

    Ok(())
}

/// Validates a required, bounded text field.
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

fn validate_optional_text(field: &str, value: Option<&str>) -> ValidationResult<()> {
    match value {
        Some(text) if text.chars().count() > MAX_TEXT_LEN => Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        }),
        _ => Ok(()),
    }
}

fn validate_non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a ticket line quantity (1..=999).
pub fn validate_line_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Stock Quantity
// =============================================================================

/// Interprets a stock value from the inventory screen.
///
/// ```text
///  null / absent        ──► None  (insuficiente)
///  "insuficiente"       ──► None
///  "  Insuficiente "    ──► None
///  12 / 2.5             ──► Some(12.0) / Some(2.5)
///  "12"                 ──► Some(12.0)
///  -1                   ──► Err(Negative)
///  "mucho"              ──► Err(InvalidFormat)
/// ```
pub fn parse_stock_quantity(input: Option<&QuantityInput>) -> ValidationResult<Option<f64>> {
    let value = match input {
        None => return Ok(None),
        Some(QuantityInput::Number(n)) => *n,
        Some(QuantityInput::Text(text)) => {
            let text = text.trim();
            if text.eq_ignore_ascii_case(INSUFFICIENT_STOCK_LITERAL) {
                return Ok(None);
            }
            text.parse::<f64>().map_err(|_| {
                ValidationError::invalid_format(
                    "quantity",
                    format!("expected a number or '{}'", INSUFFICIENT_STOCK_LITERAL),
                )
            })?
        }
    };

    if !value.is_finite() {
        return Err(ValidationError::invalid_format("quantity", "must be finite"));
    }

    if value < 0.0 {
        return Err(ValidationError::Negative {
            field: "quantity".to_string(),
        });
    }

    Ok(Some(value))
}

// =============================================================================
// Entity Inputs
// =============================================================================

/// Validates a sale aggregate body.
///
/// ## Rules
/// - `products` must not be empty
/// - every line: valid product id, quantity 1..=999
/// - every addition: non-empty name, price >= 0
/// - `totalAmount` >= 0, `tableNumber` present
pub fn validate_sale_input(input: &SaleInput) -> ValidationResult<()> {
    if input.products.is_empty() {
        return Err(ValidationError::required("products"));
    }

    validate_name("tableNumber", &input.table_number)?;
    validate_optional_text("generalObservation", input.general_observation.as_deref())?;
    validate_non_negative("totalAmount", input.total_amount.pesos())?;

    for line in &input.products {
        validate_id("productId", &line.product_id)?;
        validate_line_quantity(line.quantity)?;
        validate_optional_text("observation", line.observation.as_deref())?;

        for addition in &line.additions {
            validate_name("addition name", &addition.name)?;
            validate_non_negative("addition price", addition.price.pesos())?;
        }
    }

    Ok(())
}

/// Parses the body of `PUT /sales/{id}/status`.
///
/// Only the three literals are accepted, exactly as stored.
pub fn parse_sale_status(value: &str) -> ValidationResult<SaleStatus> {
    value.parse::<SaleStatus>().map_err(|_| ValidationError::NotAllowed {
        field: "status".to_string(),
        allowed: SaleStatus::ALL.iter().map(|s| s.as_str().to_string()).collect(),
    })
}

/// Validates an ingredient body and returns its parsed stock.
pub fn validate_ingredient_input(input: &IngredientInput) -> ValidationResult<Option<f64>> {
    validate_name("name", &input.name)?;
    validate_name("unit", &input.unit)?;
    validate_optional_text("description", input.description.as_deref())?;
    validate_non_negative("price", input.price.pesos())?;
    parse_stock_quantity(input.quantity.as_ref())
}

/// Validates a product body.
pub fn validate_product_input(input: &ProductInput) -> ValidationResult<()> {
    validate_name("name", &input.name)?;
    validate_name("category", &input.category)?;
    validate_optional_text("description", input.description.as_deref())?;
    validate_non_negative("price", input.price.pesos())?;

    let mut seen = HashSet::new();
    for link in &input.ingredients {
        validate_id("ingredientId", &link.ingredient_id)?;
        if !(link.quantity.is_finite() && link.quantity > 0.0) {
            return Err(ValidationError::MustBePositive {
                field: "ingredient quantity".to_string(),
            });
        }
        if !seen.insert(link.ingredient_id.as_str()) {
            return Err(ValidationError::invalid_format(
                "ingredients",
                format!("ingredient {} listed twice", link.ingredient_id),
            ));
        }
    }

    Ok(())
}

/// Validates a provider body.
///
/// Phone is optional; when present it must be digits (an optional leading
/// `+`, spaces and dashes are tolerated) so a WhatsApp link can be built.
pub fn validate_provider_input(input: &ProviderInput) -> ValidationResult<()> {
    validate_name("name", &input.name)?;
    validate_optional_text("description", input.description.as_deref())?;

    if let Some(phone) = input.phone.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        let digits = phone_digits(phone);
        let well_formed = phone
            .chars()
            .enumerate()
            .all(|(i, c)| c.is_ascii_digit() || c == ' ' || c == '-' || (i == 0 && c == '+'));
        if !well_formed || digits.len() < 7 || digits.len() > 15 {
            return Err(ValidationError::invalid_format(
                "phone",
                "must contain 7 to 15 digits",
            ));
        }
    }

    Ok(())
}

/// Strips everything but digits from a phone number.
pub fn phone_digits(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// Validates a ledger movement body.
pub fn validate_movement_input(input: &MovementInput) -> ValidationResult<()> {
    validate_id("providerId", &input.provider_id)?;
    if !input.amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }
    validate_optional_text("description", input.description.as_deref())?;
    Ok(())
}

/// Validates an alert body.
///
/// ## Rules
/// - weekly alerts need `repeatDay` in 0..=6 (0 = Sunday)
/// - one-time alerts need `alertTime`
pub fn validate_alert_input(input: &AlertInput) -> ValidationResult<()> {
    validate_name("title", &input.title)?;
    validate_optional_text("description", input.description.as_deref())?;

    if input.repeat_weekly {
        match input.repeat_day {
            None => return Err(ValidationError::required("repeatDay")),
            Some(day) if day > 6 => {
                return Err(ValidationError::OutOfRange {
                    field: "repeatDay".to_string(),
                    min: 0,
                    max: 6,
                })
            }
            Some(_) => {}
        }
    } else if input.alert_time.is_none() {
        return Err(ValidationError::required("alertTime"));
    }

    Ok(())
}

/// Validates a push subscription body.
pub fn validate_subscription_input(input: &SubscriptionInput) -> ValidationResult<()> {
    let endpoint = input.endpoint.trim();
    if endpoint.is_empty() {
        return Err(ValidationError::required("endpoint"));
    }
    url::Url::parse(endpoint)
        .map_err(|_| ValidationError::invalid_format("endpoint", "must be an absolute URL"))?;
    if input.keys.p256dh.trim().is_empty() {
        return Err(ValidationError::required("keys.p256dh"));
    }
    if input.keys.auth.trim().is_empty() {
        return Err(ValidationError::required("keys.auth"));
    }
    Ok(())
}

// =============================================================================
// Report Parameters
// =============================================================================

/// Validates the `days` look-back of the daily report.
pub fn validate_report_days(days: i64, max_days: i64) -> ValidationResult<()> {
    if days < 1 || days > max_days {
        return Err(ValidationError::OutOfRange {
            field: "days".to_string(),
            min: 1,
            max: max_days,
        });
    }
    Ok(())
}

/// Validates a moving-average window.
pub fn validate_window(window: usize) -> ValidationResult<()> {
    if window == 0 || window > MAX_MOVING_AVERAGE_WINDOW {
        return Err(ValidationError::OutOfRange {
            field: "window".to_string(),
            min: 1,
            max: MAX_MOVING_AVERAGE_WINDOW as i64,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{AdditionInput, ProductIngredientInput, PushKeys, SaleProductInput};
    use chrono::Utc;

    const PRODUCT_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

    fn sale_input(products: Vec<SaleProductInput>) -> SaleInput {
        SaleInput {
            table_number: "4".to_string(),
            status: None,
            general_observation: None,
            total_amount: Money::from_pesos(20_000),
            products,
        }
    }

    fn line(quantity: i64, additions: Vec<AdditionInput>) -> SaleProductInput {
        SaleProductInput {
            product_id: PRODUCT_ID.to_string(),
            quantity,
            observation: None,
            additions,
        }
    }

    #[test]
    fn test_sale_requires_products() {
        let err = validate_sale_input(&sale_input(vec![])).unwrap_err();
        assert_eq!(err.to_string(), "products is required");
    }

    #[test]
    fn test_sale_line_rules() {
        assert!(validate_sale_input(&sale_input(vec![line(2, vec![])])).is_ok());
        assert!(validate_sale_input(&sale_input(vec![line(0, vec![])])).is_err());
        assert!(validate_sale_input(&sale_input(vec![line(1000, vec![])])).is_err());

        let bad_addition = AdditionInput {
            name: " ".to_string(),
            price: Money::from_pesos(2_000),
        };
        assert!(validate_sale_input(&sale_input(vec![line(1, vec![bad_addition])])).is_err());

        let mut bad_product = line(1, vec![]);
        bad_product.product_id = "7".to_string();
        assert!(validate_sale_input(&sale_input(vec![bad_product])).is_err());
    }

    #[test]
    fn test_parse_sale_status() {
        assert_eq!(parse_sale_status("en mesa").unwrap(), SaleStatus::AtTable);
        let err = parse_sale_status("cancelada").unwrap_err();
        assert!(matches!(err, ValidationError::NotAllowed { .. }));
    }

    #[test]
    fn test_parse_stock_quantity() {
        let text = |s: &str| QuantityInput::Text(s.to_string());

        assert_eq!(parse_stock_quantity(None).unwrap(), None);
        assert_eq!(parse_stock_quantity(Some(&text("insuficiente"))).unwrap(), None);
        assert_eq!(parse_stock_quantity(Some(&text(" Insuficiente "))).unwrap(), None);
        assert_eq!(parse_stock_quantity(Some(&text("12"))).unwrap(), Some(12.0));
        assert_eq!(
            parse_stock_quantity(Some(&QuantityInput::Number(0.0))).unwrap(),
            Some(0.0)
        );
        assert!(parse_stock_quantity(Some(&QuantityInput::Number(-1.0))).is_err());
        assert!(parse_stock_quantity(Some(&text("mucho"))).is_err());
    }

    #[test]
    fn test_product_rejects_duplicate_ingredients() {
        let link = ProductIngredientInput {
            ingredient_id: PRODUCT_ID.to_string(),
            quantity: 1.0,
        };
        let input = ProductInput {
            name: "Michelada".to_string(),
            description: None,
            price: Money::from_pesos(12_000),
            category: "Bebidas".to_string(),
            ingredients: vec![link.clone(), link],
        };
        assert!(validate_product_input(&input).is_err());
    }

    #[test]
    fn test_provider_phone() {
        let mut input = ProviderInput {
            name: "Distribuidora Andina".to_string(),
            description: None,
            account_number: None,
            phone: None,
        };
        assert!(validate_provider_input(&input).is_ok());

        input.phone = Some("+57 300 123-4567".to_string());
        assert!(validate_provider_input(&input).is_ok());
        assert_eq!(phone_digits("+57 300 123-4567"), "573001234567");

        input.phone = Some("call me".to_string());
        assert!(validate_provider_input(&input).is_err());
    }

    #[test]
    fn test_alert_rules() {
        let mut input = AlertInput {
            title: "Pedir hielo".to_string(),
            description: None,
            alert_time: None,
            repeat_weekly: true,
            repeat_day: Some(3),
        };
        assert!(validate_alert_input(&input).is_ok());

        input.repeat_day = Some(7);
        assert!(validate_alert_input(&input).is_err());

        input.repeat_weekly = false;
        input.repeat_day = None;
        assert!(validate_alert_input(&input).is_err());

        input.alert_time = Some(Utc::now());
        assert!(validate_alert_input(&input).is_ok());
    }

    #[test]
    fn test_subscription_rules() {
        let mut input = SubscriptionInput {
            endpoint: "https://push.example.com/abc".to_string(),
            keys: PushKeys {
                p256dh: "key".to_string(),
                auth: "secret".to_string(),
            },
        };
        assert!(validate_subscription_input(&input).is_ok());

        input.endpoint = "not a url".to_string();
        assert!(validate_subscription_input(&input).is_err());
    }

    #[test]
    fn test_report_parameters() {
        assert!(validate_report_days(30, 366).is_ok());
        assert!(validate_report_days(0, 366).is_err());
        assert!(validate_report_days(400, 366).is_err());
        assert!(validate_window(7).is_ok());
        assert!(validate_window(0).is_err());
    }
}
