//! # Ordering Module
//!
//! Builds the WhatsApp message used to reorder ingredients from a provider.
//!
//! ```text
//! Provider (phone +57 300 123 4567)
//!   + ingredients marked insuficiente
//!         │
//!         ▼
//! https://wa.me/573001234567?text=Hola+Distribuidora...
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{Ingredient, Provider};
use crate::validation::phone_digits;

const WHATSAPP_BASE: &str = "https://wa.me/";

/// Response of `GET /providers/{id}/order-link`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderLink {
    pub provider_id: String,
    pub message: String,
    pub url: String,
    /// Names of the ingredients included in the message.
    pub items: Vec<String>,
}

/// Plain-text order message listing the given ingredients.
pub fn order_message(provider: &Provider, ingredients: &[&Ingredient]) -> String {
    let mut message = format!("Hola {}, quisiera hacer un pedido:", provider.name);
    if ingredients.is_empty() {
        message.push_str("\n(sin productos pendientes)");
    }
    for ingredient in ingredients {
        message.push_str(&format!("\n- {} ({})", ingredient.name, ingredient.unit));
    }
    message.push_str("\nGracias.");
    message
}

/// Builds the order link for the provider's insufficient ingredients.
///
/// Fails with [`CoreError::MissingPhone`] when the provider has no phone.
pub fn order_link(provider: &Provider, ingredients: &[Ingredient]) -> CoreResult<OrderLink> {
    let digits = provider
        .phone
        .as_deref()
        .map(phone_digits)
        .filter(|digits| !digits.is_empty())
        .ok_or_else(|| CoreError::MissingPhone {
            provider: provider.name.clone(),
        })?;

    let pending: Vec<&Ingredient> = ingredients
        .iter()
        .filter(|ingredient| ingredient.is_insufficient())
        .collect();

    let message = order_message(provider, &pending);
    let encoded: String = url::form_urlencoded::byte_serialize(message.as_bytes()).collect();

    Ok(OrderLink {
        provider_id: provider.id.clone(),
        url: format!("{}{}?text={}", WHATSAPP_BASE, digits, encoded),
        items: pending.iter().map(|i| i.name.clone()).collect(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use chrono::Utc;

    fn provider(phone: Option<&str>) -> Provider {
        Provider {
            id: "p-1".to_string(),
            name: "Distribuidora Andina".to_string(),
            description: None,
            account_number: None,
            phone: phone.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    fn ingredient(name: &str, quantity: Option<f64>) -> Ingredient {
        Ingredient {
            id: format!("i-{}", name),
            name: name.to_string(),
            description: None,
            quantity,
            price: Money::from_pesos(1_000),
            unit: "kg".to_string(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_link_lists_only_insufficient_ingredients() {
        let ingredients = vec![ingredient("Limon", None), ingredient("Sal", Some(3.0))];
        let link = order_link(&provider(Some("+57 300 123-4567")), &ingredients).unwrap();

        assert_eq!(link.items, vec!["Limon".to_string()]);
        assert!(link.url.starts_with("https://wa.me/573001234567?text=Hola+Distribuidora"));
        assert!(link.message.contains("- Limon (kg)"));
        assert!(!link.message.contains("Sal"));
    }

    #[test]
    fn test_missing_phone_is_rejected() {
        let err = order_link(&provider(None), &[]).unwrap_err();
        assert!(matches!(err, CoreError::MissingPhone { .. }));

        let err = order_link(&provider(Some("  ")), &[]).unwrap_err();
        assert!(matches!(err, CoreError::MissingPhone { .. }));
    }
}
