//! # Domain Types
//!
//! Entities, read models and input shapes shared by the database layer
//! and the HTTP API.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────────┐  │
//! │  │      Sale       │──►│   SaleProduct   │──►│ SaleProductAddition  │  │
//! │  │  ─────────────  │1:N│  ─────────────  │1:N│  ──────────────────  │  │
//! │  │  status         │   │  product_id ──┐ │   │  name  (snapshot)    │  │
//! │  │  table_number   │   │  quantity     │ │   │  price (snapshot)    │  │
//! │  │  total_amount   │   │  observation  │ │   └──────────────────────┘  │
//! │  └─────────────────┘   └───────────────┼─┘                             │
//! │                                        │ reference (joined at read)    │
//! │  ┌─────────────────┐   ┌───────────────▼─┐   ┌──────────────────────┐  │
//! │  │   Ingredient    │◄──│ProductIngredient│◄──│       Product        │  │
//! │  │  quantity: None │N:1│  quantity       │N:1│  category            │  │
//! │  │  = insuficiente │   └─────────────────┘   │  "Adiciones" = extra │  │
//! │  └─────────────────┘                         └──────────────────────┘  │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────────┐  │
//! │  │    Provider     │──►│ProviderMovement │   │  Alert / Subscription│  │
//! │  │  phone (opt.)   │1:N│ INVOICE/PAYMENT │   │  push notifications  │  │
//! │  └─────────────────┘   └─────────────────┘   └──────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Reference vs Snapshot
//! A `SaleProduct` points at the catalog `Product`; its name and price are
//! joined at read time. A `SaleProductAddition` copies name and price when
//! the ticket is written, so later catalog edits never change old tickets.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::ADDITIONS_CATEGORY;

// =============================================================================
// Ingredient
// =============================================================================

/// A stocked ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Units in stock. `None` is "insuficiente": out or unknown, not zero.
    pub quantity: Option<f64>,
    pub price: Money,
    /// Unit of measure label ("kg", "botella", "und").
    pub unit: String,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Ingredient {
    /// True when stock is flagged as insufficient.
    #[inline]
    pub fn is_insufficient(&self) -> bool {
        self.quantity.is_none()
    }
}

/// Stock value as sent by the inventory screen: a number, a numeric
/// string, or the literal `"insuficiente"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuantityInput {
    Number(f64),
    Text(String),
}

/// Body for creating or editing an ingredient.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct IngredientInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[ts(type = "number | string | null")]
    pub quantity: Option<QuantityInput>,
    pub price: Money,
    pub unit: String,
}

/// One entry of the batch stock update (`PUT /ingredient`).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockUpdate {
    pub id: String,
    #[serde(default)]
    #[ts(type = "number | string | null")]
    pub quantity: Option<QuantityInput>,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product (dish, drink, or addition).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub category: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Additions are extras attached to a dish, not dishes themselves.
    pub fn is_addition(&self) -> bool {
        is_additions_category(&self.category)
    }
}

/// Case-insensitive check against [`ADDITIONS_CATEGORY`].
pub fn is_additions_category(category: &str) -> bool {
    category.trim().eq_ignore_ascii_case(ADDITIONS_CATEGORY)
}

/// Join row between a product and one of its ingredients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductIngredient {
    pub product_id: String,
    pub ingredient_id: String,
    /// Amount of the ingredient used by one unit of the product.
    pub quantity: f64,
}

/// A product's ingredient with the ingredient's current stock joined in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductIngredientDetail {
    pub ingredient_id: String,
    pub name: String,
    pub unit: String,
    pub quantity: f64,
    pub stock: Option<f64>,
}

/// Product read model with its ingredient list.
///
/// ## Stock of simple resale items
/// ```text
/// Product "Club Colombia"  ──►  1 ingredient "Club Colombia botella" (24)
///                                     │
///                                     ▼
///                         stock = 24, trackedStock = true
///
/// Product "Hamburguesa"    ──►  pan, carne, queso ...
///                                     │
///                                     ▼
///                         stock = null, trackedStock = false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub ingredients: Vec<ProductIngredientDetail>,
    /// Stock of the single linked ingredient, if the product has exactly one.
    pub stock: Option<f64>,
    /// Whether `stock` is meaningful for this product.
    pub tracked_stock: bool,
}

impl ProductDetail {
    /// Builds the read model, deriving stock from a single-ingredient link.
    pub fn new(product: Product, ingredients: Vec<ProductIngredientDetail>) -> Self {
        let (stock, tracked_stock) = match ingredients.as_slice() {
            [only] => (only.stock, true),
            _ => (None, false),
        };
        ProductDetail {
            product,
            ingredients,
            stock,
            tracked_stock,
        }
    }
}

/// Ingredient reference inside a product body.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductIngredientInput {
    pub ingredient_id: String,
    pub quantity: f64,
}

/// Body for creating or editing a product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Money,
    pub category: String,
    #[serde(default)]
    pub ingredients: Vec<ProductIngredientInput>,
}

// =============================================================================
// Sale Status
// =============================================================================

/// Ticket status, in the order a table moves through it.
///
/// ```text
/// en proceso ──► en mesa ──► pagada
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum SaleStatus {
    /// Order taken, kitchen working on it.
    #[default]
    #[serde(rename = "en proceso")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "en proceso"))]
    InProgress,
    /// Served at the table.
    #[serde(rename = "en mesa")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "en mesa"))]
    AtTable,
    /// Paid and closed.
    #[serde(rename = "pagada")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "pagada"))]
    Paid,
}

impl SaleStatus {
    pub const ALL: [SaleStatus; 3] = [SaleStatus::InProgress, SaleStatus::AtTable, SaleStatus::Paid];

    /// The stored/wire literal.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::InProgress => "en proceso",
            SaleStatus::AtTable => "en mesa",
            SaleStatus::Paid => "pagada",
        }
    }

    const fn rank(&self) -> u8 {
        match self {
            SaleStatus::InProgress => 0,
            SaleStatus::AtTable => 1,
            SaleStatus::Paid => 2,
        }
    }

    /// Staying put or moving exactly one step forward. Skipping a step
    /// and going back are both rejected.
    pub const fn can_advance_to(&self, next: SaleStatus) -> bool {
        next.rank() == self.rank() || next.rank() == self.rank() + 1
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SaleStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SaleStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or(())
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A table ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    pub id: String,
    pub total_amount: Money,
    pub status: SaleStatus,
    pub table_number: String,
    pub general_observation: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A ticket line. References the catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleProduct {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub observation: Option<String>,
}

/// An extra charged on one ticket line. Name and price are a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleProductAddition {
    pub id: String,
    pub sale_product_id: String,
    pub name: String,
    pub price: Money,
}

/// Ticket line with the product's current name/price and its additions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleProductDetail {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub product_price: Money,
    pub quantity: i64,
    pub observation: Option<String>,
    pub additions: Vec<SaleProductAddition>,
}

/// A sale aggregate as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleDetail {
    #[serde(flatten)]
    pub sale: Sale,
    pub products: Vec<SaleProductDetail>,
}

/// An addition as submitted with a ticket line.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AdditionInput {
    pub name: String,
    pub price: Money,
}

/// A ticket line as submitted.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleProductInput {
    pub product_id: String,
    pub quantity: i64,
    #[serde(default)]
    pub observation: Option<String>,
    #[serde(default)]
    pub additions: Vec<AdditionInput>,
}

/// Body for creating or replacing a sale aggregate.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleInput {
    pub table_number: String,
    /// Defaults to `en proceso` on create; keeps the current status on replace.
    #[serde(default)]
    pub status: Option<SaleStatus>,
    #[serde(default)]
    pub general_observation: Option<String>,
    pub total_amount: Money,
    #[serde(default)]
    pub products: Vec<SaleProductInput>,
}

// =============================================================================
// Provider
// =============================================================================

/// A supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Provider {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub account_number: Option<String>,
    /// Only needed for WhatsApp ordering.
    pub phone: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Body for creating a provider.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProviderInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Body for `PUT /providers`: the id travels with the fields.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProviderUpdate {
    pub id: String,
    #[serde(flatten)]
    pub fields: ProviderInput,
}

/// Provider plus derived balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProviderSummary {
    #[serde(flatten)]
    pub provider: Provider,
    pub balance: Money,
}

/// Provider plus balance and associated ingredients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProviderDetail {
    #[serde(flatten)]
    pub provider: Provider,
    pub balance: Money,
    pub ingredients: Vec<Ingredient>,
}

// =============================================================================
// Provider Movement
// =============================================================================

/// Ledger entry kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum MovementType {
    /// Goods received on credit: increases what we owe.
    Invoice,
    /// Money paid to the provider: decreases what we owe.
    Payment,
}

/// An immutable ledger entry against a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProviderMovement {
    pub id: String,
    pub provider_id: String,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub amount: Money,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl ProviderMovement {
    /// Effect of this entry on the balance owed.
    pub fn signed_amount(&self) -> Money {
        match self.movement_type {
            MovementType::Invoice => self.amount,
            MovementType::Payment => -self.amount,
        }
    }
}

/// Body for recording a movement.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MovementInput {
    pub provider_id: String,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub amount: Money,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// When the invoice/payment happened; defaults to now.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub occurred_at: Option<DateTime<Utc>>,
}

/// A movement with the balance right after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LedgerEntry {
    #[serde(flatten)]
    pub movement: ProviderMovement,
    pub running_balance: Money,
}

/// A provider's full ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProviderLedger {
    pub provider_id: String,
    pub balance: Money,
    pub movements: Vec<LedgerEntry>,
}

// =============================================================================
// Alerts & Subscriptions
// =============================================================================

/// A reminder pushed to staff devices.
///
/// Either one-time (`alert_time`) or weekly (`repeat_weekly` + `repeat_day`,
/// 0 = Sunday .. 6 = Saturday).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Alert {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    #[ts(as = "Option<String>")]
    pub alert_time: Option<DateTime<Utc>>,
    pub repeat_weekly: bool,
    pub repeat_day: Option<u32>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Body for creating an alert.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AlertInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub alert_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub repeat_weekly: bool,
    #[serde(default)]
    pub repeat_day: Option<u32>,
}

/// Web-push credential pair of a browser subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PushKeys {
    pub p256dh: String,
    pub auth: String,
}

/// A registered browser/device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Subscription {
    pub id: String,
    pub endpoint: String,
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub keys: PushKeys,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Body for registering a subscription (the browser's PushSubscription JSON).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SubscriptionInput {
    pub endpoint: String,
    pub keys: PushKeys,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient_detail(stock: Option<f64>) -> ProductIngredientDetail {
        ProductIngredientDetail {
            ingredient_id: "i-1".to_string(),
            name: "Club Colombia botella".to_string(),
            unit: "botella".to_string(),
            quantity: 1.0,
            stock,
        }
    }

    fn product(category: &str) -> Product {
        Product {
            id: "p-1".to_string(),
            name: "Club Colombia".to_string(),
            description: None,
            price: Money::from_pesos(8_000),
            category: category.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_sale_status_literals_round_trip() {
        for status in SaleStatus::ALL {
            assert_eq!(status.as_str().parse::<SaleStatus>(), Ok(status));
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        assert!("PAGADA".parse::<SaleStatus>().is_err());
        assert_eq!(SaleStatus::default(), SaleStatus::InProgress);
    }

    #[test]
    fn test_status_only_moves_forward() {
        assert!(SaleStatus::InProgress.can_advance_to(SaleStatus::AtTable));
        assert!(!SaleStatus::InProgress.can_advance_to(SaleStatus::Paid));
        assert!(SaleStatus::AtTable.can_advance_to(SaleStatus::AtTable));
        assert!(SaleStatus::AtTable.can_advance_to(SaleStatus::Paid));
        assert!(SaleStatus::Paid.can_advance_to(SaleStatus::Paid));
        assert!(!SaleStatus::Paid.can_advance_to(SaleStatus::AtTable));
        assert!(!SaleStatus::AtTable.can_advance_to(SaleStatus::InProgress));
    }

    #[test]
    fn test_single_ingredient_product_reports_stock() {
        let detail = ProductDetail::new(product("Cervezas"), vec![ingredient_detail(Some(24.0))]);
        assert!(detail.tracked_stock);
        assert_eq!(detail.stock, Some(24.0));

        let insufficient = ProductDetail::new(product("Cervezas"), vec![ingredient_detail(None)]);
        assert!(insufficient.tracked_stock);
        assert_eq!(insufficient.stock, None);

        let composed = ProductDetail::new(
            product("Platos"),
            vec![ingredient_detail(Some(3.0)), ingredient_detail(Some(5.0))],
        );
        assert!(!composed.tracked_stock);
        assert_eq!(composed.stock, None);
    }

    #[test]
    fn test_additions_category_is_case_insensitive() {
        assert!(product("Adiciones").is_addition());
        assert!(product(" adiciones ").is_addition());
        assert!(!product("Platos fuertes").is_addition());
    }

    #[test]
    fn test_movement_signed_amount() {
        let mut movement = ProviderMovement {
            id: "m-1".to_string(),
            provider_id: "p-1".to_string(),
            movement_type: MovementType::Invoice,
            amount: Money::from_pesos(100),
            description: None,
            image_url: None,
            created_at: Utc::now(),
        };
        assert_eq!(movement.signed_amount(), Money::from_pesos(100));
        movement.movement_type = MovementType::Payment;
        assert_eq!(movement.signed_amount(), Money::from_pesos(-100));
    }

    #[test]
    fn test_movement_type_wire_format() {
        let json = serde_json::to_string(&MovementType::Invoice).unwrap();
        assert_eq!(json, "\"INVOICE\"");
        let parsed: MovementType = serde_json::from_str("\"PAYMENT\"").unwrap();
        assert_eq!(parsed, MovementType::Payment);
    }

    #[test]
    fn test_quantity_input_accepts_number_or_text() {
        let update: StockUpdate =
            serde_json::from_str(r#"{"id":"a","quantity":"insuficiente"}"#).unwrap();
        assert_eq!(update.quantity, Some(QuantityInput::Text("insuficiente".to_string())));

        let update: StockUpdate = serde_json::from_str(r#"{"id":"a","quantity":2.5}"#).unwrap();
        assert_eq!(update.quantity, Some(QuantityInput::Number(2.5)));

        let update: StockUpdate = serde_json::from_str(r#"{"id":"a","quantity":null}"#).unwrap();
        assert_eq!(update.quantity, None);
    }
}
