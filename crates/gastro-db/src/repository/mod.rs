//! # Repository Module
//!
//! Database repositories for the gastrobar back office.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.sales().replace(id, &input)                                │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── create / replace / delete   (one transaction each)                │
//! │  ├── get_by_id / list_updated_between                                  │
//! │  └── update_status                                                     │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite                                                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`SaleRepository`](sale::SaleRepository) - Sale aggregates and report rows
//! - [`IngredientRepository`](ingredient::IngredientRepository) - Inventory
//! - [`ProductRepository`](product::ProductRepository) - Catalog with recipes
//! - [`ProviderRepository`](provider::ProviderRepository) - Providers and ledger
//! - [`AlertRepository`](alert::AlertRepository) - Alerts and push subscriptions

pub mod alert;
pub mod ingredient;
pub mod product;
pub mod provider;
pub mod sale;

/// New server-generated id.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
