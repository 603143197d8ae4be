//! # gastro-core: Pure Business Logic for the Gastrobar POS
//!
//! Domain types and rules with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Gastrobar POS Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (React)                             │   │
//! │  │    Tables ──► Ticket editor ──► Inventory ──► Reports          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP / JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/api (axum handlers)                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ gastro-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │  types   │ │ calendar │ │  report  │ │  ledger  │          │   │
//! │  │   │  Sale    │ │ business │ │ moving   │ │ balance  │          │   │
//! │  │   │  Product │ │   day    │ │ average  │ │          │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │  money   │ │validation│ │  alerts  │ │ ordering │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • NO SYSTEM CLOCK           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    gastro-db (Database Layer)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain entities (Sale, Product, Ingredient, Provider, ...)
//! - [`money`] - Integer peso amounts
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//! - [`calendar`] - Calendar day vs business day
//! - [`report`] - Daily totals, moving averages, variation
//! - [`ledger`] - Provider balances
//! - [`alerts`] - Which alerts are due today
//! - [`ordering`] - WhatsApp order links for providers
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{FixedOffset, TimeZone, Utc};
//! use gastro_core::calendar::BusinessClock;
//!
//! let clock = BusinessClock::new(FixedOffset::west_opt(5 * 3600).unwrap(), 6);
//!
//! // 02:30 local belongs to the previous business day
//! let late = clock.offset().with_ymd_and_hms(2024, 6, 10, 2, 30, 0).unwrap();
//! assert_eq!(
//!     clock.business_day(late.with_timezone(&Utc)).to_string(),
//!     "2024-06-09"
//! );
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod alerts;
pub mod calendar;
pub mod error;
pub mod ledger;
pub mod money;
pub mod ordering;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use calendar::BusinessClock;
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Product category whose items are extras attached to a sold dish
/// rather than dishes of their own.
pub const ADDITIONS_CATEGORY: &str = "Adiciones";

/// Literal the inventory screen sends instead of a number when stock
/// has run out or is unknown. Stored as NULL.
pub const INSUFFICIENT_STOCK_LITERAL: &str = "insuficiente";

/// Maximum quantity of one product on a single ticket line.
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Hour (local) at which a new business day starts.
pub const DEFAULT_BUSINESS_DAY_START_HOUR: u32 = 6;

/// Largest moving-average window the report accepts.
pub const MAX_MOVING_AVERAGE_WINDOW: usize = 90;
