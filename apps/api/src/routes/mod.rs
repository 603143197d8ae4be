//! Route handlers, one module per screen of the back office.

pub mod alerts;
pub mod health;
pub mod ingredients;
pub mod products;
pub mod providers;
pub mod sales;

use serde::Deserialize;

/// `?id=` on DELETE routes.
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: String,
}
