//! # Sale Repository
//!
//! Database operations for sale aggregates (tickets).
//!
//! ## Aggregate Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Aggregate                                    │
//! │                                                                         │
//! │  1. CREATE                                  (one transaction)          │
//! │     └── INSERT sales                                                   │
//! │     └── INSERT sale_products          per line                         │
//! │     └── INSERT sale_product_additions per addition (snapshot)          │
//! │                                                                         │
//! │  2. REPLACE (waiter edits the ticket)       (one transaction)          │
//! │     └── DELETE additions → DELETE lines                                │
//! │     └── UPDATE sales in place (id + created_at kept)                   │
//! │     └── INSERT lines + additions as in CREATE                          │
//! │                                                                         │
//! │  3. STATUS   en proceso ──► en mesa ──► pagada   (forward only)        │
//! │                                                                         │
//! │  4. DELETE                                  (one transaction)          │
//! │     └── additions → lines → sale                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Children are always removed before their parent; the schema's
//! `ON DELETE CASCADE` is a second line, not the mechanism.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use super::new_id;
use crate::error::{DbError, DbResult};
use gastro_core::report::SaleAmount;
use gastro_core::validation::{validate_id, validate_sale_input};
use gastro_core::{
    CoreError, Sale, SaleDetail, SaleInput, SaleProductAddition, SaleProductDetail,
    SaleProductInput, SaleStatus,
};

const SELECT_SALE: &str = r#"
    SELECT id, total_amount, status, table_number, general_observation, created_at, updated_at
    FROM sales
"#;

/// Ticket line joined with the product's current name and price.
#[derive(sqlx::FromRow)]
struct LineRow {
    id: String,
    product_id: String,
    product_name: String,
    product_price: gastro_core::Money,
    quantity: i64,
    observation: Option<String>,
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale with its lines and additions.
    pub async fn get_by_id(&self, id: &str) -> DbResult<SaleDetail> {
        let sale = self.get_sale(id).await?;
        let products = self.lines_of(&sale.id).await?;
        Ok(SaleDetail { sale, products })
    }

    /// Gets the sale row only.
    pub async fn get_sale(&self, id: &str) -> DbResult<Sale> {
        validate_id("id", id)?;
        sqlx::query_as::<_, Sale>(&format!("{} WHERE id = ?1", SELECT_SALE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", id))
    }

    /// Sales whose `updated_at` lies in `[start, end)`, newest first.
    ///
    /// The HTTP layer passes the bounds of the local calendar day.
    pub async fn list_updated_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<SaleDetail>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            "{} WHERE updated_at >= ?1 AND updated_at < ?2 ORDER BY updated_at DESC",
            SELECT_SALE
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = sales.len(), %start, %end, "Listed sales");

        let mut details = Vec::with_capacity(sales.len());
        for sale in sales {
            let products = self.lines_of(&sale.id).await?;
            details.push(SaleDetail { sale, products });
        }
        Ok(details)
    }

    /// `created_at` and `total_amount` of every sale created at or after
    /// `since`, oldest first. Input of the daily report.
    pub async fn amounts_since(&self, since: DateTime<Utc>) -> DbResult<Vec<SaleAmount>> {
        let rows = sqlx::query_as::<_, SaleAmount>(
            "SELECT created_at, total_amount FROM sales WHERE created_at >= ?1 ORDER BY created_at",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Creates a sale aggregate in one transaction.
    ///
    /// ## Errors
    /// - `Validation` when `products` is empty or a line is malformed;
    ///   nothing is written
    /// - `NotFound` when a line references an unknown product
    pub async fn create(&self, input: &SaleInput) -> DbResult<SaleDetail> {
        validate_sale_input(input)?;

        let id = new_id();
        let now = Utc::now();
        let status = input.status.unwrap_or_default();

        debug!(id = %id, table = %input.table_number, lines = input.products.len(), "Creating sale");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, total_amount, status, table_number, general_observation,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            "#,
        )
        .bind(&id)
        .bind(input.total_amount)
        .bind(status)
        .bind(input.table_number.trim())
        .bind(&input.general_observation)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        insert_lines(&mut tx, &id, &input.products).await?;

        tx.commit().await?;
        info!(id = %id, table = %input.table_number, total = %input.total_amount, "Sale created");

        self.get_by_id(&id).await
    }

    /// Replaces a sale aggregate, keeping its id and `created_at`.
    ///
    /// A missing `status` keeps the current one; a skipped or backward
    /// status is rejected like in [`update_status`](Self::update_status). Any failure
    /// rolls back and leaves the original ticket untouched.
    pub async fn replace(&self, id: &str, input: &SaleInput) -> DbResult<SaleDetail> {
        validate_id("id", id)?;
        validate_sale_input(input)?;

        let mut tx = self.pool.begin().await?;

        let current: SaleStatus = sqlx::query_scalar("SELECT status FROM sales WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", id))?;

        let status = input.status.unwrap_or(current);
        if !current.can_advance_to(status) {
            return Err(CoreError::InvalidStatusTransition {
                sale_id: id.to_string(),
                from: current,
                to: status,
            }
            .into());
        }

        delete_children(&mut tx, id).await?;

        sqlx::query(
            r#"
            UPDATE sales SET
                total_amount = ?2,
                status = ?3,
                table_number = ?4,
                general_observation = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(input.total_amount)
        .bind(status)
        .bind(input.table_number.trim())
        .bind(&input.general_observation)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        insert_lines(&mut tx, id, &input.products).await?;

        tx.commit().await?;
        info!(id = %id, lines = input.products.len(), "Sale replaced");

        self.get_by_id(id).await
    }

    /// Deletes a sale aggregate: additions, then lines, then the sale.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        validate_id("id", id)?;
        let mut tx = self.pool.begin().await?;

        delete_children(&mut tx, id).await?;

        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        tx.commit().await?;
        info!(id = %id, "Sale deleted");
        Ok(())
    }

    /// Moves a sale forward along `en proceso → en mesa → pagada`.
    ///
    /// Same status is a no-op; skipping a step or moving back fails with
    /// [`CoreError::InvalidStatusTransition`].
    pub async fn update_status(&self, id: &str, status: SaleStatus) -> DbResult<Sale> {
        validate_id("id", id)?;
        let mut tx = self.pool.begin().await?;

        let sale = sqlx::query_as::<_, Sale>(&format!("{} WHERE id = ?1", SELECT_SALE))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", id))?;

        if !sale.status.can_advance_to(status) {
            return Err(CoreError::InvalidStatusTransition {
                sale_id: id.to_string(),
                from: sale.status,
                to: status,
            }
            .into());
        }

        if sale.status == status {
            debug!(id = %id, %status, "Status unchanged");
            return Ok(sale);
        }

        let now = Utc::now();
        sqlx::query("UPDATE sales SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(id = %id, from = %sale.status, to = %status, "Sale status updated");

        Ok(Sale {
            status,
            updated_at: now,
            ..sale
        })
    }

    /// Number of sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn lines_of(&self, sale_id: &str) -> DbResult<Vec<SaleProductDetail>> {
        let lines = sqlx::query_as::<_, LineRow>(
            r#"
            SELECT
                sp.id,
                sp.product_id,
                p.name AS product_name,
                p.price AS product_price,
                sp.quantity,
                sp.observation
            FROM sale_products sp
            JOIN products p ON p.id = sp.product_id
            WHERE sp.sale_id = ?1
            ORDER BY sp.position
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        let additions = sqlx::query_as::<_, SaleProductAddition>(
            r#"
            SELECT a.id, a.sale_product_id, a.name, a.price
            FROM sale_product_additions a
            JOIN sale_products sp ON sp.id = a.sale_product_id
            WHERE sp.sale_id = ?1
            ORDER BY a.position
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        let mut by_line: HashMap<String, Vec<SaleProductAddition>> = HashMap::new();
        for addition in additions {
            by_line
                .entry(addition.sale_product_id.clone())
                .or_default()
                .push(addition);
        }

        Ok(lines
            .into_iter()
            .map(|line| SaleProductDetail {
                additions: by_line.remove(&line.id).unwrap_or_default(),
                id: line.id,
                product_id: line.product_id,
                product_name: line.product_name,
                product_price: line.product_price,
                quantity: line.quantity,
                observation: line.observation,
            })
            .collect())
    }
}

// =============================================================================
// Transaction Helpers
// =============================================================================

/// Inserts ticket lines and their additions, in order.
async fn insert_lines(
    conn: &mut SqliteConnection,
    sale_id: &str,
    lines: &[SaleProductInput],
) -> DbResult<()> {
    for (position, line) in lines.iter().enumerate() {
        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE id = ?1")
            .bind(&line.product_id)
            .fetch_one(&mut *conn)
            .await?;
        if exists == 0 {
            return Err(DbError::not_found("Product", &line.product_id));
        }

        let line_id = new_id();
        sqlx::query(
            r#"
            INSERT INTO sale_products (id, sale_id, product_id, quantity, observation, position)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&line_id)
        .bind(sale_id)
        .bind(&line.product_id)
        .bind(line.quantity)
        .bind(&line.observation)
        .bind(position as i64)
        .execute(&mut *conn)
        .await?;

        for (addition_position, addition) in line.additions.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO sale_product_additions (id, sale_product_id, name, price, position)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(new_id())
            .bind(&line_id)
            .bind(addition.name.trim())
            .bind(addition.price)
            .bind(addition_position as i64)
            .execute(&mut *conn)
            .await?;
        }
    }
    Ok(())
}

/// Removes additions, then lines, of one sale.
async fn delete_children(conn: &mut SqliteConnection, sale_id: &str) -> DbResult<()> {
    sqlx::query(
        r#"
        DELETE FROM sale_product_additions
        WHERE sale_product_id IN (SELECT id FROM sale_products WHERE sale_id = ?1)
        "#,
    )
    .bind(sale_id)
    .execute(&mut *conn)
    .await?;

    sqlx::query("DELETE FROM sale_products WHERE sale_id = ?1")
        .bind(sale_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
