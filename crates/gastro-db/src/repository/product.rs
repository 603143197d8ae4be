//! # Product Repository
//!
//! Catalog products and their ingredient recipes.
//!
//! ## Recipe Edits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  update(product_id, input)           (one transaction)                  │
//! │                                                                         │
//! │   1. UPDATE products SET ...          (NotFound if 0 rows)              │
//! │   2. DELETE FROM product_ingredients WHERE product_id = ?               │
//! │   3. INSERT one row per input.ingredients entry                         │
//! │   4. COMMIT                                                             │
//! │                                                                         │
//! │  Links are recreated wholesale; there is no diffing.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use super::new_id;
use crate::error::{DbError, DbResult};
use gastro_core::validation::{validate_id, validate_product_input};
use gastro_core::{
    Product, ProductDetail, ProductIngredientDetail, ProductIngredientInput, ProductInput,
    ADDITIONS_CATEGORY,
};

const SELECT_PRODUCT: &str = r#"
    SELECT id, name, description, price, category, created_at, updated_at
    FROM products
"#;

const SELECT_LINKS: &str = r#"
    SELECT
        pi.product_id,
        pi.ingredient_id,
        i.name,
        i.unit,
        pi.quantity,
        i.quantity AS stock
    FROM product_ingredients pi
    JOIN ingredients i ON i.id = pi.ingredient_id
"#;

#[derive(sqlx::FromRow)]
struct LinkRow {
    product_id: String,
    #[sqlx(flatten)]
    detail: ProductIngredientDetail,
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products with their recipes, optionally filtered by category
    /// (case-insensitive).
    pub async fn list(&self, category: Option<&str>) -> DbResult<Vec<ProductDetail>> {
        let products = match category.map(str::trim).filter(|c| !c.is_empty()) {
            Some(category) => {
                sqlx::query_as::<_, Product>(&format!(
                    "{} WHERE lower(trim(category)) = lower(?1) ORDER BY name COLLATE NOCASE",
                    SELECT_PRODUCT
                ))
                .bind(category)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Product>(&format!(
                    "{} ORDER BY category, name COLLATE NOCASE",
                    SELECT_PRODUCT
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        self.with_links(products).await
    }

    /// The "Adiciones" catalog: extras offered when adding an addition to
    /// a ticket line.
    pub async fn additions(&self) -> DbResult<Vec<ProductDetail>> {
        self.list(Some(ADDITIONS_CATEGORY)).await
    }

    /// Gets a product with its recipe.
    pub async fn get_by_id(&self, id: &str) -> DbResult<ProductDetail> {
        let product = sqlx::query_as::<_, Product>(&format!("{} WHERE id = ?1", SELECT_PRODUCT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?;

        let links = sqlx::query_as::<_, ProductIngredientDetail>(&format!(
            "{} WHERE pi.product_id = ?1 ORDER BY i.name COLLATE NOCASE",
            SELECT_LINKS
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ProductDetail::new(product, links))
    }

    /// Creates a product and its ingredient links.
    pub async fn create(&self, input: &ProductInput) -> DbResult<ProductDetail> {
        validate_product_input(input)?;
        let id = new_id();
        let now = Utc::now();

        debug!(id = %id, name = %input.name, links = input.ingredients.len(), "Creating product");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price, category, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            "#,
        )
        .bind(&id)
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(input.price)
        .bind(input.category.trim())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        insert_links(&mut tx, &id, &input.ingredients).await?;

        tx.commit().await?;
        info!(id = %id, name = %input.name, "Product created");

        self.get_by_id(&id).await
    }

    /// Updates a product and replaces its ingredient links.
    pub async fn update(&self, id: &str, input: &ProductInput) -> DbResult<ProductDetail> {
        validate_id("id", id)?;
        validate_product_input(input)?;

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                price = ?4,
                category = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(input.price)
        .bind(input.category.trim())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        sqlx::query("DELETE FROM product_ingredients WHERE product_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        insert_links(&mut tx, id, &input.ingredients).await?;

        tx.commit().await?;
        info!(id = %id, links = input.ingredients.len(), "Product updated");

        self.get_by_id(id).await
    }

    /// Deletes a product. Fails with Conflict while a sale references it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        info!(id = %id, "Product deleted");
        Ok(())
    }

    /// Number of products (used by the seed binary).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn with_links(&self, products: Vec<Product>) -> DbResult<Vec<ProductDetail>> {
        let rows = sqlx::query_as::<_, LinkRow>(&format!(
            "{} ORDER BY i.name COLLATE NOCASE",
            SELECT_LINKS
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut links: HashMap<String, Vec<ProductIngredientDetail>> = HashMap::new();
        for row in rows {
            links.entry(row.product_id).or_default().push(row.detail);
        }

        Ok(products
            .into_iter()
            .map(|product| {
                let recipe = links.remove(&product.id).unwrap_or_default();
                ProductDetail::new(product, recipe)
            })
            .collect())
    }
}

/// Inserts recipe links, reporting an unknown ingredient as NotFound.
async fn insert_links(
    conn: &mut SqliteConnection,
    product_id: &str,
    links: &[ProductIngredientInput],
) -> DbResult<()> {
    for link in links {
        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ingredients WHERE id = ?1")
            .bind(&link.ingredient_id)
            .fetch_one(&mut *conn)
            .await?;
        if exists == 0 {
            return Err(DbError::not_found("Ingredient", &link.ingredient_id));
        }

        sqlx::query(
            "INSERT INTO product_ingredients (product_id, ingredient_id, quantity) VALUES (?1, ?2, ?3)",
        )
        .bind(product_id)
        .bind(&link.ingredient_id)
        .bind(link.quantity)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
