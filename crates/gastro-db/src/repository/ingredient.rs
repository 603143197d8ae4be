//! # Ingredient Repository
//!
//! Inventory of stocked ingredients.
//!
//! ## Stock Sentinel
//! ```text
//! ┌───────────────────────┬──────────────────┬──────────────────────────┐
//! │ Screen sends          │ Column stores    │ API returns              │
//! ├───────────────────────┼──────────────────┼──────────────────────────┤
//! │ 12 / "12"             │ 12.0             │ "quantity": 12.0         │
//! │ 0                     │ 0.0              │ "quantity": 0.0          │
//! │ "insuficiente" / null │ NULL             │ "quantity": null         │
//! │ -3                    │ (rejected, 400)  │                          │
//! └───────────────────────┴──────────────────┴──────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::new_id;
use crate::error::{DbError, DbResult};
use gastro_core::validation::{parse_stock_quantity, validate_id, validate_ingredient_input};
use gastro_core::{Ingredient, IngredientInput, StockUpdate};

const SELECT_INGREDIENT: &str = r#"
    SELECT id, name, description, quantity, price, unit, updated_at
    FROM ingredients
"#;

/// Repository for ingredient database operations.
#[derive(Debug, Clone)]
pub struct IngredientRepository {
    pool: SqlitePool,
}

impl IngredientRepository {
    /// Creates a new IngredientRepository.
    pub fn new(pool: SqlitePool) -> Self {
        IngredientRepository { pool }
    }

    /// All ingredients, alphabetical.
    pub async fn list(&self) -> DbResult<Vec<Ingredient>> {
        let ingredients = sqlx::query_as::<_, Ingredient>(&format!(
            "{} ORDER BY name COLLATE NOCASE",
            SELECT_INGREDIENT
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(ingredients)
    }

    /// Gets an ingredient by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Ingredient> {
        sqlx::query_as::<_, Ingredient>(&format!("{} WHERE id = ?1", SELECT_INGREDIENT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Ingredient", id))
    }

    /// Creates an ingredient.
    pub async fn create(&self, input: &IngredientInput) -> DbResult<Ingredient> {
        let quantity = validate_ingredient_input(input)?;
        let id = new_id();
        let now = Utc::now();

        debug!(id = %id, name = %input.name, ?quantity, "Creating ingredient");

        sqlx::query(
            r#"
            INSERT INTO ingredients (id, name, description, quantity, price, unit, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&id)
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(quantity)
        .bind(input.price)
        .bind(input.unit.trim())
        .bind(now)
        .execute(&self.pool)
        .await?;

        info!(id = %id, name = %input.name, "Ingredient created");
        self.get_by_id(&id).await
    }

    /// Edits name, description, stock, price and unit.
    pub async fn update(&self, id: &str, input: &IngredientInput) -> DbResult<Ingredient> {
        validate_id("id", id)?;
        let quantity = validate_ingredient_input(input)?;

        let result = sqlx::query(
            r#"
            UPDATE ingredients SET
                name = ?2,
                description = ?3,
                quantity = ?4,
                price = ?5,
                unit = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(quantity)
        .bind(input.price)
        .bind(input.unit.trim())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Ingredient", id));
        }

        self.get_by_id(id).await
    }

    /// Applies a batch of stock updates atomically.
    ///
    /// Every entry is parsed before the transaction opens; an unknown id
    /// aborts the whole batch.
    pub async fn update_stock(&self, updates: &[StockUpdate]) -> DbResult<Vec<Ingredient>> {
        let mut parsed = Vec::with_capacity(updates.len());
        for update in updates {
            validate_id("id", &update.id)?;
            parsed.push((
                update.id.as_str(),
                parse_stock_quantity(update.quantity.as_ref())?,
            ));
        }

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        for (id, quantity) in &parsed {
            let result =
                sqlx::query("UPDATE ingredients SET quantity = ?2, updated_at = ?3 WHERE id = ?1")
                    .bind(*id)
                    .bind(*quantity)
                    .bind(now)
                    .execute(&mut *tx)
                    .await?;

            if result.rows_affected() == 0 {
                return Err(DbError::not_found("Ingredient", *id));
            }
        }

        tx.commit().await?;
        info!(count = parsed.len(), "Stock updated");

        let mut updated = Vec::with_capacity(parsed.len());
        for (id, _) in parsed {
            updated.push(self.get_by_id(id).await?);
        }
        Ok(updated)
    }

    /// Deletes an ingredient. Fails with Conflict while a product uses it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM ingredients WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Ingredient", id));
        }

        info!(id = %id, "Ingredient deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::error::DbError;
    use crate::{Database, DbConfig};
    use gastro_core::{IngredientInput, Money, QuantityInput, StockUpdate};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn input(name: &str, quantity: Option<QuantityInput>) -> IngredientInput {
        IngredientInput {
            name: name.to_string(),
            description: None,
            quantity,
            price: Money::from_pesos(3_500),
            unit: "kg".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insuficiente_is_stored_as_null() {
        let db = db().await;
        let repo = db.ingredients();

        let lemon = repo
            .create(&input("Limon", Some(QuantityInput::Text("insuficiente".into()))))
            .await
            .unwrap();
        assert_eq!(lemon.quantity, None);

        let fetched = repo.get_by_id(&lemon.id).await.unwrap();
        assert!(fetched.is_insufficient());

        let salt = repo
            .create(&input("Sal", Some(QuantityInput::Number(0.0))))
            .await
            .unwrap();
        assert_eq!(salt.quantity, Some(0.0));
    }

    #[tokio::test]
    async fn test_negative_quantity_is_rejected() {
        let db = db().await;
        let err = db
            .ingredients()
            .create(&input("Hielo", Some(QuantityInput::Number(-1.0))))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
        assert!(db.ingredients().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_batch_stock_update() {
        let db = db().await;
        let repo = db.ingredients();
        let a = repo.create(&input("Limon", None)).await.unwrap();
        let b = repo
            .create(&input("Sal", Some(QuantityInput::Number(2.0))))
            .await
            .unwrap();

        let updated = repo
            .update_stock(&[
                StockUpdate {
                    id: a.id.clone(),
                    quantity: Some(QuantityInput::Text("12".into())),
                },
                StockUpdate {
                    id: b.id.clone(),
                    quantity: Some(QuantityInput::Text(" Insuficiente ".into())),
                },
            ])
            .await
            .unwrap();

        assert_eq!(updated[0].quantity, Some(12.0));
        assert_eq!(updated[1].quantity, None);
    }

    #[tokio::test]
    async fn test_batch_with_unknown_id_rolls_back() {
        let db = db().await;
        let repo = db.ingredients();
        let a = repo
            .create(&input("Limon", Some(QuantityInput::Number(5.0))))
            .await
            .unwrap();

        let err = repo
            .update_stock(&[
                StockUpdate {
                    id: a.id.clone(),
                    quantity: Some(QuantityInput::Number(1.0)),
                },
                StockUpdate {
                    id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
                    quantity: Some(QuantityInput::Number(1.0)),
                },
            ])
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::NotFound { .. }));
        assert_eq!(repo.get_by_id(&a.id).await.unwrap().quantity, Some(5.0));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = db().await;
        let repo = db.ingredients();
        let a = repo.create(&input("Limon", None)).await.unwrap();

        let mut edit = input("Limon tahiti", Some(QuantityInput::Number(3.0)));
        edit.unit = "und".to_string();
        let edited = repo.update(&a.id, &edit).await.unwrap();
        assert_eq!(edited.name, "Limon tahiti");
        assert_eq!(edited.unit, "und");

        repo.delete(&a.id).await.unwrap();
        assert!(matches!(
            repo.delete(&a.id).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }
}
