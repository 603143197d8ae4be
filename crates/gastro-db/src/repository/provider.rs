//! # Provider Repository
//!
//! Providers, their ingredient associations and the append-only movement
//! ledger.
//!
//! ## Ledger Storage
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  provider_movements                                                     │
//! │  ┌──────────┬─────────┬────────┬─────────────────────┐                  │
//! │  │ provider │ type    │ amount │ created_at          │                  │
//! │  ├──────────┼─────────┼────────┼─────────────────────┤                  │
//! │  │ p-1      │ INVOICE │ 100    │ 2024-06-01T12:00Z   │                  │
//! │  │ p-1      │ PAYMENT │  40    │ 2024-06-02T12:00Z   │                  │
//! │  └──────────┴─────────┴────────┴─────────────────────┘                  │
//! │                                                                         │
//! │  INSERT or DELETE only. Balances are computed by gastro_core::ledger    │
//! │  every time they are read; nothing caches them.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use super::new_id;
use crate::error::{DbError, DbResult};
use gastro_core::ledger::{balance, build_ledger};
use gastro_core::validation::{validate_id, validate_movement_input, validate_provider_input};
use gastro_core::{
    Ingredient, MovementInput, Provider, ProviderDetail, ProviderInput, ProviderLedger,
    ProviderMovement, ProviderSummary, ProviderUpdate,
};

const SELECT_PROVIDER: &str = r#"
    SELECT id, name, description, account_number, phone, created_at
    FROM providers
"#;

const SELECT_MOVEMENT: &str = r#"
    SELECT id, provider_id, movement_type, amount, description, image_url, created_at
    FROM provider_movements
"#;

/// Repository for provider database operations.
#[derive(Debug, Clone)]
pub struct ProviderRepository {
    pool: SqlitePool,
}

impl ProviderRepository {
    /// Creates a new ProviderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProviderRepository { pool }
    }

    // =========================================================================
    // Providers
    // =========================================================================

    /// All providers with their current balance, alphabetical.
    pub async fn list(&self) -> DbResult<Vec<ProviderSummary>> {
        let providers = sqlx::query_as::<_, Provider>(&format!(
            "{} ORDER BY name COLLATE NOCASE",
            SELECT_PROVIDER
        ))
        .fetch_all(&self.pool)
        .await?;

        let movements = sqlx::query_as::<_, ProviderMovement>(SELECT_MOVEMENT)
            .fetch_all(&self.pool)
            .await?;

        let mut by_provider: HashMap<String, Vec<ProviderMovement>> = HashMap::new();
        for movement in movements {
            by_provider
                .entry(movement.provider_id.clone())
                .or_default()
                .push(movement);
        }

        Ok(providers
            .into_iter()
            .map(|provider| {
                let balance = by_provider
                    .get(&provider.id)
                    .map(|m| balance(m))
                    .unwrap_or_default();
                ProviderSummary { provider, balance }
            })
            .collect())
    }

    /// Gets a provider row.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Provider> {
        sqlx::query_as::<_, Provider>(&format!("{} WHERE id = ?1", SELECT_PROVIDER))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Provider", id))
    }

    /// Provider with balance and associated ingredients.
    pub async fn get_detail(&self, id: &str) -> DbResult<ProviderDetail> {
        let provider = self.get_by_id(id).await?;
        let movements = self.movements_of(id).await?;
        let ingredients = self.ingredients_of(id).await?;

        Ok(ProviderDetail {
            provider,
            balance: balance(&movements),
            ingredients,
        })
    }

    /// Creates a provider.
    pub async fn create(&self, input: &ProviderInput) -> DbResult<Provider> {
        validate_provider_input(input)?;
        let id = new_id();

        sqlx::query(
            r#"
            INSERT INTO providers (id, name, description, account_number, phone, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&id)
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(&input.account_number)
        .bind(normalized_phone(input))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        info!(id = %id, name = %input.name, "Provider created");
        self.get_by_id(&id).await
    }

    /// Updates a provider's fields.
    pub async fn update(&self, update: &ProviderUpdate) -> DbResult<Provider> {
        validate_id("id", &update.id)?;
        validate_provider_input(&update.fields)?;

        let result = sqlx::query(
            r#"
            UPDATE providers SET
                name = ?2,
                description = ?3,
                account_number = ?4,
                phone = ?5
            WHERE id = ?1
            "#,
        )
        .bind(&update.id)
        .bind(update.fields.name.trim())
        .bind(&update.fields.description)
        .bind(&update.fields.account_number)
        .bind(normalized_phone(&update.fields))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Provider", &update.id));
        }

        self.get_by_id(&update.id).await
    }

    /// Deletes a provider together with its ledger and associations.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM provider_movements WHERE provider_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM provider_ingredients WHERE provider_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM providers WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Provider", id));
        }

        tx.commit().await?;
        warn!(id = %id, movements = removed, "Provider deleted with its ledger");
        Ok(())
    }

    // =========================================================================
    // Ingredient Associations
    // =========================================================================

    /// Ingredients supplied by a provider, alphabetical.
    pub async fn ingredients_of(&self, provider_id: &str) -> DbResult<Vec<Ingredient>> {
        let ingredients = sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT i.id, i.name, i.description, i.quantity, i.price, i.unit, i.updated_at
            FROM ingredients i
            JOIN provider_ingredients pi ON pi.ingredient_id = i.id
            WHERE pi.provider_id = ?1
            ORDER BY i.name COLLATE NOCASE
            "#,
        )
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ingredients)
    }

    /// Replaces the set of ingredients a provider supplies.
    pub async fn set_ingredients(
        &self,
        provider_id: &str,
        ingredient_ids: &[String],
    ) -> DbResult<ProviderDetail> {
        for id in ingredient_ids {
            validate_id("ingredientId", id)?;
        }

        let mut tx = self.pool.begin().await?;
        ensure_provider(&mut tx, provider_id).await?;

        sqlx::query("DELETE FROM provider_ingredients WHERE provider_id = ?1")
            .bind(provider_id)
            .execute(&mut *tx)
            .await?;

        for ingredient_id in ingredient_ids {
            let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ingredients WHERE id = ?1")
                .bind(ingredient_id)
                .fetch_one(&mut *tx)
                .await?;
            if exists == 0 {
                return Err(DbError::not_found("Ingredient", ingredient_id));
            }

            sqlx::query(
                "INSERT OR IGNORE INTO provider_ingredients (provider_id, ingredient_id) VALUES (?1, ?2)",
            )
            .bind(provider_id)
            .bind(ingredient_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!(id = %provider_id, count = ingredient_ids.len(), "Provider ingredients replaced");

        self.get_detail(provider_id).await
    }

    // =========================================================================
    // Movements
    // =========================================================================

    /// Records an invoice or payment.
    pub async fn record_movement(&self, input: &MovementInput) -> DbResult<ProviderMovement> {
        validate_movement_input(input)?;
        self.get_by_id(&input.provider_id).await?;

        let movement = ProviderMovement {
            id: new_id(),
            provider_id: input.provider_id.clone(),
            movement_type: input.movement_type,
            amount: input.amount,
            description: input.description.clone(),
            image_url: input.image_url.clone(),
            created_at: input.occurred_at.unwrap_or_else(Utc::now),
        };

        sqlx::query(
            r#"
            INSERT INTO provider_movements (
                id, provider_id, movement_type, amount, description, image_url, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&movement.id)
        .bind(&movement.provider_id)
        .bind(movement.movement_type)
        .bind(movement.amount)
        .bind(&movement.description)
        .bind(&movement.image_url)
        .bind(movement.created_at)
        .execute(&self.pool)
        .await?;

        info!(
            id = %movement.id,
            provider_id = %movement.provider_id,
            kind = ?movement.movement_type,
            amount = %movement.amount,
            "Movement recorded"
        );
        Ok(movement)
    }

    /// Movements of one provider, oldest first.
    pub async fn movements_of(&self, provider_id: &str) -> DbResult<Vec<ProviderMovement>> {
        let movements = sqlx::query_as::<_, ProviderMovement>(&format!(
            "{} WHERE provider_id = ?1 ORDER BY created_at, id",
            SELECT_MOVEMENT
        ))
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(provider_id = %provider_id, count = movements.len(), "Loaded movements");
        Ok(movements)
    }

    /// Ledger with running balances.
    pub async fn ledger(&self, provider_id: &str) -> DbResult<ProviderLedger> {
        self.get_by_id(provider_id).await?;
        let movements = self.movements_of(provider_id).await?;
        Ok(build_ledger(provider_id, movements))
    }

    /// Hard-deletes one movement. There is no audit trail beyond this log line.
    pub async fn delete_movement(&self, id: &str) -> DbResult<()> {
        let movement = sqlx::query_as::<_, ProviderMovement>(&format!(
            "{} WHERE id = ?1",
            SELECT_MOVEMENT
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("ProviderMovement", id))?;

        let result = sqlx::query("DELETE FROM provider_movements WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("ProviderMovement", id));
        }

        warn!(
            id = %id,
            provider_id = %movement.provider_id,
            kind = ?movement.movement_type,
            amount = %movement.amount,
            "Ledger movement deleted"
        );
        Ok(())
    }
}

fn normalized_phone(input: &ProviderInput) -> Option<&str> {
    input
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|phone| !phone.is_empty())
}

async fn ensure_provider(conn: &mut SqliteConnection, id: &str) -> DbResult<()> {
    let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM providers WHERE id = ?1")
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    if exists == 0 {
        return Err(DbError::not_found("Provider", id));
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
