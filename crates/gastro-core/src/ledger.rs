//! # Ledger Module
//!
//! Provider balances derived from the append-only movement log.
//!
//! ```text
//!   INVOICE  +100   ──►  running 100
//!   PAYMENT   -40   ──►  running  60
//!   INVOICE   +20   ──►  running  80   = balance (we owe the provider)
//! ```
//!
//! A negative balance means the provider was overpaid. Balances are never
//! stored; they are recomputed from the movements every time.

use crate::money::Money;
use crate::types::{LedgerEntry, ProviderLedger, ProviderMovement};

/// Sum of invoices minus sum of payments.
pub fn balance(movements: &[ProviderMovement]) -> Money {
    movements.iter().map(ProviderMovement::signed_amount).sum()
}

/// Pairs each movement with the balance right after it.
///
/// Movements are sorted chronologically (ties by id) before accumulating.
pub fn running_balances(mut movements: Vec<ProviderMovement>) -> Vec<LedgerEntry> {
    movements.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

    let mut running = Money::zero();
    movements
        .into_iter()
        .map(|movement| {
            running += movement.signed_amount();
            LedgerEntry {
                movement,
                running_balance: running,
            }
        })
        .collect()
}

/// Builds the ledger view of one provider.
pub fn build_ledger(provider_id: &str, movements: Vec<ProviderMovement>) -> ProviderLedger {
    let movements = running_balances(movements);
    let balance = movements
        .last()
        .map(|entry| entry.running_balance)
        .unwrap_or_default();

    ProviderLedger {
        provider_id: provider_id.to_string(),
        balance,
        movements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MovementType;
    use chrono::{Duration, TimeZone, Utc};

    fn movement(n: i64, movement_type: MovementType, pesos: i64) -> ProviderMovement {
        ProviderMovement {
            id: format!("m-{}", n),
            provider_id: "p-1".to_string(),
            movement_type,
            amount: Money::from_pesos(pesos),
            description: None,
            image_url: None,
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap() + Duration::hours(n),
        }
    }

    fn sample() -> Vec<ProviderMovement> {
        vec![
            movement(1, MovementType::Invoice, 100),
            movement(2, MovementType::Payment, 40),
            movement(3, MovementType::Invoice, 20),
        ]
    }

    #[test]
    fn test_balance_invoices_minus_payments() {
        assert_eq!(balance(&sample()), Money::from_pesos(80));
        assert_eq!(balance(&[]), Money::zero());
    }

    #[test]
    fn test_running_balances_are_chronological() {
        let mut shuffled = sample();
        shuffled.reverse();

        let entries = running_balances(shuffled);
        let running: Vec<i64> = entries.iter().map(|e| e.running_balance.pesos()).collect();
        assert_eq!(running, vec![100, 60, 80]);
        assert_eq!(entries[0].movement.id, "m-1");
    }

    #[test]
    fn test_overpaid_provider_has_negative_balance() {
        let ledger = build_ledger(
            "p-1",
            vec![
                movement(1, MovementType::Invoice, 50),
                movement(2, MovementType::Payment, 70),
            ],
        );
        assert_eq!(ledger.balance, Money::from_pesos(-20));
        assert_eq!(ledger.movements.len(), 2);
    }
}
