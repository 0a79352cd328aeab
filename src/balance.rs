//! Derives how much each connection owes you from the transaction log.
//!
//! Balances are never stored. They are recomputed from the latest connections
//! and transactions every time a page is rendered, so there are no running
//! totals that could drift out of sync with the transactions.

use std::collections::HashMap;

use crate::{
    connection::{Connection, ConnectionId, ConnectionName},
    transaction::Transaction,
};

/// The net amount of money exchanged with a connection.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionBalance {
    /// The connection the balance is for.
    pub connection_id: ConnectionId,
    /// The name of the connection.
    pub name: ConnectionName,
    /// The sum of credits minus the sum of debits.
    ///
    /// Positive means they owe you, negative means you owe them.
    pub balance: f64,
}

/// Compute the balance of every connection in `connections`.
///
/// Every connection gets exactly one balance, starting at zero, in the same
/// order as `connections`. Each transaction adds its amount to the balance of
/// its connection if it is a credit and subtracts it if it is a debit.
/// Transactions for connections not in `connections` (e.g., a deleted
/// connection) are ignored.
pub fn compute_balances(
    connections: &[Connection],
    transactions: &[Transaction],
) -> Vec<ConnectionBalance> {
    let mut balances: Vec<ConnectionBalance> = connections
        .iter()
        .map(|connection| ConnectionBalance {
            connection_id: connection.id,
            name: connection.name.clone(),
            balance: 0.0,
        })
        .collect();

    let index_by_id: HashMap<ConnectionId, usize> = balances
        .iter()
        .enumerate()
        .map(|(index, balance)| (balance.connection_id, index))
        .collect();

    for transaction in transactions {
        let Some(&index) = index_by_id.get(&transaction.connection_id) else {
            continue;
        };

        balances[index].balance += transaction.signed_amount();
    }

    balances
}

/// The totals shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BalanceTotals {
    /// The sum of all positive balances.
    pub owed_to_you: f64,
    /// The magnitude of the sum of all negative balances.
    pub you_owe: f64,
}

/// Add up what other people owe you and what you owe other people.
///
/// Both totals are non-negative. A positive balance never offsets a negative
/// balance of another connection.
pub fn balance_totals(balances: &[ConnectionBalance]) -> BalanceTotals {
    let owed_to_you = balances
        .iter()
        .map(|balance| balance.balance.max(0.0))
        .sum();
    let you_owe: f64 = balances
        .iter()
        .map(|balance| balance.balance.min(0.0))
        .sum();

    BalanceTotals {
        owed_to_you,
        you_owe: you_owe.abs(),
    }
}


#[cfg(test)]
mod balance_totals_tests {
    use crate::{
        balance::{BalanceTotals, ConnectionBalance, balance_totals},
        connection::ConnectionName,
    };

    fn balance(balance: f64) -> ConnectionBalance {
        ConnectionBalance {
            connection_id: 1,
            name: ConnectionName::new_unchecked("Alice"),
            balance,
        }
    }

    #[test]
    fn splits_positive_and_negative_balances() {
        let balances = vec![balance(30.0), balance(-12.5), balance(5.0), balance(-0.5)];

        let totals = balance_totals(&balances);

        assert_eq!(
            totals,
            BalanceTotals {
                owed_to_you: 35.0,
                you_owe: 13.0,
            }
        );
    }

    #[test]
    fn no_balances_gives_zero_totals() {
        assert_eq!(balance_totals(&[]), BalanceTotals::default());
    }

    #[test]
    fn zero_balances_do_not_count() {
        let totals = balance_totals(&[balance(0.0)]);

        assert_eq!(totals.owed_to_you, 0.0);
        assert_eq!(totals.you_owe, 0.0);
    }
}
