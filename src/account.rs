use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{command::DebitCommand, money::MinorUnits};

pub type TransactionId = String;

/// Immutable ledger record. Negative amounts are debits from the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub amount_minor_units: MinorUnits,
    #[serde(rename = "to")]
    pub counterparty: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountEvent {
    Debited(Transaction),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Insufficient funds: requested {requested} minor units, available {available}")]
    InsufficientFunds {
        requested: MinorUnits,
        available: MinorUnits,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    id: String,
    #[serde(rename = "name")]
    display_name: String,
    balance_minor_units: MinorUnits,
}

impl Account {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        balance_minor_units: MinorUnits,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            balance_minor_units,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn balance_minor_units(&self) -> MinorUnits {
        self.balance_minor_units
    }

    pub fn apply(&mut self, event: &AccountEvent) {
        match event {
            AccountEvent::Debited(tx) => {
                // amount is already negative
                self.balance_minor_units += tx.amount_minor_units;
            }
        }
    }

    /// Validates a debit against the current balance and produces the event
    /// that records it. The account itself is left untouched.
    pub fn handle_debit(
        &self,
        command: DebitCommand,
        id: TransactionId,
        timestamp: DateTime<Utc>,
    ) -> Result<AccountEvent, AccountError> {
        if command.minor_units > self.balance_minor_units {
            return Err(AccountError::InsufficientFunds {
                requested: command.minor_units,
                available: self.balance_minor_units,
            });
        }
        Ok(AccountEvent::Debited(Transaction {
            id,
            amount_minor_units: -command.minor_units,
            counterparty: command.counterparty,
            timestamp,
            note: command.note,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn debit(minor_units: MinorUnits) -> DebitCommand {
        DebitCommand::parse_command("Coffee Shop", minor_units, None).unwrap()
    }

    #[test]
    fn apply_debit_event() {
        let mut acc = Account::new("u_1", "Alex", 10_000);
        let evt = acc
            .handle_debit(debit(2_500), "t_1".to_owned(), Utc::now())
            .unwrap();
        // handling does not mutate, only applying does
        assert_eq!(acc.balance_minor_units(), 10_000);

        acc.apply(&evt);
        assert_eq!(acc.balance_minor_units(), 7_500);

        let AccountEvent::Debited(tx) = evt;
        assert_eq!(tx.id, "t_1");
        assert_eq!(tx.amount_minor_units, -2_500);
        assert_eq!(tx.counterparty, "Coffee Shop");
        assert_eq!(tx.note, None);
    }

    #[test]
    fn handle_debit_checks_funds() {
        let acc = Account::new("u_1", "Alex", 10_000);

        let err = acc
            .handle_debit(debit(10_001), "t_1".to_owned(), Utc::now())
            .unwrap_err();
        assert_eq!(
            err,
            AccountError::InsufficientFunds {
                requested: 10_001,
                available: 10_000
            }
        );

        // whole balance may be spent
        let mut acc = acc;
        let evt = acc
            .handle_debit(debit(10_000), "t_2".to_owned(), Utc::now())
            .unwrap();
        acc.apply(&evt);
        assert_eq!(acc.balance_minor_units(), 0);
    }

    #[test]
    fn serialized_shape() {
        let acc = Account::new("u_1", "Alex", 1_250);
        let json = serde_json::to_value(&acc).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": "u_1", "name": "Alex", "balanceMinorUnits": 1250 })
        );

        let tx = Transaction {
            id: "t_1".to_owned(),
            amount_minor_units: -450,
            counterparty: "Coffee Shop".to_owned(),
            timestamp: "2025-01-02T03:04:05Z".parse().unwrap(),
            note: None,
        };
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "t_1",
                "amountMinorUnits": -450,
                "to": "Coffee Shop",
                "timestamp": "2025-01-02T03:04:05Z",
            })
        );
    }
}
