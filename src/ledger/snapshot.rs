use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    account::{Account, AccountEvent, Transaction},
    storage::StorageError,
};

/// Whole persisted ledger state, written and read as one blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "user")]
    pub account: Account,
    /// Creation order; the last element is the newest transaction.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Snapshot {
    pub fn new(account: Account) -> Self {
        Self {
            account,
            transactions: Vec::new(),
        }
    }

    pub fn apply(&mut self, event: &AccountEvent) {
        self.account.apply(event);
        match event {
            AccountEvent::Debited(tx) => self.transactions.push(tx.clone()),
        }
    }

    /// Presentation order: latest timestamp first, later creation first on ties.
    pub fn history_newest_first(&self) -> Vec<&Transaction> {
        let mut history: Vec<(usize, &Transaction)> = self.transactions.iter().enumerate().collect();
        history.sort_by(|(ia, a), (ib, b)| b.timestamp.cmp(&a.timestamp).then(ib.cmp(ia)));
        history.into_iter().map(|(_, tx)| tx).collect()
    }

    pub fn validate(&self) -> Result<(), StorageError> {
        if self.account.balance_minor_units() < 0 {
            return Err(StorageError::Corrupt(format!(
                "negative balance {}",
                self.account.balance_minor_units()
            )));
        }
        let mut ids = HashSet::with_capacity(self.transactions.len());
        for tx in &self.transactions {
            if !ids.insert(tx.id.as_str()) {
                return Err(StorageError::Corrupt(format!(
                    "duplicate transaction id `{}`",
                    tx.id
                )));
            }
        }
        Ok(())
    }

    pub fn encode(&self) -> Result<Vec<u8>, StorageError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn decode(blob: &[u8]) -> Result<Self, StorageError> {
        let snapshot: Self = serde_json::from_slice(blob)?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}
