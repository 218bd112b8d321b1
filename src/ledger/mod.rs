use thiserror::Error;

use crate::{
    account::{AccountError, Transaction},
    command::CommandError,
    money::MinorUnits,
    storage::StorageError,
};

pub mod snapshot;
pub mod store;

pub use snapshot::Snapshot;
pub use store::LedgerStore;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    InvalidAmount(#[from] CommandError),
    #[error(transparent)]
    InsufficientFunds(#[from] AccountError),
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] StorageError),
}

/// Single-account ledger: the only writer of balance and history.
pub trait Ledger {
    /// Returns the persisted state, seeding storage on first use.
    fn load(&self) -> Result<Snapshot, LedgerError>;

    /// Debits the account and appends the resulting transaction.
    ///
    /// Either the new balance and the new transaction are both persisted, or
    /// the ledger is left exactly as it was.
    fn commit_debit(
        &self,
        counterparty: &str,
        minor_units: MinorUnits,
        note: Option<&str>,
    ) -> Result<Transaction, LedgerError>;
}
