use std::sync::Mutex;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    account::{AccountEvent, Transaction, TransactionId},
    command::DebitCommand,
    money::MinorUnits,
    storage::{BlobStore, StorageError},
};

use super::{Ledger, LedgerError, Snapshot};

/// Ledger persisted as one snapshot blob under a single key.
///
/// The blob store is the only copy of the state. Every operation re-reads it
/// while holding the lock, so read-validate-write cycles from different
/// callers sharing this value never interleave.
#[derive(Debug)]
pub struct LedgerStore<S> {
    store: Mutex<S>,
    key: String,
    seed: Snapshot,
}

fn new_transaction_id() -> TransactionId {
    format!("t_{}", Uuid::now_v7().simple())
}

impl<S> LedgerStore<S>
where
    S: BlobStore,
{
    pub fn new(store: S, key: impl Into<String>, seed: Snapshot) -> Self {
        Self {
            store: Mutex::new(store),
            key: key.into(),
            seed,
        }
    }

    fn read_or_seed(&self, store: &mut S) -> Result<Snapshot, LedgerError> {
        if let Some(blob) = store.get(&self.key)? {
            return Ok(Snapshot::decode(&blob)?);
        }
        self.seed.validate()?;
        store.put(&self.key, &self.seed.encode()?)?;
        debug!(key = %self.key, "seeded empty ledger");
        Ok(self.seed.clone())
    }
}

impl<S> Ledger for LedgerStore<S>
where
    S: BlobStore,
{
    fn load(&self) -> Result<Snapshot, LedgerError> {
        let mut store = self.store.lock().map_err(|_| StorageError::Poisoned)?;
        let snapshot = self.read_or_seed(&mut store).inspect_err(|err| {
            warn!(key = %self.key, "failed to load ledger: {err}");
        })?;
        debug!(
            balance = snapshot.account.balance_minor_units(),
            transactions = snapshot.transactions.len(),
            "ledger loaded"
        );
        Ok(snapshot)
    }

    fn commit_debit(
        &self,
        counterparty: &str,
        minor_units: MinorUnits,
        note: Option<&str>,
    ) -> Result<Transaction, LedgerError> {
        let result = (|| {
            let command = DebitCommand::parse_command(counterparty, minor_units, note)?;
            let mut store = self.store.lock().map_err(|_| StorageError::Poisoned)?;
            let mut snapshot = self.read_or_seed(&mut store)?;
            let event = snapshot.account.handle_debit(
                command,
                new_transaction_id(),
                Utc::now(),
            )?;
            snapshot.apply(&event);
            store.put(&self.key, &snapshot.encode()?)?;
            let AccountEvent::Debited(tx) = event;
            Ok::<_, LedgerError>((tx, snapshot.account.balance_minor_units()))
        })();

        match result {
            Ok((tx, balance)) => {
                info!(id = %tx.id, amount = tx.amount_minor_units, balance, "debit committed");
                Ok(tx)
            }
            Err(err) => {
                warn!(minor_units, "debit rejected: {err}");
                Err(err)
            }
        }
    }
}
