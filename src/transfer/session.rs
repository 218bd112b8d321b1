use std::{thread, time::Duration};

use tracing::{debug, warn};

use crate::{account::Transaction, ledger::Ledger};

use super::{Outcome, ReviewSnapshot, TransferError, TransferEvent, TransferWorkflow};

/// Drives one [`TransferWorkflow`] against a [`Ledger`].
pub struct TransferSession<'l, L: ?Sized> {
    ledger: &'l L,
    workflow: TransferWorkflow,
    latency: Duration,
}

impl<'l, L> TransferSession<'l, L>
where
    L: Ledger + ?Sized,
{
    /// Opens a form checked against the ledger's current balance.
    pub fn start(ledger: &'l L) -> Result<Self, TransferError> {
        let snapshot = ledger.load()?;
        Ok(Self {
            ledger,
            workflow: TransferWorkflow::new(snapshot.account.balance_minor_units()),
            latency: Duration::ZERO,
        })
    }

    /// Simulated I/O delay applied before every commit.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn workflow(&self) -> &TransferWorkflow {
        &self.workflow
    }

    pub fn handle(&mut self, event: TransferEvent) -> Outcome {
        self.workflow.handle(event)
    }

    /// Fills the whole form the way a user would, blurring the amount field.
    pub fn fill(&mut self, recipient: &str, amount: &str, note: Option<&str>) {
        self.handle(TransferEvent::SetRecipient(recipient.to_owned()));
        self.handle(TransferEvent::SetAmount(amount.to_owned()));
        self.handle(TransferEvent::BlurAmount);
        self.handle(TransferEvent::SetNote(note.unwrap_or_default().to_owned()));
    }

    /// Opens review, or hands back the snapshot already under review.
    pub fn request_review(&mut self) -> Result<ReviewSnapshot, TransferError> {
        if let Some(review) = self.workflow.review() {
            return Ok(review.clone());
        }
        match self.handle(TransferEvent::RequestReview) {
            Outcome::Reviewing(review) => Ok(review),
            Outcome::Blocked(blockers) => Err(TransferError::NotReady(blockers)),
            _ if self.workflow.is_committed() => Err(TransferError::AlreadyCommitted),
            _ => Err(TransferError::NotReady(self.workflow.blockers())),
        }
    }

    /// Closes review. Always reports [`TransferError::Cancelled`] so callers
    /// can route it like any other non-commit.
    pub fn cancel(&mut self) -> TransferError {
        self.handle(TransferEvent::Cancel);
        TransferError::Cancelled
    }

    /// Commits the reviewed transfer.
    ///
    /// Returns `Ok(None)` when there is nothing to confirm, which includes a
    /// repeated confirm after the commit already happened. On failure the
    /// workflow is back in editing and keeps its error for display, the caller
    /// gets a summary of it, and the balance is refreshed so the form is validated against what the ledger
    /// now holds.
    pub fn confirm(&mut self) -> Result<Option<Transaction>, TransferError> {
        let Outcome::Commit(review) = self.handle(TransferEvent::Confirm) else {
            debug!("confirm ignored, no transfer under review");
            return Ok(None);
        };

        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        let result = self.ledger.commit_debit(
            &review.recipient,
            review.minor_units,
            review.note.as_deref(),
        );

        match result {
            Ok(tx) => {
                self.handle(TransferEvent::CommitSucceeded(tx.clone()));
                Ok(Some(tx))
            }
            Err(err) => {
                warn!(recipient = %review.recipient, "transfer failed: {err}");
                if let Ok(snapshot) = self.ledger.load() {
                    self.handle(TransferEvent::BalanceChanged(
                        snapshot.account.balance_minor_units(),
                    ));
                }
                self.handle(TransferEvent::CommitFailed(err));
                self.workflow
                    .error()
                    .map_or(Ok(None), |error| Err(error.summary()))
            }
        }
    }
}
