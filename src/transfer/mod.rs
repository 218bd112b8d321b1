//! Review-then-confirm transfer state machine.
//!
//! [`TransferWorkflow::handle`] is a pure reducer: it never touches storage.
//! When it returns [`Outcome::Commit`] the binding layer performs exactly one
//! ledger call and feeds the result back as [`TransferEvent::CommitSucceeded`]
//! or [`TransferEvent::CommitFailed`]. [`session::TransferSession`] is the
//! binding used by the CLI and tests.

use thiserror::Error;

use crate::{
    account::Transaction,
    ledger::LedgerError,
    money::{DraftAmount, MinorUnits},
    storage::StorageError,
};

pub mod session;

pub use session::TransferSession;

/// Frozen copy of the form, immune to edits until cancelled or confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSnapshot {
    pub recipient: String,
    pub minor_units: MinorUnits,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferState {
    Editing,
    Reviewing(ReviewSnapshot),
    Committing(ReviewSnapshot),
    Committed(Transaction),
}

/// Which control should hold interaction focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Form,
    /// The "continue" control that opens review. Focus returns here whenever
    /// the confirmation surface closes without a commit.
    ReviewTrigger,
    ConfirmDialog,
}

#[derive(Debug)]
pub enum TransferEvent {
    SetRecipient(String),
    SetAmount(String),
    BlurAmount,
    SetNote(String),
    BalanceChanged(MinorUnits),
    RequestReview,
    Cancel,
    Confirm,
    CommitSucceeded(Transaction),
    CommitFailed(LedgerError),
}

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Updated,
    /// The event has no meaning in the current state.
    Ignored,
    Blocked(Vec<Blocker>),
    Reviewing(ReviewSnapshot),
    /// Perform one debit for this snapshot and report back.
    Commit(ReviewSnapshot),
    Cancelled,
    Committed(Transaction),
    Failed,
}

/// Reason the form cannot proceed to review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Blocker {
    #[error("Recipient is required")]
    MissingRecipient,
    #[error("Enter a valid amount")]
    NonPositiveAmount,
    #[error("Insufficient funds")]
    InsufficientFunds {
        requested: MinorUnits,
        available: MinorUnits,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingRecipient,
    InvalidAmount,
    InsufficientFunds,
    StorageUnavailable,
    Cancelled,
    AlreadyCommitted,
}

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Transfer is not ready: {}", join_blockers(.0))]
    NotReady(Vec<Blocker>),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("Transfer cancelled")]
    Cancelled,
    #[error("Transfer already sent")]
    AlreadyCommitted,
    /// A failed commit as shown to the user. The workflow keeps the source
    /// error in [`TransferWorkflow::error`].
    #[error("{message}")]
    CommitFailed { kind: ErrorKind, message: String },
}

fn join_blockers(blockers: &[Blocker]) -> String {
    blockers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl TransferError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransferError::NotReady(blockers) => match blockers.first() {
                Some(Blocker::MissingRecipient) => ErrorKind::MissingRecipient,
                Some(Blocker::InsufficientFunds { .. }) => ErrorKind::InsufficientFunds,
                Some(Blocker::NonPositiveAmount) | None => ErrorKind::InvalidAmount,
            },
            TransferError::Ledger(LedgerError::InvalidAmount(_)) => ErrorKind::InvalidAmount,
            TransferError::Ledger(LedgerError::InsufficientFunds(_)) => {
                ErrorKind::InsufficientFunds
            }
            TransferError::Ledger(LedgerError::StorageUnavailable(_)) => {
                ErrorKind::StorageUnavailable
            }
            TransferError::Cancelled => ErrorKind::Cancelled,
            TransferError::AlreadyCommitted => ErrorKind::AlreadyCommitted,
            TransferError::CommitFailed { kind, .. } => *kind,
        }
    }

    /// Detached copy carrying only the kind and message.
    pub fn summary(&self) -> TransferError {
        TransferError::CommitFailed {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

impl From<StorageError> for TransferError {
    fn from(err: StorageError) -> Self {
        TransferError::Ledger(err.into())
    }
}

#[derive(Debug)]
pub struct TransferWorkflow {
    state: TransferState,
    recipient: String,
    draft: DraftAmount,
    note: String,
    available: MinorUnits,
    error: Option<TransferError>,
    focus: Focus,
}

impl TransferWorkflow {
    /// Fresh form in `Editing`, amount zero, checked against `available`.
    pub fn new(available: MinorUnits) -> Self {
        Self {
            state: TransferState::Editing,
            recipient: String::new(),
            draft: DraftAmount::default(),
            note: String::new(),
            available,
            error: None,
            focus: Focus::Form,
        }
    }

    pub fn state(&self) -> &TransferState {
        &self.state
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn draft(&self) -> &DraftAmount {
        &self.draft
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn available(&self) -> MinorUnits {
        self.available
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Failure of the last commit attempt, kept until the next review opens.
    pub fn error(&self) -> Option<&TransferError> {
        self.error.as_ref()
    }

    pub fn review(&self) -> Option<&ReviewSnapshot> {
        match &self.state {
            TransferState::Reviewing(review) | TransferState::Committing(review) => Some(review),
            _ => None,
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self.state, TransferState::Committed(_))
    }

    pub fn blockers(&self) -> Vec<Blocker> {
        let mut blockers = Vec::new();
        if self.recipient.trim().is_empty() {
            blockers.push(Blocker::MissingRecipient);
        }
        let requested = self.draft.minor_units();
        if requested <= 0 {
            blockers.push(Blocker::NonPositiveAmount);
        } else if requested > self.available {
            blockers.push(Blocker::InsufficientFunds {
                requested,
                available: self.available,
            });
        }
        blockers
    }

    pub fn can_continue(&self) -> bool {
        matches!(self.state, TransferState::Editing) && self.blockers().is_empty()
    }

    fn freeze(&self) -> ReviewSnapshot {
        let note = self.note.trim();
        ReviewSnapshot {
            recipient: self.recipient.trim().to_owned(),
            minor_units: self.draft.minor_units(),
            note: (!note.is_empty()).then(|| note.to_owned()),
        }
    }

    pub fn handle(&mut self, event: TransferEvent) -> Outcome {
        use TransferEvent as E;

        let editing = matches!(self.state, TransferState::Editing);
        match event {
            _ if self.is_committed() => Outcome::Ignored,
            E::BalanceChanged(available) => {
                self.available = available;
                Outcome::Updated
            }
            E::SetRecipient(recipient) if editing => {
                self.recipient = recipient;
                Outcome::Updated
            }
            E::SetAmount(raw) if editing => {
                self.draft.input(&raw);
                Outcome::Updated
            }
            E::BlurAmount if editing => {
                self.draft.blur();
                Outcome::Updated
            }
            E::SetNote(note) if editing => {
                self.note = note;
                Outcome::Updated
            }
            E::RequestReview if editing => self.open_review(),
            E::Cancel => self.cancel_review(),
            E::Confirm => self.start_commit(),
            E::CommitSucceeded(tx) => self.finish_commit(Ok(tx)),
            E::CommitFailed(err) => self.finish_commit(Err(err)),
            _ => Outcome::Ignored,
        }
    }

    fn open_review(&mut self) -> Outcome {
        let blockers = self.blockers();
        if !blockers.is_empty() {
            return Outcome::Blocked(blockers);
        }
        let review = self.freeze();
        self.error = None;
        self.state = TransferState::Reviewing(review.clone());
        self.focus = Focus::ConfirmDialog;
        Outcome::Reviewing(review)
    }

    fn cancel_review(&mut self) -> Outcome {
        if !matches!(self.state, TransferState::Reviewing(_)) {
            return Outcome::Ignored;
        }
        self.state = TransferState::Editing;
        self.focus = Focus::ReviewTrigger;
        Outcome::Cancelled
    }

    /// The only way into `Committing`, so at most one commit is ever in flight.
    fn start_commit(&mut self) -> Outcome {
        let TransferState::Reviewing(review) = &self.state else {
            return Outcome::Ignored;
        };
        let review = review.clone();
        self.state = TransferState::Committing(review.clone());
        Outcome::Commit(review)
    }

    fn finish_commit(&mut self, result: Result<Transaction, LedgerError>) -> Outcome {
        if !matches!(self.state, TransferState::Committing(_)) {
            return Outcome::Ignored;
        }
        match result {
            Ok(tx) => {
                self.state = TransferState::Committed(tx.clone());
                Outcome::Committed(tx)
            }
            Err(err) => {
                self.state = TransferState::Editing;
                self.error = Some(err.into());
                self.focus = Focus::ReviewTrigger;
                Outcome::Failed
            }
        }
    }
}
