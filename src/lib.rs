/// Exact conversion between typed currency text and integer minor units.
pub mod money;

/// The single account and its event-sourced debit.
/// Balance only changes by applying events produced from validated commands.
pub mod account;

/// Debit commands that later are executed by [`account`].
pub mod command;

/// Key-value blob persistence port, plus in-memory and file implementations.
pub mod storage;

/// Ledger interface and its snapshot-backed implementation. The only writer
/// of balance and transaction history.
pub mod ledger;

/// Two-phase (review, then confirm) transfer workflow.
pub mod transfer;

/// Runtime settings read from an optional JSON file.
pub mod config;

/// `tracing` subscriber setup for the binary.
pub mod logging;

/// CSV batch service and statement printer used by the binary and the
/// integration test.
pub mod bin_utils;
