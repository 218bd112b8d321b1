//! Bootstraps the transfer core for the binary: CSV batch transfers in, CSV
//! statement out. Kept in the library so the integration test can drive it.

use std::{
    io::{Read, Write},
    time::Duration,
};

use anyhow::Result;
use csv_parser::{CsvTransferParser, TransferRow};
use csv_printer::{StatementRow, print_statement};
use thiserror::Error;
use tracing::info;

use crate::{
    ledger::Ledger,
    transfer::{TransferError, TransferSession},
};

pub mod csv_parser;
pub mod csv_printer;

#[derive(Debug, Error)]
pub enum RowError {
    #[error("Malformed row: {0}")]
    Malformed(#[from] csv::Error),
    #[error(transparent)]
    Transfer(#[from] TransferError),
}

/// Prints the ledger history, newest first.
pub fn print_history<L, W>(ledger: &L, output: &mut W) -> Result<()>
where
    L: Ledger + ?Sized,
    W: Write,
{
    let snapshot = ledger.load()?;
    print_statement(
        output,
        snapshot
            .history_newest_first()
            .into_iter()
            .map(StatementRow::from),
    )
}

/// Runs every CSV row through its own review-and-confirm session.
pub struct Service<'w, 'l, L: ?Sized, R, W: 'w> {
    pub ledger: &'l L,
    pub input: R,
    pub output: &'w mut W,
    pub latency: Duration,
    pub error_printer: Box<dyn FnMut(u64, RowError)>,
}

impl<'w, 'l, L, R, W> Service<'w, 'l, L, R, W>
where
    L: Ledger + ?Sized,
    R: Read,
    W: Write + 'w,
{
    pub fn run(mut self) -> Result<()> {
        let parser = CsvTransferParser::new(self.input)?;

        let mut committed = 0;
        for (line, row) in parser {
            let result = row.map_err(RowError::from).and_then(|row| {
                run_transfer(self.ledger, self.latency, &row).map_err(RowError::from)
            });
            match result {
                Ok(()) => committed += 1,
                Err(err) => (self.error_printer)(line, err),
            }
        }
        info!(committed, "batch finished");

        print_history(self.ledger, self.output)
    }
}

fn run_transfer<L>(
    ledger: &L,
    latency: Duration,
    row: &TransferRow,
) -> Result<(), TransferError>
where
    L: Ledger + ?Sized,
{
    let mut session = TransferSession::start(ledger)?.with_latency(latency);
    session.fill(&row.to, &row.amount, row.note.as_deref());
    session.request_review()?;
    match session.confirm()? {
        Some(_) => Ok(()),
        None => Err(TransferError::NotReady(session.workflow().blockers())),
    }
}
