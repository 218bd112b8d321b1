use std::io::Write;

use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::account::Transaction;

#[derive(Debug, Serialize)]
pub struct StatementRow {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub to: String,
    pub amount: Decimal,
    pub note: Option<String>,
}

impl From<&Transaction> for StatementRow {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id.clone(),
            timestamp: tx.timestamp,
            to: tx.counterparty.clone(),
            // exact: minor units with a scale of two
            amount: Decimal::new(tx.amount_minor_units, 2),
            note: tx.note.clone(),
        }
    }
}

pub fn print_statement<W>(
    output: &mut W,
    rows: impl Iterator<Item = StatementRow>,
) -> anyhow::Result<()>
where
    W: Write,
{
    // header is written by hand so an empty statement still has one
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(output);
    writer.write_record(["id", "timestamp", "to", "amount", "note"])?;
    for row in rows {
        if let Err(err) = writer.serialize(row) {
            anyhow::bail!("Failed to write to CSV: {err}")
        }
    }
    if let Err(err) = writer.flush() {
        anyhow::bail!("Failed to flush CSV writer: {err}")
    }
    Ok(())
}
