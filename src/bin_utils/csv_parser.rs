use std::io::Read;

use csv::{StringRecord, StringRecordsIntoIter, Trim};
use serde::Deserialize;

/// One requested transfer, exactly as typed: `amount` is raw user text.
#[derive(Debug, Deserialize)]
pub struct TransferRow {
    pub to: String,
    pub amount: String,
    pub note: Option<String>,
}

/// Parses transfer requests in CSV format (`to,amount,note`), yielding each
/// row with its line number.
pub struct CsvTransferParser<R> {
    headers: StringRecord,
    records: StringRecordsIntoIter<R>,
}

impl<R> CsvTransferParser<R>
where
    R: Read,
{
    pub fn new(source: R) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);
        let headers = reader.headers()?.clone();

        Ok(Self {
            headers,
            records: reader.into_records(),
        })
    }
}

impl<R> Iterator for CsvTransferParser<R>
where
    R: Read,
{
    type Item = (u64, Result<TransferRow, csv::Error>);

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(err) => {
                let line = err.position().map_or(0, |pos| pos.line());
                return Some((line, Err(err)));
            }
        };
        let line = record.position().map_or(0, |pos| pos.line());
        Some((line, record.deserialize(Some(&self.headers))))
    }
}
