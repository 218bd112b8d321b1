use thiserror::Error;

use crate::money::MinorUnits;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebitCommand {
    pub counterparty: String,
    pub minor_units: MinorUnits,
    pub note: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Amount must be greater than zero, got {minor_units} minor units")]
    InvalidAmount { minor_units: MinorUnits },
}

impl DebitCommand {
    /// Builds a debit command, rejecting non-positive amounts.
    pub fn parse_command(
        counterparty: &str,
        minor_units: MinorUnits,
        note: Option<&str>,
    ) -> Result<Self, CommandError> {
        if minor_units <= 0 {
            return Err(CommandError::InvalidAmount { minor_units });
        }
        Ok(Self {
            counterparty: counterparty.to_owned(),
            minor_units,
            note: note.map(ToOwned::to_owned),
        })
    }
}
