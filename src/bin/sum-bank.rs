use std::{
    fs::File,
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use sum_bank::{
    bin_utils::{Service, print_history},
    config::Settings,
    ledger::{Ledger, LedgerStore},
    logging,
    money::display,
    storage::file::FileBlobStore,
    transfer::{ErrorKind, TransferSession},
};

#[derive(Debug, Parser)]
#[command(version, about = "Demo bank transfers with review-then-confirm")]
struct Cli {
    /// Settings file; defaults apply when it does not exist
    #[arg(long, env = "SUM_BANK_CONFIG", default_value = "sum-bank.json")]
    config: PathBuf,

    /// Overrides the data directory from the settings file
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the account and its balance
    Balance,
    /// Print the transaction history as CSV, newest first
    History,
    /// Send money to a recipient
    Transfer {
        #[arg(long)]
        to: String,
        /// Amount as typed, e.g. "12.50" or "3,5"
        #[arg(long)]
        amount: String,
        #[arg(long)]
        note: Option<String>,
        /// Confirm without prompting
        #[arg(short, long)]
        yes: bool,
    },
    /// Run every `to,amount,note` row of a CSV file as a confirmed transfer
    Batch { file: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::set_up(cli.verbose);

    let mut settings = Settings::load(&cli.config)?;
    if let Some(data_dir) = cli.data_dir {
        settings.data_dir = data_dir;
    }
    let ledger = LedgerStore::new(
        FileBlobStore::new(&settings.data_dir),
        settings.storage_key.clone(),
        settings.seed.clone(),
    );

    match cli.command {
        Command::Balance => {
            let snapshot = ledger.load()?;
            println!(
                "{} ({})\nAvailable {}",
                snapshot.account.display_name(),
                snapshot.account.id(),
                display(snapshot.account.balance_minor_units())
            );
            Ok(())
        }
        Command::History => print_history(&ledger, &mut io::stdout()),
        Command::Transfer {
            to,
            amount,
            note,
            yes,
        } => {
            let mut session =
                TransferSession::start(&ledger)?.with_latency(settings.commit_latency());
            session.fill(&to, &amount, note.as_deref());
            let review = session.request_review()?;

            println!("Confirm transfer");
            println!("  To      {}", review.recipient);
            println!("  Amount  {}", display(review.minor_units));
            if let Some(note) = &review.note {
                println!("  Note    {note}");
            }
            if !yes && !ask("Send money? [y/N] ")? {
                let cancelled = session.cancel();
                println!("{cancelled}");
                return Ok(());
            }

            match session.confirm() {
                Ok(Some(tx)) => {
                    println!(
                        "Sent {} to {} ({})",
                        display(-tx.amount_minor_units),
                        tx.counterparty,
                        tx.id
                    );
                    Ok(())
                }
                Ok(None) => Ok(()),
                Err(err) if err.kind() == ErrorKind::StorageUnavailable => {
                    Err(err).context("Transfer could not be saved, nothing was sent")
                }
                Err(err) => Err(err.into()),
            }
        }
        Command::Batch { file } => {
            let input = File::open(&file)
                .with_context(|| format!("Failed to open `{}`", file.display()))?;
            let service = Service {
                ledger: &ledger,
                input,
                output: &mut io::stdout(),
                latency: settings.commit_latency(),
                error_printer: Box::new(|line, err| eprintln!("Error at line {line}: {err}")),
            };
            service.run()
        }
    }
}

fn ask(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
