use std::{cell::RefCell, rc::Rc, str::from_utf8, time::Duration};

use sum_bank::{
    account::Account,
    bin_utils::Service,
    ledger::{Ledger, LedgerStore, Snapshot},
    storage::{file::FileBlobStore, memory::InMemoryBlobStore},
    transfer::TransferSession,
};
use tempfile::TempDir;

const TEST_FILE: &str = include_str!("transfers.csv");

fn seed() -> Snapshot {
    Snapshot::new(Account::new("u_1", "Alex Morgan", 10_000))
}

#[test]
fn process_transfers() {
    let ledger = LedgerStore::new(InMemoryBlobStore::default(), "sum-bank:data", seed());
    let errors = Rc::new(RefCell::new(Vec::new()));
    let mut output = Vec::new();

    let service = Service {
        ledger: &ledger,
        input: TEST_FILE.as_bytes(),
        output: &mut output,
        latency: Duration::ZERO,
        error_printer: Box::new({
            let errors = errors.clone();
            move |line, err| errors.borrow_mut().push((line, err.to_string()))
        }),
    };
    service.run().unwrap();

    assert_eq!(
        *errors.borrow(),
        vec![
            (3, "Transfer is not ready: Insufficient funds".to_owned()),
            (4, "Transfer is not ready: Recipient is required".to_owned()),
            (6, "Transfer is not ready: Enter a valid amount".to_owned()),
        ]
    );

    // ids and timestamps are generated, so only compare the stable columns
    let lines: Vec<Vec<String>> = from_utf8(&output)
        .unwrap()
        .lines()
        .map(|line| line.split(',').map(ToOwned::to_owned).collect())
        .collect();
    assert_eq!(lines[0], ["id", "timestamp", "to", "amount", "note"]);
    let stable: Vec<_> = lines[1..].iter().map(|cols| cols[2..].to_vec()).collect();
    assert_eq!(
        stable,
        [
            ["Bookshop", "-1.23", ""],
            ["Grocer", "-12.99", "weekly shop"],
            ["Coffee Shop", "-4.50", "latte"],
        ]
    );

    let state = ledger.load().unwrap();
    assert_eq!(state.account.balance_minor_units(), 10_000 - 450 - 1_299 - 123);
    let sum: i64 = state
        .transactions
        .iter()
        .map(|tx| tx.amount_minor_units)
        .sum();
    assert_eq!(state.account.balance_minor_units(), 10_000 + sum);
}

#[test]
fn ledger_survives_reopen() {
    let dir = TempDir::new().unwrap();

    let first = LedgerStore::new(FileBlobStore::new(dir.path()), "sum-bank:data", seed());
    let mut session = TransferSession::start(&first).unwrap();
    session.fill("Coffee Shop", "100", None);
    session.request_review().unwrap();
    let tx = session.confirm().unwrap().unwrap();
    let before = first.load().unwrap();

    // a different seed must not matter once a snapshot exists
    let other_seed = Snapshot::new(Account::new("u_2", "Someone Else", 1));
    let reopened = LedgerStore::new(FileBlobStore::new(dir.path()), "sum-bank:data", other_seed);
    let after = reopened.load().unwrap();

    assert_eq!(after, before);
    assert_eq!(after.account.balance_minor_units(), 0);
    assert_eq!(after.transactions, vec![tx]);

    let err = reopened.commit_debit("Coffee Shop", 1, None).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Insufficient funds: requested 1 minor units, available 0"
    );
}
