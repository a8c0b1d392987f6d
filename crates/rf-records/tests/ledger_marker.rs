use std::fs;

use rf_core::parse_stamp;
use rf_records::{DateLedger, RecordsError};
use tempfile::tempdir;

#[test]
fn write_then_read_round_trips() {
    let dir = tempdir().unwrap();
    let ledger = DateLedger::in_dir(dir.path());

    ledger.write(parse_stamp("20190320").unwrap()).unwrap();
    assert_eq!(ledger.read().unwrap(), parse_stamp("20190320").unwrap());
}

#[test]
fn trailing_whitespace_is_tolerated() {
    let dir = tempdir().unwrap();
    let ledger = DateLedger::in_dir(dir.path());
    fs::write(ledger.path(), "20190320\n").unwrap();
    assert_eq!(ledger.read().unwrap(), parse_stamp("20190320").unwrap());
}

#[test]
fn absent_marker_is_ledger_missing() {
    let dir = tempdir().unwrap();
    let ledger = DateLedger::in_dir(dir.path());
    assert!(matches!(
        ledger.read().unwrap_err(),
        RecordsError::LedgerMissing { .. }
    ));
}

#[test]
fn malformed_marker_is_ledger_missing() {
    let dir = tempdir().unwrap();
    let ledger = DateLedger::in_dir(dir.path());
    for raw in ["not a date", "2019-03-20", "20190299"] {
        fs::write(ledger.path(), raw).unwrap();
        assert!(
            matches!(ledger.read().unwrap_err(), RecordsError::LedgerMissing { .. }),
            "accepted {raw:?}"
        );
    }
}

#[test]
fn rewrite_replaces_the_marker() {
    let dir = tempdir().unwrap();
    let ledger = DateLedger::in_dir(dir.path());
    ledger.write(parse_stamp("20190320").unwrap()).unwrap();
    ledger.write(parse_stamp("20190512").unwrap()).unwrap();
    assert_eq!(ledger.read().unwrap(), parse_stamp("20190512").unwrap());
}
