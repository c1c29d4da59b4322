//--------------------------------------------------------------------------------------------------
// TEST MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Bulk loading from files on disk: a clean load, an aborted load and the bundled sample book.
//--------------------------------------------------------------------------------------------------

use std::io::Write;

use rust_decimal_macros::dec;
use tempfile::NamedTempFile;

use avl_matching::inbounds::load_sample;
use avl_matching::outbounds::{LoadReport, to_json};
use avl_matching::{LoadError, MatchingError, Side, load_orders_from_path};

fn write_orders(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_from_file() {
    let file = write_orders(
        "id,userId,side,price,size\n\
         a1,alice,sell,10.5,3\n\
         a2,alice,sell,11,2\n\
         b1,bob,buy,10.5,1\n\
         b2,bob,buy,9.75,4\n",
    );

    let summary = load_orders_from_path(file.path()).unwrap();

    assert_eq!(summary.orders_loaded, 4);
    assert_eq!(summary.trades_executed, 1);
    let engine = &summary.engine;
    assert_eq!(engine.get_order_by_id("a1").unwrap().remaining_size, dec!(2));
    assert_eq!(engine.best_bid(), Some(dec!(9.75)));
    assert_eq!(engine.best_ask(), Some(dec!(10.5)));
    assert_eq!(engine.level_count(Side::Ask), 2);
}

#[test]
fn test_first_bad_row_aborts_load() {
    let file = write_orders(
        "id,userId,side,price,size\n\
         a1,alice,sell,10,3\n\
         a2,,sell,11,2\n\
         a3,carol,sell,12,2\n",
    );

    let err = load_orders_from_path(file.path()).unwrap_err();

    match err {
        LoadError::InvalidRecord { line, source } => {
            assert_eq!(line, 2);
            assert_eq!(source, MatchingError::InvalidOrder("userId is required".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_sample_book_is_uncrossed() {
    let summary = load_sample().unwrap();

    assert_eq!(summary.orders_loaded, 20);
    assert_eq!(summary.trades_executed, 4);
    assert_eq!(summary.engine.best_bid(), Some(dec!(99.50)));
    assert_eq!(summary.engine.best_ask(), Some(dec!(100.75)));
}

#[test]
fn test_load_report_json() {
    let summary = load_sample().unwrap();
    let report = LoadReport::new(&summary, 3, 2);
    let value: serde_json::Value = serde_json::from_str(&to_json(&report).unwrap()).unwrap();

    assert_eq!(value["ordersLoaded"], 20);
    assert_eq!(value["book"]["bids"].as_array().unwrap().len(), 3);
    assert_eq!(value["recentTrades"].as_array().unwrap().len(), 2);
}
