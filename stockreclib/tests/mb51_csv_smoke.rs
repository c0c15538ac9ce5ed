use stockreclib::{
    error::StockrecError,
    formats::csv::Mb51Csv,
    model::RecordId,
    traits::ReadFormat,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::io::Cursor;

const HEADER: &str = "Posting Date,Material,Material Description,Purchase order,Qty in unit of entry,Vendor,Movement type,Document Header Text,Unit of Entry,Amt.in loc.cur.,Cost Center,Material Document,Storage Location,Reference";

#[test]
fn mb51_read_minimal() {
    let input = format!(
        "{HEADER}\n\
         14.03.2025,MAT-1,Bolt,4500000001,-7,V1,102.0,  HDR-9 annulation,PC,\"-70,00\",CC,5000000002,1000,R\n"
    );
    let ledger = Mb51Csv::read(Cursor::new(input)).expect("mb51 read");
    assert_eq!(ledger.len(), 1);
    let r = &ledger.records()[0];
    assert_eq!(r.id, RecordId(0));
    assert_eq!(r.posting_date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
    assert_eq!(r.movement_type, Some(102));
    assert_eq!(r.quantity, Decimal::new(-7, 0));
    assert_eq!(r.amount_local_currency, Decimal::new(-70, 0));
    assert_eq!(r.purchase_order.as_deref(), Some("4500000001"));
    assert_eq!(r.document_header_text.as_deref(), Some("HDR-9 annulation"));
    assert_eq!(r.storage_location, Some(1000));
}

#[test]
fn rows_without_posting_date_are_dropped_but_keep_positions() {
    let input = format!(
        "{HEADER}\n\
         2025-01-02,A,,PO1,5,,101,,PC,50,,,,\n\
         ,A,,PO1,-5,,102,,PC,-50,,,,\n\
         2025-01-03,A,,PO1,-5,,102,,PC,-50,,,,\n"
    );
    let ledger = Mb51Csv::read(Cursor::new(input)).expect("mb51 read");
    let ids: Vec<_> = ledger.records().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![RecordId(0), RecordId(2)]);
}

#[test]
fn non_numeric_quantities_become_zero() {
    let input = format!(
        "{HEADER}\n\
         2025-01-02,A,,PO1,abc,,101,,PC,,,,SL,\n"
    );
    let ledger = Mb51Csv::read(Cursor::new(input)).expect("mb51 read");
    let r = &ledger.records()[0];
    assert!(r.quantity.is_zero());
    assert!(r.amount_local_currency.is_zero());
    assert_eq!(r.storage_location, None);
}

#[test]
fn missing_columns_are_listed() {
    let input = "Posting Date,Material,Qty in unit of entry\n2025-01-02,A,1\n";
    match Mb51Csv::read(Cursor::new(input)) {
        Err(StockrecError::MissingColumns(cols)) => {
            assert_eq!(cols.len(), 11);
            assert_eq!(cols[0], "Material Description");
            assert!(cols.contains(&"Amt.in loc.cur.".to_string()));
        }
        other => panic!("expected MissingColumns, got {other:?}"),
    }
}

#[test]
fn bad_posting_date_names_the_row() {
    let input = format!("{HEADER}\nsoon,A,,PO1,5,,101,,PC,50,,,,\n");
    let err = Mb51Csv::read(Cursor::new(input)).unwrap_err();
    assert!(err.to_string().contains("row 2"), "{err}");
}
