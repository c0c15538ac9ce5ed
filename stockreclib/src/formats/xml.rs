//! Упрощённый XML: <Ledger><column/>...<record>...</record></Ledger>

use crate::{
    error::{Result, StockrecError},
    model::{Ledger, MovementRecord, RecordId},
};
use chrono::NaiveDate;
use quick_xml::{de::from_reader, se::to_string};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

#[derive(Serialize, Deserialize, Debug)]
struct XmlField {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "$text", default)]
    value: String,
}

#[derive(Serialize, Deserialize, Debug)]
struct XmlRecord {
    id: usize,
    posting_date: String,
    #[serde(default)]
    material: String,
    #[serde(default)]
    material_description: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    purchase_order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    document_header_text: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    quantity: Decimal,
    #[serde(default)]
    unit_of_entry: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    movement_type: Option<u16>,
    #[serde(with = "rust_decimal::serde::str")]
    amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    storage_location: Option<u32>,
    #[serde(default)]
    vendor: String,
    #[serde(default)]
    cost_center: String,
    #[serde(default)]
    material_document: String,
    #[serde(default)]
    reference: String,
    #[serde(rename = "field", default)]
    extra: Vec<XmlField>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename = "Ledger")]
struct XmlLedger {
    #[serde(rename = "column", default)]
    columns: Vec<String>,
    #[serde(rename = "record", default)]
    records: Vec<XmlRecord>,
}

pub struct SimpleXml;

impl crate::traits::ReadFormat for SimpleXml {
    fn read<R: BufRead>(r: R) -> Result<Ledger> {
        let x: XmlLedger = from_reader(r).map_err(|e| StockrecError::Xml(format!("{e}")))?;

        let mut records = Vec::with_capacity(x.records.len());
        for e in x.records {
            let posting_date = NaiveDate::parse_from_str(&e.posting_date, "%Y-%m-%d")
                .map_err(|err| StockrecError::Parse(format!("record {}: {err}", e.id)))?;
            records.push(MovementRecord {
                id: RecordId(e.id),
                posting_date,
                material: e.material,
                material_description: e.material_description,
                purchase_order: e.purchase_order,
                document_header_text: e.document_header_text,
                quantity: e.quantity,
                unit_of_entry: e.unit_of_entry,
                movement_type: e.movement_type,
                amount_local_currency: e.amount,
                storage_location: e.storage_location,
                vendor: e.vendor,
                cost_center: e.cost_center,
                material_document: e.material_document,
                reference: e.reference,
                extra: e.extra.into_iter().map(|f| (f.name, f.value)).collect(),
            });
        }

        // идентичности из файла сохраняются, повтор — ошибка всей партии
        Ok(Ledger::from_records(records)?.with_extra_columns(x.columns))
    }
}

impl crate::traits::WriteFormat for SimpleXml {
    fn write<W: Write>(mut w: W, ledger: &Ledger) -> Result<()> {
        let records = ledger
            .records()
            .iter()
            .map(|r| XmlRecord {
                id: r.id.0,
                posting_date: r.posting_date.format("%Y-%m-%d").to_string(),
                material: r.material.clone(),
                material_description: r.material_description.clone(),
                purchase_order: r.purchase_order.clone(),
                document_header_text: r.document_header_text.clone(),
                quantity: r.quantity.normalize(),
                unit_of_entry: r.unit_of_entry.clone(),
                movement_type: r.movement_type,
                amount: r.amount_local_currency.normalize(),
                storage_location: r.storage_location,
                vendor: r.vendor.clone(),
                cost_center: r.cost_center.clone(),
                material_document: r.material_document.clone(),
                reference: r.reference.clone(),
                extra: ledger
                    .extra_columns
                    .iter()
                    .filter_map(|c| {
                        r.extra.get(c).map(|v| XmlField {
                            name: c.clone(),
                            value: v.clone(),
                        })
                    })
                    .collect(),
            })
            .collect();

        let x = XmlLedger {
            columns: ledger.extra_columns.clone(),
            records,
        };

        let s = to_string(&x).map_err(|e| StockrecError::Xml(format!("{e}")))?;
        w.write_all(s.as_bytes())?;
        Ok(())
    }
}
