//! Выгрузка MB51, сохранённая как CSV. Заголовки — как в SAP:
//! Posting Date,Material,Material Description,Purchase order,Qty in unit of entry,Vendor,Movement type,
//! Document Header Text,Unit of Entry,Amt.in loc.cur.,Cost Center,Material Document,Storage Location,Reference
//!
//! Прочие колонки допускаются и переносятся в вывод после обязательных; колонка без
//! заголовка получает имя "Unnamed: N" по своей позиции.
//! В Document Header Text отчёт пишет только первое слово.

use crate::{
    error::{Result, StockrecError},
    model::{Ledger, MovementRecord, RecordId},
};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::str::FromStr;

pub const REQUIRED_COLUMNS: [&str; 14] = [
    "Posting Date",
    "Material",
    "Material Description",
    "Purchase order",
    "Qty in unit of entry",
    "Vendor",
    "Movement type",
    "Document Header Text",
    "Unit of Entry",
    "Amt.in loc.cur.",
    "Cost Center",
    "Material Document",
    "Storage Location",
    "Reference",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d.%m.%Y", "%m/%d/%Y"];

// короткие строки (flexible) добиваются пустыми значениями
#[derive(Default, serde::Deserialize)]
#[serde(default)]
struct Mb51Row {
    #[serde(rename = "Posting Date")]
    posting_date: String,
    #[serde(rename = "Material")]
    material: String,
    #[serde(rename = "Material Description")]
    material_description: String,
    #[serde(rename = "Purchase order")]
    purchase_order: String,
    #[serde(rename = "Qty in unit of entry")]
    quantity: String,
    #[serde(rename = "Vendor")]
    vendor: String,
    #[serde(rename = "Movement type")]
    movement_type: String,
    #[serde(rename = "Document Header Text")]
    document_header_text: String,
    #[serde(rename = "Unit of Entry")]
    unit_of_entry: String,
    #[serde(rename = "Amt.in loc.cur.")]
    amount: String,
    #[serde(rename = "Cost Center")]
    cost_center: String,
    #[serde(rename = "Material Document")]
    material_document: String,
    #[serde(rename = "Storage Location")]
    storage_location: String,
    #[serde(rename = "Reference")]
    reference: String,
}

pub struct Mb51Csv;

impl crate::traits::ReadFormat for Mb51Csv {
    fn read<R: BufRead>(r: R) -> Result<Ledger> {
        let mut rdr = ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(r);

        // Excel любит BOM в начале файла
        let headers: StringRecord = rdr
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim())
            .collect();

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|c| !headers.iter().any(|h| h == **c))
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(StockrecError::MissingColumns(missing));
        }

        let extra_columns: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !REQUIRED_COLUMNS.contains(h))
            .map(|(i, h)| {
                let name = if h.is_empty() { format!("Unnamed: {i}") } else { h.to_string() };
                (i, name)
            })
            .collect();

        let mut records = Vec::new();
        let mut dropped = 0usize;

        for (pos, rec) in rdr.records().enumerate() {
            let rec = rec?;
            let row: Mb51Row = rec.deserialize(Some(&headers))?;
            // строка 1 — заголовок
            let line = pos + 2;

            if row.posting_date.is_empty() {
                dropped += 1;
                continue;
            }
            let posting_date = parse_date(&row.posting_date)
                .map_err(|e| StockrecError::Parse(format!("row {line}: Posting Date: {e}")))?;

            let extra: BTreeMap<String, String> = extra_columns
                .iter()
                .map(|(i, name)| (name.clone(), rec.get(*i).unwrap_or_default().to_string()))
                .collect();

            records.push(MovementRecord {
                id: RecordId(pos),
                posting_date,
                material: row.material,
                material_description: row.material_description,
                purchase_order: non_empty(row.purchase_order),
                document_header_text: non_empty(row.document_header_text),
                quantity: lenient_decimal(&row.quantity),
                unit_of_entry: row.unit_of_entry,
                movement_type: parse_code(&row.movement_type),
                amount_local_currency: lenient_decimal(&row.amount),
                storage_location: parse_code(&row.storage_location),
                vendor: row.vendor,
                cost_center: row.cost_center,
                material_document: row.material_document,
                reference: row.reference,
                extra,
            });
        }

        if dropped > 0 {
            tracing::debug!(dropped, "rows without posting date skipped");
        }

        let extra_columns = extra_columns.into_iter().map(|(_, name)| name).collect();
        Ok(Ledger::from_records(records)?.with_extra_columns(extra_columns))
    }
}

impl crate::traits::WriteFormat for Mb51Csv {
    fn write<W: Write>(mut w: W, ledger: &Ledger) -> Result<()> {
        let mut wrt = WriterBuilder::new().from_writer(&mut w);

        let header = REQUIRED_COLUMNS
            .iter()
            .copied()
            .chain(ledger.extra_columns.iter().map(String::as_str));
        wrt.write_record(header)?;

        for r in ledger.records() {
            let mut out = vec![
                r.posting_date.format("%Y-%m-%d").to_string(),
                r.material.clone(),
                r.material_description.clone(),
                r.purchase_order.clone().unwrap_or_default(),
                r.quantity.normalize().to_string(),
                r.vendor.clone(),
                r.movement_type.map(|t| t.to_string()).unwrap_or_default(),
                r.header_token().unwrap_or_default().to_string(),
                r.unit_of_entry.clone(),
                r.amount_local_currency.normalize().to_string(),
                r.cost_center.clone(),
                r.material_document.clone(),
                r.storage_location.map(|s| s.to_string()).unwrap_or_default(),
                r.reference.clone(),
            ];
            for col in &ledger.extra_columns {
                out.push(r.extra.get(col).cloned().unwrap_or_default());
            }
            wrt.write_record(&out)?;
        }
        wrt.flush()?;
        Ok(())
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Дата с необязательной частью времени: "2025-03-14 00:00:00", "14.03.2025".
fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    let day = s.split([' ', 'T']).next().unwrap_or_default();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(day, f).ok())
        .ok_or_else(|| format!("unrecognized date {s:?}"))
}

/// Нечисловое или пустое значение считается нулём.
fn lenient_decimal(s: &str) -> Decimal {
    if s.is_empty() {
        return Decimal::ZERO;
    }
    if let Ok(d) = Decimal::from_str(s) {
        return d;
    }
    if s.contains(',') && !s.contains('.') {
        if let Ok(d) = Decimal::from_str(&s.replace(',', ".")) {
            return d;
        }
    }
    Decimal::from_scientific(s).unwrap_or(Decimal::ZERO)
}

/// Целочисленный код; "101.0" из выгрузок Excel тоже принимается.
fn parse_code<T: FromStr>(s: &str) -> Option<T> {
    let s = s.strip_suffix(".0").unwrap_or(s);
    s.parse().ok()
}
