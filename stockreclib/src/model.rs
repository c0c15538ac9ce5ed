//! Доменные модели — строка выгрузки MB51 и ledger как упорядоченный набор строк.

use crate::error::{Result, StockrecError};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Идентичность строки: позиция в исходной выгрузке, назначается при чтении.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(pub usize);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovementRecord {
    pub id: RecordId,
    pub posting_date: NaiveDate,
    pub material: String,
    pub material_description: String,
    pub purchase_order: Option<String>,
    /// Значим только первый токен до пробела.
    pub document_header_text: Option<String>,
    pub quantity: Decimal,
    pub unit_of_entry: String,
    pub movement_type: Option<u16>,
    pub amount_local_currency: Decimal,
    pub storage_location: Option<u32>,
    pub vendor: String,
    pub cost_center: String,
    pub material_document: String,
    pub reference: String,
    /// Прочие колонки выгрузки, переносятся без изменений.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl MovementRecord {
    /// Минимальная строка: дата, материал, вид движения, количество и сумма.
    /// Остальные поля пустые.
    pub fn new(
        id: RecordId,
        posting_date: NaiveDate,
        material: impl Into<String>,
        movement_type: u16,
        quantity: Decimal,
        amount_local_currency: Decimal,
    ) -> Self {
        Self {
            id,
            posting_date,
            material: material.into(),
            material_description: String::new(),
            purchase_order: None,
            document_header_text: None,
            quantity,
            unit_of_entry: String::new(),
            movement_type: Some(movement_type),
            amount_local_currency,
            storage_location: None,
            vendor: String::new(),
            cost_center: String::new(),
            material_document: String::new(),
            reference: String::new(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_purchase_order(mut self, po: impl Into<String>) -> Self {
        self.purchase_order = Some(po.into());
        self
    }

    pub fn with_header_text(mut self, text: impl Into<String>) -> Self {
        self.document_header_text = Some(text.into());
        self
    }

    pub fn with_storage_location(mut self, sloc: u32) -> Self {
        self.storage_location = Some(sloc);
        self
    }

    /// Первое слово текста заголовка — номер документа; остальное в отчёт не идёт.
    pub fn header_token(&self) -> Option<&str> {
        self.document_header_text
            .as_deref()
            .and_then(|text| text.split_whitespace().next())
    }

    pub fn is_type(&self, movement_type: u16) -> bool {
        self.movement_type == Some(movement_type)
    }
}

/// Полный набор строк одного прогона сверки.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    /// Имена дополнительных колонок в порядке исходного файла.
    pub extra_columns: Vec<String>,
    records: Vec<MovementRecord>,
}

impl Ledger {
    /// Назначает идентичности по позиции, затирая те, что были в записях.
    pub fn new(records: Vec<MovementRecord>) -> Self {
        let records = records
            .into_iter()
            .enumerate()
            .map(|(i, mut r)| {
                r.id = RecordId(i);
                r
            })
            .collect();
        Self {
            extra_columns: Vec::new(),
            records,
        }
    }

    /// Сохраняет идентичности записей как есть; повтор идентичности — ошибка.
    pub fn from_records(records: Vec<MovementRecord>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for r in &records {
            if !seen.insert(r.id) {
                return Err(StockrecError::DuplicateRecordId(r.id));
            }
        }
        Ok(Self {
            extra_columns: Vec::new(),
            records,
        })
    }

    pub fn with_extra_columns(mut self, columns: Vec<String>) -> Self {
        self.extra_columns = columns;
        self
    }

    pub fn records(&self) -> &[MovementRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<MovementRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Сторнирующие движения вида `target`.
    pub fn reversals(&self, target: u16) -> impl Iterator<Item = &MovementRecord> {
        self.records.iter().filter(move |r| r.is_type(target))
    }

    /// Исходные движения вида `target - 1`.
    pub fn originals(&self, target: u16) -> impl Iterator<Item = &MovementRecord> {
        let counterpart = target.checked_sub(1);
        self.records
            .iter()
            .filter(move |r| counterpart.is_some() && r.movement_type == counterpart)
    }
}
