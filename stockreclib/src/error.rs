//! Единый тип ошибок публичного API.

use crate::model::RecordId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StockrecError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Missing required columns: {0:?}")]
    MissingColumns(Vec<String>),

    /// Нарушение инварианта ledger: партия отклоняется целиком.
    #[error("Duplicate record identity: {0}")]
    DuplicateRecordId(RecordId),

    /// Переполнение Decimal при пересчёте количества или суммы строки.
    #[error("Arithmetic overflow while adjusting record {0}")]
    Arithmetic(RecordId),

    #[error("Invalid target movement type: {0}")]
    InvalidTargetType(u16),
}

pub type Result<T> = std::result::Result<T, StockrecError>;
