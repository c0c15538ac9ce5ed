//! Классификация пары «исходное движение + сторно» по знаку суммы количеств.

use crate::model::MovementRecord;
use rust_decimal::Decimal;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Сумма равна нулю: сторно полностью гасит исходное движение.
    Exact,
    /// Сумма больше нуля ("positive" в терминах склада).
    Overshoot,
    /// Сумма меньше нуля: исходное движение остаётся с уменьшенным количеством.
    Partial,
}

#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub original: &'a MovementRecord,
    pub settlement: Settlement,
}

/// Знак `original + reversal` без допуска. Сравнение `original` с `-reversal`
/// даёт тот же знак и не переполняется на краях диапазона Decimal.
pub fn classify(original_qty: Decimal, reversal_qty: Decimal) -> Settlement {
    match original_qty.cmp(&-reversal_qty) {
        Ordering::Equal => Settlement::Exact,
        Ordering::Greater => Settlement::Overshoot,
        Ordering::Less => Settlement::Partial,
    }
}

/// Порядок кандидатов сохраняется — это порядок строк в ledger.
pub fn classify_candidates<'a>(
    reversal: &MovementRecord,
    originals: &[&'a MovementRecord],
) -> Vec<Candidate<'a>> {
    originals
        .iter()
        .map(|&original| Candidate {
            original,
            settlement: classify(original.quantity, reversal.quantity),
        })
        .collect()
}
