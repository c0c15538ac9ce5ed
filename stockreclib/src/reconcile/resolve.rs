//! Выбор исходного движения для одного сторно и запись решения в план.

use super::classify::{Candidate, Settlement};
use super::plan::{Adjustment, Plan};
use crate::{
    error::{Result, StockrecError},
    model::{MovementRecord, RecordId},
};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Удаляются обе строки.
    Exact { original: RecordId },
    /// Исходное движение уменьшается, удаляется только сторно.
    Partial { original: RecordId, adjustment: Adjustment },
    /// Удаляются обе строки, остаток исходного количества теряется.
    Overshoot { original: RecordId },
    /// Пары нет, сторно остаётся как есть.
    Unmatched,
}

/// Приоритет: точное совпадение, затем частичное, затем перебор.
/// Внутри вида берётся первый кандидат в порядке ledger.
/// Переполнение при пересчёте — ошибка всей партии, план дальше не используется.
pub fn resolve(
    reversal: &MovementRecord,
    candidates: &[Candidate<'_>],
    plan: &mut Plan,
) -> Result<Outcome> {
    let first = |kind: Settlement| {
        candidates
            .iter()
            .find(|c| c.settlement == kind)
            .map(|c| c.original)
    };

    if let Some(original) = first(Settlement::Exact) {
        plan.delete(reversal.id);
        plan.delete(original.id);
        return Ok(Outcome::Exact { original: original.id });
    }

    if let Some(original) = first(Settlement::Partial) {
        let adjustment = reduce(plan.current(original), reversal.quantity)
            .ok_or(StockrecError::Arithmetic(original.id))?;
        plan.adjust(original.id, adjustment);
        plan.delete(reversal.id);
        return Ok(Outcome::Partial { original: original.id, adjustment });
    }

    if let Some(original) = first(Settlement::Overshoot) {
        plan.delete(reversal.id);
        plan.delete(original.id);
        return Ok(Outcome::Overshoot { original: original.id });
    }

    Ok(Outcome::Unmatched)
}

/// Новое количество и сумма по цене за единицу исходной строки.
/// `None` — результат не помещается в Decimal.
fn reduce(current: Adjustment, reversal_qty: Decimal) -> Option<Adjustment> {
    let quantity = current.quantity.checked_add(reversal_qty)?;
    let unit_price = if current.quantity.is_zero() {
        Decimal::ZERO
    } else {
        current.amount.abs().checked_div(current.quantity.abs())?
    };
    Some(Adjustment {
        quantity,
        amount: quantity.checked_mul(unit_price)?,
    })
}
