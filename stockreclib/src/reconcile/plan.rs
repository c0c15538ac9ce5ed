//! Отложенные изменения ledger и их применение за один проход.

use crate::model::{MovementRecord, RecordId};
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashMap};

/// Склад 1000 в отчётах сводится к складу 8888.
pub const STORAGE_LOCATION_FROM: u32 = 1000;
pub const STORAGE_LOCATION_TO: u32 = 8888;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjustment {
    pub quantity: Decimal,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct Plan {
    deletions: BTreeSet<RecordId>,
    adjustments: HashMap<RecordId, Adjustment>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delete(&mut self, id: RecordId) {
        self.deletions.insert(id);
    }

    pub fn adjust(&mut self, id: RecordId, adjustment: Adjustment) {
        self.adjustments.insert(id, adjustment);
    }

    pub fn is_deleted(&self, id: RecordId) -> bool {
        self.deletions.contains(&id)
    }

    pub fn adjustment(&self, id: RecordId) -> Option<Adjustment> {
        self.adjustments.get(&id).copied()
    }

    /// Количество и сумма строки с учётом уже запланированной корректировки.
    pub fn current(&self, record: &MovementRecord) -> Adjustment {
        self.adjustment(record.id).unwrap_or(Adjustment {
            quantity: record.quantity,
            amount: record.amount_local_currency,
        })
    }

    pub fn deletions(&self) -> &BTreeSet<RecordId> {
        &self.deletions
    }

    /// Число корректировок, переживших удаление.
    pub fn surviving_adjustments(&self) -> usize {
        self.adjustments
            .keys()
            .filter(|id| !self.deletions.contains(id))
            .count()
    }

    /// Применяет корректировки, затем отбрасывает удалённые строки.
    /// Порядок выживших строк не меняется, исходный срез не трогается.
    pub fn apply(&self, records: &[MovementRecord]) -> Vec<MovementRecord> {
        records
            .iter()
            .filter(|r| !self.is_deleted(r.id))
            .map(|r| {
                let mut out = r.clone();
                if let Some(adj) = self.adjustment(r.id) {
                    out.quantity = adj.quantity;
                    out.amount_local_currency = adj.amount;
                }
                out
            })
            .collect()
    }
}

/// Перекодирует склад 1000 в 8888. Повторный вызов ничего не меняет.
/// Возвращает число перекодированных строк.
pub fn remap_storage_location(records: &mut [MovementRecord]) -> usize {
    let mut remapped = 0;
    for r in records.iter_mut() {
        if r.storage_location == Some(STORAGE_LOCATION_FROM) {
            r.storage_location = Some(STORAGE_LOCATION_TO);
            remapped += 1;
        }
    }
    remapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(id: usize, qty: i64) -> MovementRecord {
        MovementRecord::new(
            RecordId(id),
            NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            "M",
            101,
            Decimal::new(qty, 0),
            Decimal::new(qty * 10, 0),
        )
    }

    #[test]
    fn apply_keeps_order_and_input() {
        let records = vec![rec(0, 1), rec(1, 2), rec(2, 3), rec(3, 4)];
        let mut plan = Plan::new();
        plan.delete(RecordId(1));
        plan.adjust(
            RecordId(2),
            Adjustment { quantity: Decimal::new(-1, 0), amount: Decimal::new(-10, 0) },
        );

        let out = plan.apply(&records);
        let ids: Vec<_> = out.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![0, 2, 3]);
        assert_eq!(out[1].quantity, Decimal::new(-1, 0));
        assert_eq!(out[1].amount_local_currency, Decimal::new(-10, 0));
        assert_eq!(records[2].quantity, Decimal::new(3, 0));
    }

    #[test]
    fn deletion_wins_over_adjustment() {
        let records = vec![rec(0, 5)];
        let mut plan = Plan::new();
        plan.adjust(RecordId(0), Adjustment { quantity: Decimal::ONE, amount: Decimal::ONE });
        plan.delete(RecordId(0));
        assert!(plan.apply(&records).is_empty());
        assert_eq!(plan.surviving_adjustments(), 0);
    }

    #[test]
    fn remap_is_idempotent() {
        let mut records = vec![
            rec(0, 1).with_storage_location(1000),
            rec(1, 1).with_storage_location(9999),
            rec(2, 1),
        ];
        assert_eq!(remap_storage_location(&mut records), 1);
        let once = records.clone();
        assert_eq!(remap_storage_location(&mut records), 0);
        assert_eq!(records, once);
        assert_eq!(records[0].storage_location, Some(8888));
        assert_eq!(records[1].storage_location, Some(9999));
        assert_eq!(records[2].storage_location, None);
    }
}
