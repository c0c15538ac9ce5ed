//! Сверка сторнирующих движений (T) с исходными (T − 1).
//!
//! Один проход по сторно в порядке ledger: ключи строятся один раз, решения
//! копятся в [`Plan`], изменения применяются в самом конце. До этого момента
//! исходные строки видны всем последующим сторно, в том числе уже выбранные.

pub mod classify;
pub mod key;
pub mod plan;
pub mod resolve;

pub use classify::{classify, Settlement};
pub use key::{derive_key, MatchKey};
pub use plan::{remap_storage_location, Adjustment, Plan};
pub use resolve::Outcome;

use crate::{
    error::{Result, StockrecError},
    model::{Ledger, MovementRecord},
};
use std::collections::HashMap;
use std::fmt;

/// Итог одного прогона.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub records: Vec<MovementRecord>,
    pub summary: Summary,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub target_type: u16,
    pub reversals: usize,
    pub exact: usize,
    pub partial: usize,
    pub overshoot: usize,
    pub unmatched: usize,
    pub removed: usize,
    pub adjusted: usize,
    pub remapped: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type {}: {} reversals (exact {}, partial {}, overshoot {}, unmatched {}); \
             removed {}, adjusted {}, remapped {}",
            self.target_type,
            self.reversals,
            self.exact,
            self.partial,
            self.overshoot,
            self.unmatched,
            self.removed,
            self.adjusted,
            self.remapped,
        )
    }
}

pub fn reconcile(ledger: &Ledger, target_type: u16) -> Result<Vec<MovementRecord>> {
    reconcile_with_summary(ledger, target_type).map(|r| r.records)
}

pub fn reconcile_with_summary(ledger: &Ledger, target_type: u16) -> Result<Reconciliation> {
    if target_type == 0 {
        return Err(StockrecError::InvalidTargetType(target_type));
    }

    let mut groups: HashMap<MatchKey<'_>, Vec<&MovementRecord>> = HashMap::new();
    for original in ledger.originals(target_type) {
        if let Some(key) = derive_key(original, target_type) {
            groups.entry(key).or_default().push(original);
        }
    }

    let mut plan = Plan::new();
    let mut summary = Summary {
        target_type,
        ..Summary::default()
    };

    for reversal in ledger.reversals(target_type) {
        summary.reversals += 1;
        let originals = derive_key(reversal, target_type)
            .and_then(|key| groups.get(&key))
            .map(Vec::as_slice)
            .unwrap_or_default();
        let candidates = classify::classify_candidates(reversal, originals);

        match resolve::resolve(reversal, &candidates, &mut plan)? {
            Outcome::Exact { original } => {
                summary.exact += 1;
                tracing::debug!(reversal = %reversal.id, %original, "exact match");
            }
            Outcome::Partial { original, adjustment } => {
                summary.partial += 1;
                tracing::debug!(
                    reversal = %reversal.id,
                    %original,
                    quantity = %adjustment.quantity,
                    amount = %adjustment.amount,
                    "partial match, original reduced"
                );
            }
            Outcome::Overshoot { original } => {
                summary.overshoot += 1;
                tracing::debug!(reversal = %reversal.id, %original, "overshoot, remainder dropped");
            }
            Outcome::Unmatched => {
                summary.unmatched += 1;
                tracing::debug!(reversal = %reversal.id, "no counterpart, kept");
            }
        }
    }

    let mut records = plan.apply(ledger.records());
    summary.removed = ledger.len() - records.len();
    summary.adjusted = plan.surviving_adjustments();
    summary.remapped = remap_storage_location(&mut records);

    tracing::debug!(
        target_type,
        reversals = summary.reversals,
        exact = summary.exact,
        partial = summary.partial,
        overshoot = summary.overshoot,
        unmatched = summary.unmatched,
        removed = summary.removed,
        adjusted = summary.adjusted,
        remapped = summary.remapped,
        "reconciliation finished"
    );

    Ok(Reconciliation { records, summary })
}
