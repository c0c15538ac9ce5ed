//! stockreclib — чтение выгрузок движений запаса (MB51) и сверка сторно с исходными движениями

pub mod error;
pub mod model;
pub mod reconcile;
pub mod traits;

pub mod formats {
    pub mod csv;
    pub mod xml;
}

pub use reconcile::{reconcile, reconcile_with_summary, Reconciliation, Summary};
