//! Ключ связи сторно с исходными движениями.

use crate::model::MovementRecord;

/// Для этого вида сторно номер документа лежит в заказе на поставку;
/// остальные виды пишут его первым словом текста заголовка документа.
pub const PURCHASE_ORDER_KEYED_TYPE: u16 = 102;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchKey<'a> {
    pub material: &'a str,
    pub document: &'a str,
}

/// Номер документа, по которому ищутся пары. `None` — строка ни с чем не сопоставляется.
pub fn document_key(record: &MovementRecord, target_type: u16) -> Option<&str> {
    if target_type == PURCHASE_ORDER_KEYED_TYPE {
        record
            .purchase_order
            .as_deref()
            .map(str::trim)
            .filter(|po| !po.is_empty())
    } else {
        record.header_token()
    }
}

pub fn derive_key(record: &MovementRecord, target_type: u16) -> Option<MatchKey<'_>> {
    document_key(record, target_type).map(|document| MatchKey {
        material: record.material.as_str(),
        document,
    })
}
