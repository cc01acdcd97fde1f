//! フィールド名の正規化
//!
//! アップロード直後に一度だけ適用し、列名の前後空白を除去する。
//! 値と行の順序は変更しない。

use crate::record::Record;

/// 全行のフィールド名を trim する
///
/// trim後に同名になったフィールドは後勝ち（位置は先のものを維持）。
pub fn normalize(rows: Vec<Record>) -> Vec<Record> {
    rows.into_iter().map(normalize_record).collect()
}

pub fn normalize_record(record: Record) -> Record {
    record
        .into_iter()
        .map(|(key, value)| (key.trim().to_string(), value))
        .collect()
}
