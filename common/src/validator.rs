//! 相互参照検証モジュール
//!
//! - strings の (Topic, Subtopic, Industry) が classifications に存在するか
//! - classifications の必須フィールドが空でないか
//!
//! どちらも最初のエラーで止めず、全件を行→フィールド順で報告する。

use crate::record::Record;
use crate::schema::CLASSIFICATIONS_HEADERS;
use crate::types::{ClassificationsRow, RowValidationError, StringsRow, ValidationReport};
use std::collections::HashSet;

/// stringsデータを classifications と照合する
pub fn validate_strings(strings: &[Record], classifications: &[Record]) -> ValidationReport {
    let valid_combinations: HashSet<String> = classifications
        .iter()
        .map(|record| ClassificationsRow::from_record(record).combination_key())
        .collect();

    let errors = strings
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let row = StringsRow::from_record(record);
            if valid_combinations.contains(&row.combination_key()) {
                return None;
            }
            Some(RowValidationError {
                index,
                row: record.clone(),
                error: format!(
                    "Invalid combination: Topic \"{}\", SubTopic \"{}\", Industry \"{}\" not found in classifications",
                    row.topic, row.subtopic, row.industry
                ),
            })
        })
        .collect();

    ValidationReport::from_errors(errors)
}

/// classificationsデータの必須フィールドを検証する
pub fn validate_classifications(rows: &[Record]) -> ValidationReport {
    let mut errors = Vec::new();

    for (index, record) in rows.iter().enumerate() {
        for field in CLASSIFICATIONS_HEADERS {
            let blank = record.get(field).map(|v| v.trim().is_empty()).unwrap_or(true);
            if blank {
                errors.push(RowValidationError {
                    index,
                    row: record.clone(),
                    error: format!("{} field is required", field),
                });
            }
        }
    }

    ValidationReport::from_errors(errors)
}
