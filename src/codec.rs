//! CSV読み書きモジュール
//!
//! ヘッダー行付きUTF-8 CSVをレコード列に変換し、
//! 明示したヘッダー順でCSVに書き戻す。

use crate::error::{CsvEditorError, Result};
use csv::{ReaderBuilder, Terminator, WriterBuilder};
use csv_editor_common::Record;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// パース結果（行＋元のヘッダー順）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    /// 行（キーはファイル上のヘッダー名そのまま）
    pub rows: Vec<Record>,
    /// 前後空白を除いたヘッダー名
    pub headers: Vec<String>,
}

/// CSVファイルを読み込む
pub fn parse(path: &Path) -> Result<Dataset> {
    let file = File::open(path)?;
    parse_reader(BufReader::new(file))
}

pub fn parse_bytes(bytes: &[u8]) -> Result<Dataset> {
    parse_reader(bytes)
}

/// 列数不一致・不正なUTF-8は行単位のエラーとして全体を失敗させる
///
/// 前後空白を除いて重複する列名は BadRequest。
pub fn parse_reader<R: Read>(reader: R) -> Result<Dataset> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let raw_headers = reader.headers()?.clone();
    let headers: Vec<String> = raw_headers.iter().map(|h| h.trim().to_string()).collect();

    let mut seen = HashSet::new();
    if let Some(duplicate) = headers.iter().find(|h| !seen.insert(*h)) {
        return Err(CsvEditorError::BadRequest(format!(
            "Duplicate column name: {}",
            duplicate
        )));
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row: Record = raw_headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.to_string(), value.to_string()))
            .collect();
        rows.push(row);
    }

    Ok(Dataset { rows, headers })
}

/// ヘッダー順に従ってCSVテキストを生成する
///
/// 行に無い列は空欄、ヘッダーに無いキーは出力しない。
pub fn to_bytes(rows: &[Record], headers: &[String]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(headers.iter().map(|h| row.value(h)))?;
    }

    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(bytes)
}

/// CSVを書き出す
///
/// 一時ファイルに書いてからrenameするので、失敗しても既存ファイルは残る。
pub fn write(rows: &[Record], headers: &[String], path: &Path) -> Result<()> {
    let bytes = to_bytes(rows, headers)?;
    let tmp = temp_path_for(path);

    if let Err(err) = std::fs::write(&tmp, &bytes).and_then(|_| std::fs::rename(&tmp, path)) {
        let _ = std::fs::remove_file(&tmp);
        return Err(err.into());
    }

    log::debug!("wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "data.csv".to_string());
    path.with_file_name(format!("{}.tmp", file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLASSIFICATIONS_CSV: &str =
        "Topic,SubTopic,Industry,Classification\nT1,ST1,Ind1,C1\nT2,ST2,Ind2,C2\n";

    #[test]
    fn test_parse_bytes() {
        let dataset = parse_bytes(CLASSIFICATIONS_CSV.as_bytes()).unwrap();
        assert_eq!(dataset.headers, vec!["Topic", "SubTopic", "Industry", "Classification"]);
        assert_eq!(dataset.rows.len(), 2);
        assert_eq!(dataset.rows[0].get("Topic"), Some("T1"));
        assert_eq!(dataset.rows[1].get("Classification"), Some("C2"));
    }

    #[test]
    fn test_headers_trimmed_keys_raw() {
        let dataset = parse_bytes(b" Topic , SubTopic\nT1,ST1\n").unwrap();
        assert_eq!(dataset.headers, vec!["Topic", "SubTopic"]);
        assert_eq!(dataset.rows[0].get(" Topic "), Some("T1"));
        assert_eq!(dataset.rows[0].get("Topic"), None);
    }

    #[test]
    fn test_values_are_not_coerced() {
        let dataset = parse_bytes(b"Tier,Prompt\n007,\"  quoted, value \"\n").unwrap();
        assert_eq!(dataset.rows[0].get("Tier"), Some("007"));
        assert_eq!(dataset.rows[0].get("Prompt"), Some("  quoted, value "));
    }

    #[test]
    fn test_unequal_lengths_fail() {
        let result = parse_bytes(b"A,B,C\n1,2,3\n4,5\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_headers_rejected() {
        let result = parse_bytes(b"Topic, Topic ,Industry\nA,B,Ind1\n");
        match result {
            Err(CsvEditorError::BadRequest(message)) => {
                assert_eq!(message, "Duplicate column name: Topic")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_empty_input() {
        let dataset = parse_bytes(b"").unwrap();
        assert!(dataset.headers.is_empty());
        assert!(dataset.rows.is_empty());
    }

    #[test]
    fn test_to_bytes_uses_header_order() {
        let rows: Vec<Record> = vec![[("B", "2"), ("Stray", "x"), ("A", "1")].into_iter().collect()];
        let headers = vec!["A".to_string(), "B".to_string(), "C".to_string()];

        let bytes = to_bytes(&rows, &headers).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "A,B,C\n1,2,\n");
    }

    #[test]
    fn test_to_bytes_quotes_when_needed() {
        let rows: Vec<Record> = vec![[("Prompt", "a, \"b\"")].into_iter().collect()];
        let headers = vec!["Prompt".to_string()];

        let bytes = to_bytes(&rows, &headers).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "Prompt\n\"a, \"\"b\"\"\"\n");
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let tmp = temp_path_for(Path::new("/data/strings.csv"));
        assert_eq!(tmp, PathBuf::from("/data/strings.csv.tmp"));
    }
}
