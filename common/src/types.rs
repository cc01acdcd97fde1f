//! データ型定義
//!
//! CLIとストアで共有される型:
//! - StringsRow / ClassificationsRow: 各スキーマの1行
//! - RowValidationError / ValidationReport: 検証結果
//! - ApiResponse: 応答エンベロープ
//! - UploadData / UploadError: アップロード結果
//! - UpdatePayload: 更新リクエスト本体

use crate::error::Result;
use crate::record::Record;
use serde::{Deserialize, Serialize};

/// stringsデータの1行
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringsRow {
    #[serde(rename = "Tier")]
    pub tier: String,
    #[serde(rename = "Industry")]
    pub industry: String,
    #[serde(rename = "Topic")]
    pub topic: String,
    #[serde(rename = "Subtopic")]
    pub subtopic: String,
    #[serde(rename = "Prefix")]
    pub prefix: String,
    #[serde(rename = "Fuzzing-Idx")]
    pub fuzzing_idx: String,
    #[serde(rename = "Prompt")]
    pub prompt: String,
    #[serde(rename = "Risks")]
    pub risks: String,
    #[serde(rename = "Keywords")]
    pub keywords: String,
}

impl StringsRow {
    /// レコードから組み立てる（欠けたフィールドは空文字）
    pub fn from_record(record: &Record) -> Self {
        Self {
            tier: record.value("Tier").to_string(),
            industry: record.value("Industry").to_string(),
            topic: record.value("Topic").to_string(),
            subtopic: record.value("Subtopic").to_string(),
            prefix: record.value("Prefix").to_string(),
            fuzzing_idx: record.value("Fuzzing-Idx").to_string(),
            prompt: record.value("Prompt").to_string(),
            risks: record.value("Risks").to_string(),
            keywords: record.value("Keywords").to_string(),
        }
    }

    /// classificationsを参照するキー（Topic|Subtopic|Industry）
    pub fn combination_key(&self) -> String {
        combination_key(&self.topic, &self.subtopic, &self.industry)
    }
}

/// classificationsデータの1行
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationsRow {
    #[serde(rename = "Topic")]
    pub topic: String,
    #[serde(rename = "SubTopic")]
    pub sub_topic: String,
    #[serde(rename = "Industry")]
    pub industry: String,
    #[serde(rename = "Classification")]
    pub classification: String,
}

impl ClassificationsRow {
    pub fn from_record(record: &Record) -> Self {
        Self {
            topic: record.value("Topic").to_string(),
            sub_topic: record.value("SubTopic").to_string(),
            industry: record.value("Industry").to_string(),
            classification: record.value("Classification").to_string(),
        }
    }

    pub fn combination_key(&self) -> String {
        combination_key(&self.topic, &self.sub_topic, &self.industry)
    }
}

// 値に '|' が含まれないことが前提
fn combination_key(topic: &str, sub_topic: &str, industry: &str) -> String {
    format!("{}|{}|{}", topic, sub_topic, industry)
}

/// 行単位の検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowValidationError {
    /// 行番号（0始まり、ヘッダー除く）
    pub index: usize,
    /// 問題のある行
    pub row: Record,
    pub error: String,
}

/// 検証結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<RowValidationError>,
}

impl ValidationReport {
    pub fn from_errors(errors: Vec<RowValidationError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// 応答エンベロープ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T = serde_json::Value> {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: "OK".into(),
            data: Some(data),
            error: None,
        }
    }

    pub fn ok_empty() -> Self {
        Self {
            success: true,
            message: "OK".into(),
            data: None,
            error: None,
        }
    }

    /// 失敗（詳細データ付き）
    pub fn rejected(data: T) -> Self {
        Self {
            success: false,
            message: "Error".into(),
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: "Error".into(),
            data: None,
            error: Some(error.into()),
        }
    }
}

/// アップロード結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadData {
    #[serde(default)]
    pub strings_data: Vec<Record>,
    #[serde(default)]
    pub classifications_data: Vec<Record>,
    /// 保存できなかった種類ごとのエラー
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<UploadError>,
}

/// 種類ごとのアップロード失敗
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadError {
    /// 保存先の正規ファイル名
    pub file: String,
    pub error: String,
}

/// 更新リクエスト本体（`{"updates": [...]}`）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePayload {
    pub updates: Vec<Record>,
}

impl UpdatePayload {
    /// JSONから読み込む。ラップなしの配列も受け付ける。
    pub fn from_json(json: &str) -> Result<Self> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Body {
            Wrapped(UpdatePayload),
            Bare(Vec<Record>),
        }

        Ok(match serde_json::from_str::<Body>(json)? {
            Body::Wrapped(payload) => payload,
            Body::Bare(updates) => UpdatePayload { updates },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings_record() -> Record {
        [
            ("Tier", "1"),
            ("Industry", "Ind1"),
            ("Topic", "T1"),
            ("Subtopic", "ST1"),
            ("Prefix", "Pre"),
            ("Fuzzing-Idx", "0"),
            ("Prompt", "Do something"),
            ("Risks", "RiskA"),
            ("Keywords", "KeyA"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_strings_row_from_record() {
        let row = StringsRow::from_record(&strings_record());
        assert_eq!(row.tier, "1");
        assert_eq!(row.fuzzing_idx, "0");
        assert_eq!(row.combination_key(), "T1|ST1|Ind1");
        assert_eq!(row.prompt, "Do something");
    }

    #[test]
    fn test_missing_fields_are_empty() {
        let record: Record = [("Topic", "T1")].into_iter().collect();
        let row = ClassificationsRow::from_record(&record);
        assert_eq!(row.topic, "T1");
        assert_eq!(row.sub_topic, "");
        assert_eq!(row.combination_key(), "T1||");
    }

    #[test]
    fn test_strings_row_serde_names() {
        let row = StringsRow::from_record(&strings_record());
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["Fuzzing-Idx"], "0");
        assert_eq!(json["Subtopic"], "ST1");
    }

    #[test]
    fn test_api_response_skips_empty_fields() {
        let response: ApiResponse<Vec<String>> = ApiResponse::ok_empty();
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"success":true,"message":"OK"}"#);

        let response: ApiResponse<()> = ApiResponse::failure("File not found");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Error");
        assert_eq!(json["error"], "File not found");
    }

    #[test]
    fn test_upload_data_field_names() {
        let data = UploadData::default();
        let json = serde_json::to_value(&data).unwrap();
        assert!(json.get("stringsData").is_some());
        assert!(json.get("classificationsData").is_some());
        assert!(json.get("errors").is_none());

        let data = UploadData {
            errors: vec![UploadError {
                file: "strings.csv".into(),
                error: "Invalid strings data".into(),
            }],
            ..Default::default()
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["errors"][0]["file"], "strings.csv");
        assert_eq!(json["errors"][0]["error"], "Invalid strings data");
    }

    #[test]
    fn test_update_payload_wrapped_and_bare() {
        let wrapped = UpdatePayload::from_json(r#"{"updates":[{"Topic":"T1"}]}"#).unwrap();
        assert_eq!(wrapped.updates.len(), 1);

        let bare = UpdatePayload::from_json(r#"[{"Topic":"T1"},{"Topic":"T2"}]"#).unwrap();
        assert_eq!(bare.updates.len(), 2);
        assert_eq!(bare.updates[1].get("Topic"), Some("T2"));

        assert!(UpdatePayload::from_json("not json").is_err());
    }
}
