//! エラーケーステスト
//!
//! エラー種別・ステータスコード・応答エンベロープを検証

use csv_editor_common::{Record, RowValidationError};
use csv_editor_rust::error::CsvEditorError;

fn validation_error(index: usize, message: &str) -> RowValidationError {
    RowValidationError {
        index,
        row: [("Topic", "T1")].into_iter().collect::<Record>(),
        error: message.to_string(),
    }
}

/// CsvEditorErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        CsvEditorError::BadRequest("Invalid strings data".to_string()),
        CsvEditorError::NotFound("File not found: strings.csv".to_string()),
        CsvEditorError::ValidationFailed(vec![validation_error(0, "Topic field is required")]),
        CsvEditorError::Config("テスト設定エラー".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// メッセージはそのまま表示
#[test]
fn test_bad_request_message() {
    let err = CsvEditorError::BadRequest("Invalid classifications data".to_string());
    assert_eq!(err.to_string(), "Invalid classifications data");
}

/// ステータスコードの対応
#[test]
fn test_status_codes() {
    assert_eq!(CsvEditorError::BadRequest(String::new()).status_code(), 400);
    assert_eq!(CsvEditorError::NotFound(String::new()).status_code(), 404);
    assert_eq!(CsvEditorError::ValidationFailed(Vec::new()).status_code(), 422);
    assert_eq!(CsvEditorError::Config(String::new()).status_code(), 500);

    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    assert_eq!(CsvEditorError::from(io_err).status_code(), 500);
}

/// 検証エラーは全件をdataに載せる
#[test]
fn test_validation_failed_response() {
    let err = CsvEditorError::ValidationFailed(vec![
        validation_error(0, "Topic field is required"),
        validation_error(0, "Classification field is required"),
    ]);
    let response = err.to_response();

    assert!(!response.success);
    assert_eq!(response.message, "Error");
    assert!(response.error.is_none());
    assert_eq!(response.data.as_ref().map(|d| d.len()), Some(2));

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["data"][1]["error"], "Classification field is required");
    assert_eq!(json["data"][0]["row"]["Topic"], "T1");
}

/// その他のエラーは error に1メッセージ
#[test]
fn test_not_found_response() {
    let err = CsvEditorError::NotFound("File not found: strings.csv".to_string());
    let response = err.to_response();

    assert!(!response.success);
    assert!(response.data.is_none());
    assert_eq!(response.error.as_deref(), Some("File not found: strings.csv"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: CsvEditorError = io_err.into();

    assert!(matches!(err, CsvEditorError::Io(_)));
    let display = format!("{}", err);
    assert!(display.contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: CsvEditorError = json_err.into();

    assert!(matches!(err, CsvEditorError::JsonParse(_)));
}

/// common::Errorからの変換（透過的エラー）
#[test]
fn test_common_error_conversion() {
    let common_err = csv_editor_common::Error::Schema("notes.csv".to_string());
    let err: CsvEditorError = common_err.into();

    assert!(matches!(err, CsvEditorError::Common(_)));
    assert_eq!(err.to_string(), "Unknown schema: notes.csv");
}
