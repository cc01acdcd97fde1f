use csv_editor_common::{ApiResponse, RowValidationError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CsvEditorError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("検証エラー: {}件", .0.len())]
    ValidationFailed(Vec<RowValidationError>),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV解析エラー: {0}")]
    Parse(#[from] csv::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error(transparent)]
    Common(#[from] csv_editor_common::Error),
}

impl CsvEditorError {
    /// HTTP相当のステータスコード
    pub fn status_code(&self) -> u16 {
        match self {
            CsvEditorError::BadRequest(_) => 400,
            CsvEditorError::NotFound(_) => 404,
            CsvEditorError::ValidationFailed(_) => 422,
            _ => 500,
        }
    }

    /// 応答エンベロープに変換（検証エラーは全件をdataに載せる）
    pub fn to_response(&self) -> ApiResponse<Vec<RowValidationError>> {
        match self {
            CsvEditorError::ValidationFailed(errors) => ApiResponse::rejected(errors.clone()),
            other => ApiResponse::failure(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, CsvEditorError>;
