//! CSV Editor Common Library
//!
//! CLIとストアで共有される型と、I/Oを伴わない処理
//! （スキーマ判定・正規化・相互参照検証）

pub mod error;
pub mod normalizer;
pub mod record;
pub mod schema;
pub mod types;
pub mod validator;

pub use error::{Error, Result};
pub use normalizer::normalize;
pub use record::Record;
pub use schema::{classify, is_classifications_schema, is_strings_schema, Schema, SchemaDetection};
pub use types::{
    ApiResponse, ClassificationsRow, RowValidationError, StringsRow, UpdatePayload, UploadData,
    UploadError, ValidationReport,
};
pub use validator::{validate_classifications, validate_strings};
