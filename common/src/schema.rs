//! スキーマ判定モジュール
//!
//! アップロード・保存済みCSVのヘッダーから、strings / classifications の
//! どちらの形式かを判定する。
//!
//! 既定の判定は列数のみ（9列→strings、4列→classifications）。
//! 列名が違っても列数が合えば通るので、厳密に判定したい場合は
//! [`SchemaDetection::HeaderNames`] を使う。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const STRINGS_FILE_NAME: &str = "strings.csv";
pub const CLASSIFICATIONS_FILE_NAME: &str = "classifications.csv";

/// stringsデータの列（正規の並び順）
pub const STRINGS_HEADERS: [&str; 9] = [
    "Tier",
    "Industry",
    "Topic",
    "Subtopic",
    "Prefix",
    "Fuzzing-Idx",
    "Prompt",
    "Risks",
    "Keywords",
];

/// classificationsデータの列（全て必須）
pub const CLASSIFICATIONS_HEADERS: [&str; 4] = ["Topic", "SubTopic", "Industry", "Classification"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Schema {
    Strings,
    Classifications,
}

impl Schema {
    pub const ALL: [Schema; 2] = [Schema::Strings, Schema::Classifications];

    /// 保存時の正規ファイル名
    pub fn file_name(&self) -> &'static str {
        match self {
            Schema::Strings => STRINGS_FILE_NAME,
            Schema::Classifications => CLASSIFICATIONS_FILE_NAME,
        }
    }

    pub fn canonical_headers(&self) -> &'static [&'static str] {
        match self {
            Schema::Strings => &STRINGS_HEADERS,
            Schema::Classifications => &CLASSIFICATIONS_HEADERS,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Schema::Strings => "strings",
            Schema::Classifications => "classifications",
        }
    }

    /// 正規ファイル名からスキーマを引く
    pub fn from_file_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|schema| schema.file_name() == name)
            .ok_or_else(|| Error::Schema(name.to_string()))
    }
}

impl std::fmt::Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// 判定方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaDetection {
    /// 列数のみで判定（既定）
    #[default]
    ColumnCount,
    /// 列名の集合が完全一致した場合のみ判定
    HeaderNames,
}

impl SchemaDetection {
    pub fn classify<S: AsRef<str>>(&self, headers: &[S]) -> Option<Schema> {
        match self {
            SchemaDetection::ColumnCount => classify(headers),
            SchemaDetection::HeaderNames => classify_by_names(headers),
        }
    }

    /// 指定スキーマとして受け入れられるか
    pub fn matches<S: AsRef<str>>(&self, schema: Schema, headers: &[S]) -> bool {
        self.classify(headers) == Some(schema)
    }
}

pub fn is_strings_schema<S: AsRef<str>>(headers: &[S]) -> bool {
    headers.len() == STRINGS_HEADERS.len()
}

pub fn is_classifications_schema<S: AsRef<str>>(headers: &[S]) -> bool {
    headers.len() == CLASSIFICATIONS_HEADERS.len()
}

/// 列数からスキーマを判定する
pub fn classify<S: AsRef<str>>(headers: &[S]) -> Option<Schema> {
    if is_strings_schema(headers) {
        Some(Schema::Strings)
    } else if is_classifications_schema(headers) {
        Some(Schema::Classifications)
    } else {
        None
    }
}

/// 列名の集合（順不同、前後空白除去）でスキーマを判定する
pub fn classify_by_names<S: AsRef<str>>(headers: &[S]) -> Option<Schema> {
    let names: HashSet<&str> = headers.iter().map(|h| h.as_ref().trim()).collect();
    if names.len() != headers.len() {
        return None;
    }

    Schema::ALL.into_iter().find(|schema| {
        let expected = schema.canonical_headers();
        names.len() == expected.len() && expected.iter().all(|name| names.contains(name))
    })
}
