//! CSVストア
//!
//! 保存先ディレクトリに strings.csv / classifications.csv の2ファイルだけを置き、
//! アップロード・参照・更新・ダウンロードをリクエスト単位で処理する。
//!
//! ## アップロードの流れ
//! 1. 受け取ったファイルをステージングに書き出してパース
//! 2. スキーマ判定（不一致なら BadRequest）
//! 3. 列名を正規化して書き直し
//! 4. 正規ファイル名にrename（既存ファイルは置き換え）
//!
//! ## 更新の流れ
//! 既存ファイルのヘッダーからスキーマを判定し、strings なら classifications と照合、
//! classifications なら必須フィールドを検証してから全件を書き戻す。

mod lock;

pub use lock::FileLock;

use crate::codec::{self, Dataset};
use crate::config::Config;
use crate::error::{CsvEditorError, Result};
use csv_editor_common::{
    normalize, validate_classifications, validate_strings, ApiResponse, Record, Schema,
    SchemaDetection, UploadData, UploadError,
};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static STAGING_SEQ: AtomicU64 = AtomicU64::new(0);

/// アップロードされた1ファイル
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// 元のファイル名（保存時には使わない）
    pub file_name: String,
    pub contents: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            contents: contents.into(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(CsvEditorError::BadRequest(format!(
                "File not found: {}",
                path.display()
            )));
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let contents = std::fs::read(path)?;
        Ok(Self { file_name, contents })
    }
}

/// アップロード要求（どちらも省略可、ただし最低1つ）
#[derive(Debug, Clone, Default)]
pub struct UploadFiles {
    pub strings_file: Option<UploadedFile>,
    pub classifications_file: Option<UploadedFile>,
}

/// ダウンロード内容
#[derive(Debug, Clone)]
pub struct Download {
    pub file_name: String,
    pub content_type: &'static str,
    pub content_disposition: String,
    /// SHA-256（hex）
    pub digest: String,
    pub bytes: Vec<u8>,
}

/// アップロード結果（種類ごとの成否）
#[derive(Debug, Default)]
pub struct UploadOutcome {
    /// 保存できた種類の正規化済み行
    pub data: UploadData,
    /// 保存できなかった種類とそのエラー（strings, classifications の順）
    pub failures: Vec<(Schema, CsvEditorError)>,
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// 最初に失敗した種類のステータス（全成功なら200）
    pub fn status_code(&self) -> u16 {
        self.failures
            .first()
            .map(|(_, err)| err.status_code())
            .unwrap_or(200)
    }

    /// 応答エンベロープ。失敗があれば保存できた行とエラー一覧を載せて success=false
    pub fn to_response(&self) -> ApiResponse<UploadData> {
        let mut data = self.data.clone();
        data.errors = self
            .failures
            .iter()
            .map(|(schema, err)| UploadError {
                file: schema.file_name().to_string(),
                error: err.to_string(),
            })
            .collect();

        if self.is_success() {
            ApiResponse::ok(data)
        } else {
            ApiResponse::rejected(data)
        }
    }

    /// 全成功なら行を、そうでなければ最初のエラーを返す
    pub fn into_result(self) -> Result<UploadData> {
        match self.failures.into_iter().next() {
            Some((_, err)) => Err(err),
            None => Ok(self.data),
        }
    }
}

pub struct FileStore {
    root: PathBuf,
    detection: SchemaDetection,
    max_upload_bytes: u64,
}

impl FileStore {
    pub fn new(config: &Config) -> Self {
        Self {
            root: config.store_dir.clone(),
            detection: config.schema_detection,
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    pub fn ensure_root(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        Ok(())
    }

    pub fn canonical_path(&self, schema: Schema) -> PathBuf {
        self.root.join(schema.file_name())
    }

    /// CSVをアップロードする
    ///
    /// 種類ごとに独立して処理する。片方が失敗してももう片方は保存され、
    /// 結果には保存できた行と失敗した種類のエラーが両方残る。
    pub fn upload(&self, files: UploadFiles) -> Result<UploadOutcome> {
        log::info!("Upload csv files");

        if files.strings_file.is_none() && files.classifications_file.is_none() {
            return Err(CsvEditorError::BadRequest(
                "At least one of strings and classifications files required".into(),
            ));
        }
        self.ensure_root()?;

        let mut outcome = UploadOutcome::default();

        let uploads = [
            (Schema::Strings, files.strings_file),
            (Schema::Classifications, files.classifications_file),
        ];
        for (schema, file) in uploads {
            let Some(file) = file else { continue };

            match self.upload_kind(schema, &file) {
                Ok(rows) => match schema {
                    Schema::Strings => outcome.data.strings_data = rows,
                    Schema::Classifications => outcome.data.classifications_data = rows,
                },
                Err(err) => {
                    log::error!("Error occured while handling {} upload: {}", schema, err);
                    outcome.failures.push((schema, err));
                }
            }
        }

        Ok(outcome)
    }

    fn upload_kind(&self, schema: Schema, file: &UploadedFile) -> Result<Vec<Record>> {
        if !is_csv_name(&file.file_name) {
            return Err(CsvEditorError::BadRequest("Only CSV files are allowed".into()));
        }
        if file.contents.len() as u64 > self.max_upload_bytes {
            return Err(CsvEditorError::BadRequest(format!(
                "{} exceeds the upload limit of {} bytes",
                file.file_name, self.max_upload_bytes
            )));
        }

        let staging = self.staging_path(schema);
        std::fs::write(&staging, &file.contents)?;

        let result = self.commit_upload(schema, &staging);
        if result.is_err() {
            let _ = std::fs::remove_file(&staging);
        }
        result
    }

    fn commit_upload(&self, schema: Schema, staging: &Path) -> Result<Vec<Record>> {
        let Dataset { rows, headers } = codec::parse(staging)?;

        if !self.detection.matches(schema, &headers) {
            return Err(CsvEditorError::BadRequest(format!("Invalid {} data", schema)));
        }

        let rows = normalize(rows);

        let _lock = FileLock::acquire(&self.root, schema.file_name())?;
        codec::write(&rows, &headers, staging)?;
        std::fs::rename(staging, self.canonical_path(schema))?;

        log::info!("{}: {} rows saved", schema.file_name(), rows.len());
        Ok(rows)
    }

    fn staging_path(&self, schema: Schema) -> PathBuf {
        let seq = STAGING_SEQ.fetch_add(1, Ordering::Relaxed);
        self.root.join(format!(
            ".{}.{}-{}.upload",
            schema.file_name(),
            std::process::id(),
            seq
        ))
    }

    /// 保存済みの正規ファイル名一覧
    pub fn list_files(&self) -> Result<Vec<String>> {
        log::info!("Get file names");

        let mut files: Vec<String> = Schema::ALL
            .into_iter()
            .filter(|schema| self.canonical_path(*schema).is_file())
            .map(|schema| schema.file_name().to_string())
            .collect();
        files.sort();
        Ok(files)
    }

    /// ファイル名を正規ファイルのパスに解決する
    fn resolve(&self, file_name: &str) -> Result<PathBuf> {
        let not_found = || CsvEditorError::NotFound(format!("File not found: {}", file_name));

        let schema = Schema::from_file_name(file_name).map_err(|_| not_found())?;
        let path = self.canonical_path(schema);
        if !path.is_file() {
            return Err(not_found());
        }
        Ok(path)
    }

    /// ファイルの全行を返す（ファイル上の内容そのまま）
    pub fn get_file(&self, file_name: &str) -> Result<Vec<Record>> {
        log::info!("Get file");

        let path = self.resolve(file_name)?;
        Ok(codec::parse(&path)?.rows)
    }

    /// ファイルを全件置き換える
    ///
    /// 検証に失敗した場合は書き込まずに全エラーを返す。
    pub fn update_file(&self, file_name: &str, rows: Vec<Record>) -> Result<()> {
        log::info!("Edit file - {}", file_name);

        let path = self.resolve(file_name)?;
        let _lock = FileLock::acquire(&self.root, file_name)?;

        let Dataset { headers, .. } = codec::parse(&path)?;

        let report = match self.detection.classify(&headers) {
            Some(Schema::Strings) => {
                let classifications_path = self.canonical_path(Schema::Classifications);
                if !classifications_path.is_file() {
                    return Err(CsvEditorError::BadRequest(format!(
                        "{} must be uploaded before strings can be updated",
                        Schema::Classifications.file_name()
                    )));
                }
                // ロック順は strings → classifications（逆順で取る経路は無い）
                let classifications = {
                    let _lock = FileLock::acquire(&self.root, Schema::Classifications.file_name())?;
                    codec::parse(&classifications_path)?.rows
                };
                validate_strings(&rows, &classifications)
            }
            Some(Schema::Classifications) => validate_classifications(&rows),
            None => {
                return Err(CsvEditorError::BadRequest(format!(
                    "Unrecognized schema in {} ({} columns)",
                    file_name,
                    headers.len()
                )));
            }
        };

        if !report.is_valid {
            log::warn!("{}: {} validation errors", file_name, report.errors.len());
            return Err(CsvEditorError::ValidationFailed(report.errors));
        }

        codec::write(&rows, &headers, &path)?;
        Ok(())
    }

    /// ダウンロード用にCSVをそのまま返す
    pub fn download_file(&self, file_name: &str) -> Result<Download> {
        log::info!("Download file - {}", file_name);

        let path = self.resolve(file_name)?;
        let bytes = std::fs::read(&path)?;
        let digest = hex::encode(Sha256::digest(&bytes));

        Ok(Download {
            file_name: file_name.to_string(),
            content_type: "text/csv",
            content_disposition: format!("attachment; filename=\"{}\"", file_name),
            digest,
            bytes,
        })
    }
}

fn is_csv_name(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}
