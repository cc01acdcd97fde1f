use crate::error::{CsvEditorError, Result};
use csv_editor_common::SchemaDetection;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const STORE_DIR_ENV: &str = "CSV_EDITOR_STORE_DIR";
pub const LOG_LEVEL_ENV: &str = "CSV_EDITOR_LOG_LEVEL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(format!(
                "Unknown log level: {}. Use info, warn, error, debug, or trace",
                s
            )),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// strings.csv / classifications.csv の保存先
    pub store_dir: PathBuf,
    pub log_level: LogLevel,
    /// アップロード1ファイルあたりの上限
    pub max_upload_bytes: u64,
    pub schema_detection: SchemaDetection,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    /// 設定ファイルと環境変数から読み込み
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        let mut config = Self::load_from(&config_path)?;
        config.apply_env()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// ファイル上の設定だけを書き換えて保存し、保存した内容を返す
    ///
    /// 環境変数は反映しない。
    pub fn edit_file(path: &Path, store_dir: Option<String>, log_level: Option<String>) -> Result<Self> {
        let mut saved = Self::load_from(path)?;
        saved.apply_overrides(store_dir, log_level)?;
        saved.save_to(path)?;
        Ok(saved)
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CsvEditorError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("csv-editor").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            store_dir: PathBuf::from("uploads"),
            log_level: LogLevel::Info,
            max_upload_bytes: 1024 * 1024,
            schema_detection: SchemaDetection::ColumnCount,
        }
    }

    /// 環境変数を優先
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(
            std::env::var(STORE_DIR_ENV).ok(),
            std::env::var(LOG_LEVEL_ENV).ok(),
        )
    }

    pub fn apply_overrides(&mut self, store_dir: Option<String>, log_level: Option<String>) -> Result<()> {
        if let Some(dir) = store_dir.filter(|d| !d.trim().is_empty()) {
            self.store_dir = PathBuf::from(dir);
        }
        if let Some(level) = log_level {
            self.log_level = level.parse().map_err(CsvEditorError::Config)?;
        }
        Ok(())
    }
}
