use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "csv-editor")]
#[command(about = "strings/classifications CSVの取込・検証・編集ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 保存先ディレクトリ（設定ファイルより優先）
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// CSVをアップロード（正規ファイル名で保存）
    Upload {
        /// stringsデータ（9列）
        #[arg(long)]
        strings: Option<PathBuf>,

        /// classificationsデータ（4列）
        #[arg(long)]
        classifications: Option<PathBuf>,
    },

    /// 保存済みファイル一覧
    Files,

    /// ファイルの内容をJSONで表示
    Show {
        #[arg(required = true)]
        file_name: String,
    },

    /// ファイルを全件置き換え（検証あり）
    Update {
        #[arg(required = true)]
        file_name: String,

        /// 更新内容JSON（`{"updates": [...]}` または配列、`-` で標準入力）
        #[arg(short, long, required = true)]
        input: PathBuf,
    },

    /// CSVをそのまま出力
    Download {
        #[arg(required = true)]
        file_name: String,

        /// 出力先（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// 保存先ディレクトリを設定
        #[arg(long)]
        store_dir: Option<PathBuf>,

        /// ログレベルを設定 (error/warn/info/debug/trace)
        #[arg(long)]
        log_level: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// ステータスコードから終了コードを決める
pub fn exit_code_for_status(status: u16) -> u8 {
    match status {
        200 => 0,
        400 => 2,
        404 => 3,
        422 => 4,
        _ => 1,
    }
}
