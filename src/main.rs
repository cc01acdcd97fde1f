use clap::Parser;
use csv_editor_common::{ApiResponse, UpdatePayload};
use csv_editor_rust::{cli, config, error, logging, store};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use serde::Serialize;
use std::io::{Read, Write};
use std::path::Path;
use std::process::ExitCode;
use store::{FileStore, UploadFiles, UploadedFile};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::from(1);
        }
    };
    if let Some(store_dir) = &cli.store {
        config.store_dir = store_dir.clone();
    }
    logging::init(config.log_level, cli.verbose);

    match run(cli.command, config) {
        Ok(code) => code,
        Err(err) => {
            log::error!("{}", err);
            let _ = print_json(&err.to_response());
            ExitCode::from(cli::exit_code_for_status(err.status_code()))
        }
    }
}

fn run(command: Commands, config: Config) -> Result<ExitCode> {
    let store = FileStore::new(&config);

    match command {
        Commands::Upload { strings, classifications } => {
            let files = UploadFiles {
                strings_file: strings.as_deref().map(UploadedFile::from_path).transpose()?,
                classifications_file: classifications
                    .as_deref()
                    .map(UploadedFile::from_path)
                    .transpose()?,
            };
            // 一部だけ保存できた場合も結果を出力し、終了コードで失敗を返す
            let outcome = store.upload(files)?;
            print_json(&outcome.to_response())?;
            if !outcome.is_success() {
                return Ok(ExitCode::from(cli::exit_code_for_status(outcome.status_code())));
            }
        }

        Commands::Files => {
            print_json(&ApiResponse::ok(store.list_files()?))?;
        }

        Commands::Show { file_name } => {
            print_json(&ApiResponse::ok(store.get_file(&file_name)?))?;
        }

        Commands::Update { file_name, input } => {
            let json = read_input(&input)?;
            let payload = UpdatePayload::from_json(&json)?;
            store.update_file(&file_name, payload.updates)?;
            print_json(&ApiResponse::<()>::ok_empty())?;
        }

        Commands::Download { file_name, output } => {
            let download = store.download_file(&file_name)?;
            log::info!(
                "Content-Type: {}, Content-Disposition: {}, sha256: {}",
                download.content_type,
                download.content_disposition,
                download.digest
            );

            match output {
                Some(path) => {
                    let path = if path.is_dir() {
                        path.join(&download.file_name)
                    } else {
                        path
                    };
                    std::fs::write(&path, &download.bytes)?;
                    eprintln!("✔ 出力: {}", path.display());
                }
                None => std::io::stdout().write_all(&download.bytes)?,
            }
        }

        Commands::Config { store_dir, log_level, show } => {
            // 環境変数・--store を含まない、ファイル上の設定を編集する
            // 変更した場合は保存後の内容を、そうでなければ実行時の設定を表示
            let shown = if store_dir.is_some() || log_level.is_some() {
                let config_path = Config::config_path()?;
                let saved = Config::edit_file(
                    &config_path,
                    store_dir.map(|d| d.to_string_lossy().to_string()),
                    log_level,
                )?;
                println!("✔ 設定を保存しました: {}", config_path.display());
                saved
            } else {
                config
            };

            if show {
                println!("設定:");
                println!("  保存先: {}", shown.store_dir.display());
                println!("  ログレベル: {}", shown.log_level);
                println!("  アップロード上限: {} bytes", shown.max_upload_bytes);
                println!("  スキーマ判定: {:?}", shown.schema_detection);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
