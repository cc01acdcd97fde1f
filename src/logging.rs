//! ログ初期化（stderr出力、RUST_LOGも有効）

use crate::config::LogLevel;

pub fn init(level: LogLevel, verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.to_string()));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    // 二重初期化（テスト等）は無視
    let _ = builder.target(env_logger::Target::Stderr).try_init();
}
