//! 正規ファイル単位の排他ロック
//!
//! 保存先ディレクトリに `.<ファイル名>.lock` を作り、fs2の排他ロックを取る。
//! ロックはドロップ時に解放される。

use crate::error::Result;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

pub struct FileLock {
    file: File,
}

impl FileLock {
    /// ロックを取得（取れるまでブロック）
    pub fn acquire(dir: &Path, file_name: &str) -> Result<Self> {
        let path = lock_path(dir, file_name);
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)?;
        file.lock_exclusive()?;
        log::trace!("acquired lock {}", path.display());
        Ok(Self { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

fn lock_path(dir: &Path, file_name: &str) -> PathBuf {
    dir.join(format!(".{}.lock", file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_lock_file_is_hidden() {
        let dir = tempdir().expect("Failed to create temp dir");
        let _lock = FileLock::acquire(dir.path(), "strings.csv").unwrap();
        assert!(dir.path().join(".strings.csv.lock").exists());
    }

    #[test]
    fn test_reacquire_after_drop() {
        let dir = tempdir().expect("Failed to create temp dir");
        {
            let _lock = FileLock::acquire(dir.path(), "classifications.csv").unwrap();
        }
        let second = FileLock::acquire(dir.path(), "classifications.csv");
        assert!(second.is_ok());
    }

    #[test]
    fn test_held_lock_blocks_others() {
        let dir = tempdir().expect("Failed to create temp dir");
        let _lock = FileLock::acquire(dir.path(), "strings.csv").unwrap();

        let other = File::open(dir.path().join(".strings.csv.lock")).unwrap();
        assert!(other.try_lock_exclusive().is_err());
    }
}
