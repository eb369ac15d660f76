//! 备份文件创建
//!
//! 每次转换开始前，把两侧 Mod 当前的磁盘状态复制到
//! `<data 根目录>/backups/<时间戳>/<mod 名>/...`，目录布局与原生存储一致。
//! 同一次转换的所有备份共用一个时间戳

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 当前时间的备份时间戳，如 `2026.08.23-14.05.30`
pub fn timestamp() -> String {
    chrono::Local::now().format("%Y.%m.%d-%H.%M.%S").to_string()
}

/// 某个 Mod 在本次转换中的备份根目录
pub fn backup_root(data_root: &Path, timestamp: &str, mod_name: &str) -> PathBuf {
    data_root.join("backups").join(timestamp).join(mod_name)
}

/// 复制单个文件，父目录按需创建
pub fn backup_file(src: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dest)
        .with_context(|| format!("无法备份 {} 到 {}", src.display(), dest.display()))?;
    Ok(())
}

/// 把整个目录树镜像复制到目标目录
pub fn backup_tree(src_dir: &Path, dest_dir: &Path) -> Result<()> {
    for entry in WalkDir::new(src_dir) {
        let entry = entry?;
        let rel = entry
            .path()
            .strip_prefix(src_dir)
            .context("备份路径不在源目录下")?;
        if rel.as_os_str().is_empty() {
            continue;
        }
        let dest = dest_dir.join(rel);
        if entry.path().is_dir() {
            fs::create_dir_all(&dest)?;
        } else {
            backup_file(entry.path(), &dest)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_root_layout() {
        let root = backup_root(Path::new("data"), "2026.01.02-03.04.05", "lunar client");
        assert_eq!(
            root,
            Path::new("data/backups/2026.01.02-03.04.05/lunar client")
        );
    }

    #[test]
    fn copies_single_file_with_parents() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("waypoints.json");
        fs::write(&src, "{}").unwrap();
        let dest = dir.path().join("backups/ts/lunar client/waypoints.json");
        backup_file(&src, &dest).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "{}");
    }

    #[test]
    fn mirrors_directory_tree() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("World");
        fs::create_dir_all(src.join("dim%0")).unwrap();
        fs::write(src.join("dim%0/mw$default_1.txt"), "sets:gui.xaero_default\n").unwrap();
        fs::create_dir_all(src.join("dim%-1")).unwrap();
        fs::write(src.join("dim%-1/mw$default_1.txt"), "#\n").unwrap();

        let dest = dir.path().join("backup/World");
        backup_tree(&src, &dest).unwrap();
        assert!(dest.join("dim%0/mw$default_1.txt").exists());
        assert!(dest.join("dim%-1/mw$default_1.txt").exists());
    }
}
