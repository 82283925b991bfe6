//! Timestamped copies of the FileStore data file.
//!
//! The CLI takes a backup before destructive operations on the file backend.
//! Nothing in the command layer knows this exists.

use crate::error::Result;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const BACKUP_PREFIX: &str = "clientes-backup-";
const BACKUP_EXT: &str = ".json";

/// Copies `data_file` into `backup_dir`. Returns `None` when there is nothing to copy.
pub fn create_backup(data_file: &Path, backup_dir: &Path) -> Result<Option<PathBuf>> {
    if !data_file.is_file() {
        return Ok(None);
    }
    fs::create_dir_all(backup_dir)?;

    let stamp = Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
        .replace([':', '.'], "-");
    let target = backup_dir.join(format!("{}{}{}", BACKUP_PREFIX, stamp, BACKUP_EXT));
    fs::copy(data_file, &target)?;

    info!(backup = %target.display(), "data file backed up");
    Ok(Some(target))
}

/// Backups in `backup_dir`, newest first.
pub fn list_backups(backup_dir: &Path) -> Result<Vec<PathBuf>> {
    if !backup_dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut backups: Vec<PathBuf> = fs::read_dir(backup_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with(BACKUP_PREFIX) && n.ends_with(BACKUP_EXT))
                .unwrap_or(false)
        })
        .collect();
    // The timestamp format sorts lexicographically.
    backups.sort();
    backups.reverse();
    Ok(backups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_data_file_yields_no_backup() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("clientes.json");
        let result = create_backup(&data, &dir.path().join("b")).unwrap();
        assert!(result.is_none());
        assert!(list_backups(&dir.path().join("b")).unwrap().is_empty());
    }

    #[test]
    fn backup_copies_content() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("clientes.json");
        fs::write(&data, "[]").unwrap();

        let backup = create_backup(&data, &dir.path().join("backups"))
            .unwrap()
            .unwrap();
        let name = backup.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("clientes-backup-"));
        assert!(!name.contains(':'));
        assert_eq!(fs::read_to_string(&backup).unwrap(), "[]");
    }

    #[test]
    fn lists_newest_first_and_ignores_strangers() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("clientes-backup-2024-01-01T00-00-00-000Z.json"), "[]").unwrap();
        fs::write(dir.path().join("clientes-backup-2025-06-01T00-00-00-000Z.json"), "[]").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let names: Vec<_> = list_backups(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "clientes-backup-2025-06-01T00-00-00-000Z.json",
                "clientes-backup-2024-01-01T00-00-00-000Z.json",
            ]
        );
    }
}
