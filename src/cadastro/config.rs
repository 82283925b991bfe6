use crate::commands::purge::DEFAULT_PURGE_DAYS;
use crate::error::{CadastroError, Result};
use crate::store::file::DEFAULT_FILE_NAME;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_DOCUMENTS_DIR: &str = "documents";
const DEFAULT_BACKUP_DIR: &str = "backups";

/// Which persistence backend the registry runs on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    File,
    Document,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::File => write!(f, "file"),
            Backend::Document => write!(f, "document"),
        }
    }
}

impl FromStr for Backend {
    type Err = CadastroError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" | "arquivo" => Ok(Backend::File),
            "document" | "documents" | "db" => Ok(Backend::Document),
            other => Err(CadastroError::StoreUnavailable(format!(
                "unknown backend '{}'",
                other
            ))),
        }
    }
}

/// Configuration for the registry, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CadastroConfig {
    #[serde(default)]
    pub backend: Backend,

    /// File name of the FileStore list, relative to the data dir
    #[serde(default = "default_data_file")]
    pub data_file: String,

    /// Directory holding the document collection, relative to the data dir
    #[serde(default = "default_documents_dir")]
    pub documents_dir: String,

    #[serde(default = "default_backup_dir")]
    pub backup_dir: String,

    /// Copy the data file aside before hard deletes and purges
    #[serde(default = "default_true")]
    pub backup_before_delete: bool,

    #[serde(default = "default_purge_days")]
    pub purge_days: i64,
}

fn default_data_file() -> String {
    DEFAULT_FILE_NAME.to_string()
}

fn default_documents_dir() -> String {
    DEFAULT_DOCUMENTS_DIR.to_string()
}

fn default_backup_dir() -> String {
    DEFAULT_BACKUP_DIR.to_string()
}

fn default_true() -> bool {
    true
}

fn default_purge_days() -> i64 {
    DEFAULT_PURGE_DAYS
}

impl Default for CadastroConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            data_file: default_data_file(),
            documents_dir: default_documents_dir(),
            backup_dir: default_backup_dir(),
            backup_before_delete: true,
            purge_days: DEFAULT_PURGE_DAYS,
        }
    }
}

impl CadastroConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: CadastroConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.purge_days < 0 {
            return Err(CadastroError::Config(format!(
                "purge_days must not be negative, got {}",
                self.purge_days
            )));
        }
        Ok(())
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        fs::create_dir_all(config_dir)?;

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    pub fn data_file_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.data_file)
    }

    pub fn documents_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.documents_dir)
    }

    pub fn backup_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.backup_dir)
    }
}
