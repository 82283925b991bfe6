use super::ClientStore;
use crate::error::{CadastroError, Result};
use crate::model::{ClientRecord, RecordId};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

pub const DEFAULT_FILE_NAME: &str = "clientes.json";

/// Clients kept as a JSON array in a single file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Opens the store, checking that the file (if present) is readable
    /// and that its directory can be created.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(path);
        let dir = store.dir();
        ensure_dir(dir).map_err(|e| {
            CadastroError::StoreUnavailable(format!("{}: {}", dir.display(), e))
        })?;
        store.load().map_err(|e| {
            CadastroError::StoreUnavailable(format!("{}: {}", store.path.display(), e))
        })?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn load(&self) -> Result<Vec<ClientRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path).map_err(CadastroError::Io)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let records: Vec<ClientRecord> =
            serde_json::from_str(&content).map_err(CadastroError::Serialization)?;
        debug!(path = %self.path.display(), count = records.len(), "loaded clients");
        Ok(records)
    }

    fn save(&self, records: &[ClientRecord]) -> Result<()> {
        let dir = self.dir();
        ensure_dir(dir)?;

        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        records
            .serialize(&mut ser)
            .map_err(CadastroError::Serialization)?;

        // Atomic write
        let tmp_file = dir.join(format!(".clientes-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, buf).map_err(CadastroError::Io)?;
        if let Err(e) = fs::rename(&tmp_file, &self.path) {
            let _ = fs::remove_file(&tmp_file);
            return Err(CadastroError::Io(e));
        }
        debug!(path = %self.path.display(), count = records.len(), "saved clients");
        Ok(())
    }

    /// Load, mutate in memory, write back. Nothing is written when `f` fails.
    fn mutate<T>(&self, f: impl FnOnce(&mut Vec<ClientRecord>) -> Result<T>) -> Result<T> {
        let mut records = self.load()?;
        let out = f(&mut records)?;
        self.save(&records)?;
        Ok(out)
    }
}

fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

fn position(records: &[ClientRecord], id: &RecordId) -> Result<usize> {
    records
        .iter()
        .position(|r| &r.id == id)
        .ok_or_else(|| CadastroError::NotFound(format!("id {}", id)))
}

impl ClientStore for FileStore {
    fn describe(&self) -> String {
        format!("json file {}", self.path.display())
    }

    fn next_id(&self) -> Result<RecordId> {
        let highest = self
            .load()?
            .iter()
            .filter_map(|r| match r.id {
                RecordId::Seq(n) => Some(n),
                RecordId::Key(_) => None,
            })
            .max()
            .unwrap_or(0);
        Ok(RecordId::Seq(highest + 1))
    }

    fn find_all(&self) -> Result<Vec<ClientRecord>> {
        self.load()
    }

    fn insert(&mut self, record: &ClientRecord) -> Result<()> {
        self.mutate(|records| {
            if records.iter().any(|r| r.tax_id == record.tax_id) {
                return Err(CadastroError::DuplicateTaxId(record.tax_id.to_string()));
            }
            if records.iter().any(|r| r.id == record.id) {
                return Err(CadastroError::InvalidIdentifier(format!(
                    "id {} is already taken",
                    record.id
                )));
            }
            records.push(record.clone());
            Ok(())
        })
    }

    fn replace(&mut self, id: &RecordId, record: &ClientRecord) -> Result<()> {
        self.mutate(|records| {
            let idx = position(records, id)?;
            let clash = records
                .iter()
                .enumerate()
                .any(|(i, r)| i != idx && r.tax_id == record.tax_id);
            if clash {
                return Err(CadastroError::DuplicateTaxId(record.tax_id.to_string()));
            }
            records[idx] = record.clone();
            Ok(())
        })
    }

    fn delete(&mut self, id: &RecordId) -> Result<ClientRecord> {
        self.mutate(|records| {
            let idx = position(records, id)?;
            Ok(records.remove(idx))
        })
    }

    fn delete_where(
        &mut self,
        predicate: &dyn Fn(&ClientRecord) -> bool,
    ) -> Result<Vec<ClientRecord>> {
        let records = self.load()?;
        let (removed, kept): (Vec<_>, Vec<_>) = records.into_iter().partition(|r| predicate(r));
        if !removed.is_empty() {
            self.save(&kept)?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpf::Cpf;
    use tempfile::TempDir;

    fn record(id: u64, name: &str, cpf: &str) -> ClientRecord {
        ClientRecord::new(RecordId::Seq(id), name.into(), Cpf::parse(cpf).unwrap())
    }

    fn setup() -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("dados").join(DEFAULT_FILE_NAME));
        (dir, store)
    }

    #[test]
    fn missing_file_is_empty() {
        let (_dir, store) = setup();
        assert!(store.find_all().unwrap().is_empty());
        assert_eq!(store.next_id().unwrap(), RecordId::Seq(1));
    }

    #[test]
    fn writes_four_space_indented_array() {
        let (_dir, mut store) = setup();
        store.insert(&record(1, "Ana", "123.456.789-09")).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.starts_with("[\n    {\n        \"id\": 1,"));
        assert!(raw.contains("\"cpf\": \"123.456.789-09\""));
        assert!(raw.contains("\"email\": null"));
    }

    #[test]
    fn leaves_no_tmp_files() {
        let (_dir, mut store) = setup();
        store.insert(&record(1, "Ana", "123.456.789-09")).unwrap();
        store.insert(&record(2, "Bia", "111.444.777-35")).unwrap();

        for entry in fs::read_dir(store.dir()).unwrap() {
            let path = entry.unwrap().path();
            let name = path.file_name().unwrap().to_str().unwrap().to_string();
            assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
        }
    }

    #[test]
    fn keeps_insertion_order() {
        let (_dir, mut store) = setup();
        store.insert(&record(1, "Zeca", "123.456.789-09")).unwrap();
        store.insert(&record(2, "Ana", "111.444.777-35")).unwrap();
        let names: Vec<_> = store.find_all().unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Zeca", "Ana"]);
    }

    #[test]
    fn rejects_duplicate_cpf_without_writing() {
        let (_dir, mut store) = setup();
        store.insert(&record(1, "Ana", "123.456.789-09")).unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        let err = store.insert(&record(2, "Outra", "12345678909")).unwrap_err();
        assert!(matches!(err, CadastroError::DuplicateTaxId(_)));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn replace_rejects_cpf_of_other_record() {
        let (_dir, mut store) = setup();
        store.insert(&record(1, "Ana", "123.456.789-09")).unwrap();
        store.insert(&record(2, "Bia", "111.444.777-35")).unwrap();

        let mut bia = store.find_all().unwrap().remove(1);
        bia.tax_id = Cpf::parse("123.456.789-09").unwrap();
        let err = store.replace(&RecordId::Seq(2), &bia).unwrap_err();
        assert!(matches!(err, CadastroError::DuplicateTaxId(_)));

        bia.name = "Beatriz".into();
        bia.tax_id = Cpf::parse("111.444.777-35").unwrap();
        store.replace(&RecordId::Seq(2), &bia).unwrap();
        assert_eq!(store.find_all().unwrap()[1].name, "Beatriz");
    }

    #[test]
    fn next_id_follows_highest_sequence() {
        let (_dir, mut store) = setup();
        store.insert(&record(1, "Ana", "123.456.789-09")).unwrap();
        store.insert(&record(2, "Bia", "111.444.777-35")).unwrap();
        store.insert(&record(3, "Caio", "529.982.247-25")).unwrap();
        store.delete(&RecordId::Seq(2)).unwrap();
        // Collection length is 2, but id 3 is taken.
        assert_eq!(store.next_id().unwrap(), RecordId::Seq(4));
    }

    #[test]
    fn delete_missing_is_not_found() {
        let (_dir, mut store) = setup();
        assert!(matches!(
            store.delete(&RecordId::Seq(9)),
            Err(CadastroError::NotFound(_))
        ));
    }

    #[test]
    fn delete_where_removes_matches() {
        let (_dir, mut store) = setup();
        store.insert(&record(1, "Ana", "123.456.789-09")).unwrap();
        store.insert(&record(2, "Bia", "111.444.777-35")).unwrap();
        let removed = store.delete_where(&|r: &ClientRecord| r.name == "Ana").unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(store.find_all().unwrap().len(), 1);
    }

    #[test]
    fn corrupt_file_is_reported_on_open() {
        let (dir, _store) = setup();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            FileStore::open(&path),
            Err(CadastroError::StoreUnavailable(_))
        ));
    }
}
