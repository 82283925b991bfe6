use super::collection::{
    key_of, unique_violation, CollectionError, CollectionResult, Document, DocumentCollection,
    KEY_FIELD,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Document collection persisted as one pretty-printed JSON file per document.
///
/// Files are named `doc-{key}.json`; listing sorts by file name, so keys
/// that sort by creation time (UUID v7) give insertion order.
pub struct DirCollection {
    name: String,
    root: PathBuf,
    unique: Vec<String>,
}

impl DirCollection {
    /// Opens (creating if needed) the collection directory.
    pub fn open(root: impl Into<PathBuf>) -> CollectionResult<Self> {
        let root = root.into();
        if root.exists() && !root.is_dir() {
            return Err(CollectionError::Unavailable(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        fs::create_dir_all(&root).map_err(|e| {
            CollectionError::Unavailable(format!("{}: {}", root.display(), e))
        })?;
        let name = root
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("documents")
            .to_string();
        Ok(Self {
            name,
            root,
            unique: Vec::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Keys become file names, so anything that could leave the root is refused.
    fn doc_path(&self, key: &str) -> CollectionResult<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.contains("..") {
            return Err(CollectionError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("doc-{}.json", key)))
    }

    fn read_doc(path: &Path) -> CollectionResult<Document> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write_doc(&self, key: &str, doc: &Document) -> CollectionResult<()> {
        let content = serde_json::to_string_pretty(doc)?;

        // Atomic write
        let tmp_path = self.root.join(format!(".doc-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, self.doc_path(key)?)?;
        Ok(())
    }

    fn doc_paths(&self) -> CollectionResult<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let is_doc = path
                .file_name()
                .and_then(|s| s.to_str())
                .map(|name| name.starts_with("doc-") && name.ends_with(".json"))
                .unwrap_or(false);
            if is_doc {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}

impl DocumentCollection for DirCollection {
    fn name(&self) -> &str {
        &self.name
    }

    fn create_unique_index(&mut self, field: &str) -> CollectionResult<()> {
        if !self.unique.iter().any(|f| f == field) {
            self.unique.push(field.to_string());
        }
        Ok(())
    }

    fn insert_one(&mut self, doc: Document) -> CollectionResult<()> {
        let key = key_of(&doc)?.to_string();
        if self.doc_path(&key)?.exists() {
            return Err(CollectionError::DuplicateKey {
                field: KEY_FIELD.to_string(),
                value: key,
            });
        }
        let existing = self.find_all()?;
        if let Some(err) = unique_violation(&self.unique, &doc, existing.iter(), None) {
            return Err(err);
        }
        self.write_doc(&key, &doc)?;
        debug!(collection = %self.name, key = %key, "inserted document");
        Ok(())
    }

    fn find_by_key(&self, key: &str) -> CollectionResult<Option<Document>> {
        let path = self.doc_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(Self::read_doc(&path)?))
    }

    fn find_all(&self) -> CollectionResult<Vec<Document>> {
        self.doc_paths()?
            .iter()
            .map(|path| Self::read_doc(path))
            .collect()
    }

    fn replace_one(&mut self, key: &str, doc: Document) -> CollectionResult<bool> {
        if !self.doc_path(key)?.exists() {
            return Ok(false);
        }
        let existing = self.find_all()?;
        if let Some(err) = unique_violation(&self.unique, &doc, existing.iter(), Some(key)) {
            return Err(err);
        }
        self.write_doc(key, &doc)?;
        Ok(true)
    }

    fn delete_one(&mut self, key: &str) -> CollectionResult<Option<Document>> {
        let path = self.doc_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let doc = Self::read_doc(&path)?;
        fs::remove_file(&path)?;
        Ok(Some(doc))
    }
}
