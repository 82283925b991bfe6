use super::collection::{
    key_of, unique_violation, CollectionError, CollectionResult, Document, DocumentCollection,
};

/// In-process document collection for testing.
///
/// Documents live in a `Vec` so the natural order is insertion order.
#[derive(Default)]
pub struct MemoryCollection {
    name: String,
    docs: Vec<Document>,
    unique: Vec<String>,
    simulate_unavailable: bool,
}

impl MemoryCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Makes every subsequent call fail as if the server were unreachable.
    pub fn set_simulate_unavailable(&mut self, simulate: bool) {
        self.simulate_unavailable = simulate;
    }

    fn check_available(&self) -> CollectionResult<()> {
        if self.simulate_unavailable {
            return Err(CollectionError::Unavailable(format!(
                "{}: simulated outage",
                self.name
            )));
        }
        Ok(())
    }
}

impl DocumentCollection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    fn create_unique_index(&mut self, field: &str) -> CollectionResult<()> {
        self.check_available()?;
        if !self.unique.iter().any(|f| f == field) {
            self.unique.push(field.to_string());
        }
        Ok(())
    }

    fn insert_one(&mut self, doc: Document) -> CollectionResult<()> {
        self.check_available()?;
        let key = key_of(&doc)?.to_string();
        let mut indexes = self.unique.clone();
        indexes.push(super::collection::KEY_FIELD.to_string());
        if let Some(err) = unique_violation(&indexes, &doc, self.docs.iter(), None) {
            return Err(err);
        }
        tracing::trace!(collection = %self.name, key = %key, "insert_one");
        self.docs.push(doc);
        Ok(())
    }

    fn find_by_key(&self, key: &str) -> CollectionResult<Option<Document>> {
        self.check_available()?;
        Ok(self
            .docs
            .iter()
            .find(|d| key_of(d).map(|k| k == key).unwrap_or(false))
            .cloned())
    }

    fn find_all(&self) -> CollectionResult<Vec<Document>> {
        self.check_available()?;
        Ok(self.docs.clone())
    }

    fn replace_one(&mut self, key: &str, doc: Document) -> CollectionResult<bool> {
        self.check_available()?;
        let Some(idx) = self
            .docs
            .iter()
            .position(|d| key_of(d).map(|k| k == key).unwrap_or(false))
        else {
            return Ok(false);
        };
        if let Some(err) = unique_violation(&self.unique, &doc, self.docs.iter(), Some(key)) {
            return Err(err);
        }
        self.docs[idx] = doc;
        Ok(true)
    }

    fn delete_one(&mut self, key: &str) -> CollectionResult<Option<Document>> {
        self.check_available()?;
        let idx = self
            .docs
            .iter()
            .position(|d| key_of(d).map(|k| k == key).unwrap_or(false));
        Ok(idx.map(|i| self.docs.remove(i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn enforces_unique_index() {
        let mut coll = MemoryCollection::new("clientes");
        coll.create_unique_index("cpf").unwrap();
        coll.insert_one(doc(json!({"_id": "a", "cpf": "1"}))).unwrap();

        let err = coll
            .insert_one(doc(json!({"_id": "b", "cpf": "1"})))
            .unwrap_err();
        assert!(matches!(err, CollectionError::DuplicateKey { ref field, .. } if field == "cpf"));
    }

    #[test]
    fn rejects_duplicate_keys() {
        let mut coll = MemoryCollection::new("clientes");
        coll.insert_one(doc(json!({"_id": "a"}))).unwrap();
        assert!(coll.insert_one(doc(json!({"_id": "a"}))).is_err());
        assert!(matches!(
            coll.insert_one(doc(json!({"cpf": "1"}))),
            Err(CollectionError::MissingKey)
        ));
    }

    #[test]
    fn replace_may_keep_own_indexed_value() {
        let mut coll = MemoryCollection::new("clientes");
        coll.create_unique_index("cpf").unwrap();
        coll.insert_one(doc(json!({"_id": "a", "cpf": "1", "n": 1})))
            .unwrap();
        coll.insert_one(doc(json!({"_id": "b", "cpf": "2"}))).unwrap();

        assert!(coll
            .replace_one("a", doc(json!({"_id": "a", "cpf": "1", "n": 2})))
            .unwrap());
        assert!(coll
            .replace_one("a", doc(json!({"_id": "a", "cpf": "2"})))
            .is_err());
        assert!(!coll
            .replace_one("zz", doc(json!({"_id": "zz"})))
            .unwrap());
        assert_eq!(coll.find_by_key("a").unwrap().unwrap()["n"], 2);
    }

    #[test]
    fn simulated_outage() {
        let mut coll = MemoryCollection::new("clientes");
        coll.set_simulate_unavailable(true);
        assert!(matches!(
            coll.find_all(),
            Err(CollectionError::Unavailable(_))
        ));
    }
}
