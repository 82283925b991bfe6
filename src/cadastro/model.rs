use crate::cpf::Cpf;
use crate::error::{CadastroError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Record identity: a sequence number in the JSON file, a generated key in a document collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Seq(u64),
    Key(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Seq(n) => write!(f, "{}", n),
            RecordId::Key(k) => f.write_str(k),
        }
    }
}

impl FromStr for RecordId {
    type Err = CadastroError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CadastroError::InvalidIdentifier("empty id".to_string()));
        }
        match s.parse::<u64>() {
            Ok(n) => Ok(RecordId::Seq(n)),
            Err(_) => Ok(RecordId::Key(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "logradouro", default)]
    pub street: Option<String>,
    #[serde(rename = "numero", default)]
    pub number: Option<String>,
    #[serde(rename = "bairro", default)]
    pub district: Option<String>,
    #[serde(rename = "cidade", default)]
    pub city: Option<String>,
    #[serde(rename = "uf", default)]
    pub state: Option<String>,
    #[serde(rename = "cep", default)]
    pub postal_code: Option<String>,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        self.street.is_none()
            && self.number.is_none()
            && self.district.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.postal_code.is_none()
    }
}

fn default_active() -> bool {
    true
}

/// A registered client. Field names on disk follow the registry's original JSON files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: RecordId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "cpf")]
    pub tax_id: Cpf,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
    #[serde(rename = "endereco", default)]
    pub address: Option<Address>,
    #[serde(rename = "ativo", default = "default_active")]
    pub active: bool,
    #[serde(rename = "data_cadastro")]
    pub registered_at: DateTime<Utc>,
    #[serde(rename = "data_atualizacao", default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "data_exclusao", default)]
    pub deactivated_at: Option<DateTime<Utc>>,
}

impl ClientRecord {
    pub fn new(id: RecordId, name: String, tax_id: Cpf) -> Self {
        Self {
            id,
            name,
            tax_id,
            email: None,
            phone: None,
            address: None,
            active: true,
            registered_at: Utc::now(),
            updated_at: None,
            deactivated_at: None,
        }
    }

    /// Soft delete: flips the flag and stamps the time, every other field stays.
    pub fn deactivate(&mut self, at: DateTime<Utc>) {
        self.active = false;
        self.deactivated_at = Some(at);
        self.updated_at = Some(at);
    }

    pub fn reactivate(&mut self, at: DateTime<Utc>) {
        self.active = true;
        self.deactivated_at = None;
        self.updated_at = Some(at);
    }

    pub fn city(&self) -> Option<&str> {
        self.address.as_ref().and_then(|a| a.city.as_deref())
    }
}

/// Input for registering a client. Optional text that is blank counts as absent.
///
/// Deserializes from the same field names the registry writes, so an import
/// file looks like the data file minus the bookkeeping fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewClient {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "cpf")]
    pub tax_id: String,
    pub email: Option<String>,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
    #[serde(rename = "endereco")]
    pub address: Option<Address>,
}

impl NewClient {
    pub fn new(name: impl Into<String>, tax_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tax_id: tax_id.into(),
            ..Default::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }
}

/// Partial update of an address.
///
/// `None` keeps the current value, `Some("")` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressPatch {
    pub street: Option<String>,
    pub number: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

impl AddressPatch {
    pub fn is_empty(&self) -> bool {
        self.street.is_none()
            && self.number.is_none()
            && self.district.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.postal_code.is_none()
    }

    /// Merges onto `current`. An address left with no fields becomes absent.
    pub fn apply(&self, current: Option<Address>) -> Option<Address> {
        let mut address = current.unwrap_or_default();
        merge_text(&mut address.street, &self.street);
        merge_text(&mut address.number, &self.number);
        merge_text(&mut address.district, &self.district);
        merge_text(&mut address.city, &self.city);
        merge_text(&mut address.state, &self.state);
        merge_text(&mut address.postal_code, &self.postal_code);
        if address.is_empty() {
            None
        } else {
            Some(address)
        }
    }
}

impl From<Address> for AddressPatch {
    fn from(address: Address) -> Self {
        Self {
            street: address.street,
            number: address.number,
            district: address.district,
            city: address.city,
            state: address.state,
            postal_code: address.postal_code,
        }
    }
}

fn merge_text(slot: &mut Option<String>, patch: &Option<String>) {
    if let Some(value) = patch {
        *slot = crate::validation::normalize_optional(value);
    }
}

/// Partial update of a client.
///
/// Omitted fields (`None`) are kept. An empty string clears an optional
/// field; for the required name and CPF it is rejected as a missing field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub tax_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<AddressPatch>,
}

impl ClientPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn tax_id(mut self, tax_id: impl Into<String>) -> Self {
        self.tax_id = Some(tax_id.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn address(mut self, address: AddressPatch) -> Self {
        self.address = Some(address);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.tax_id.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.as_ref().map_or(true, AddressPatch::is_empty)
    }
}
