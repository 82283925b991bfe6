//! # Record Service
//!
//! Business logic for the registry, one module per operation. Every function
//! takes any [`ClientStore`](crate::store::ClientStore) and returns plain Rust
//! values; nothing here prints or knows which backend it is talking to.
//!
//! Mutations validate the whole input before issuing a single store call, so a
//! rejected operation never leaves a partial change behind.

use crate::cpf::{canonicalize, normalize, CPF_LEN};
use crate::error::Result;
use crate::model::{ClientRecord, RecordId};
use std::fmt;
use std::str::FromStr;

pub mod batch;
pub mod clear;
pub mod create;
pub mod find;
pub mod helpers;
pub mod list;
pub mod purge;
pub mod reactivate;
pub mod remove;
pub mod stats;
pub mod update;

pub use batch::{BatchFailure, BatchReport};
pub use stats::RegistryStats;

/// How a caller points at a client: by CPF or by record id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    /// Canonical `XXX.XXX.XXX-XX` rendering; not necessarily a valid CPF.
    TaxId(String),
    Id(RecordId),
}

impl Identifier {
    /// Eleven digits, optionally punctuated with `.`, `-` or spaces, is a CPF;
    /// anything else is a record id.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let only_cpf_chars = raw
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | ' '));
        if only_cpf_chars && normalize(raw).len() == CPF_LEN {
            return Ok(Identifier::TaxId(canonicalize(raw)));
        }
        Ok(Identifier::Id(raw.parse()?))
    }
}

impl FromStr for Identifier {
    type Err = crate::error::CadastroError;

    fn from_str(s: &str) -> Result<Self> {
        Identifier::parse(s)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::TaxId(cpf) => write!(f, "CPF {}", cpf),
            Identifier::Id(id) => write!(f, "id {}", id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    pub fn matches(&self, record: &ClientRecord) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => record.active,
            StatusFilter::Inactive => !record.active,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Whatever order the store keeps
    #[default]
    Natural,
    /// Case-insensitive by name
    Name,
    /// Most recently deactivated first; never-deactivated records last
    Deactivated,
}

impl SortOrder {
    pub fn apply(&self, records: &mut [ClientRecord]) {
        match self {
            SortOrder::Natural => {}
            SortOrder::Name => records.sort_by_key(|r| r.name.to_lowercase()),
            SortOrder::Deactivated => {
                records.sort_by(|a, b| b.deactivated_at.cmp(&a.deactivated_at))
            }
        }
    }
}

/// Outcome of [`remove::run`]: soft and hard deletes share one entry point.
#[derive(Debug, Clone, PartialEq)]
pub enum Removal {
    Deactivated(ClientRecord),
    Deleted(ClientRecord),
}

impl Removal {
    pub fn record(&self) -> &ClientRecord {
        match self {
            Removal::Deactivated(r) | Removal::Deleted(r) => r,
        }
    }

    pub fn is_hard(&self) -> bool {
        matches!(self, Removal::Deleted(_))
    }
}

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// What a UI needs to render after an operation.
#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected: Vec<ClientRecord>,
    pub listed: Vec<ClientRecord>,
    pub stats: Option<RegistryStats>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected(mut self, records: Vec<ClientRecord>) -> Self {
        self.affected = records;
        self
    }

    pub fn with_listed(mut self, records: Vec<ClientRecord>) -> Self {
        self.listed = records;
        self
    }

    pub fn with_stats(mut self, stats: RegistryStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }
}
