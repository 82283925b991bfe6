use thiserror::Error;

/// Names of the client fields, used to report which required field was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    TaxId,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Name => write!(f, "name"),
            Field::TaxId => write!(f, "CPF"),
        }
    }
}

#[derive(Error, Debug)]
pub enum CadastroError {
    #[error("Missing required field: {0}")]
    MissingField(Field),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid CPF: {0}")]
    InvalidTaxId(String),

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("CPF already registered: {0}")]
    DuplicateTaxId(String),

    #[error("Client not found: {0}")]
    NotFound(String),

    #[error("Client is already active: {0}")]
    AlreadyActive(String),

    #[error("Client is already inactive: {0}")]
    AlreadyInactive(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CadastroError {
    /// True for errors caused by the caller's input rather than the storage medium.
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            CadastroError::StoreUnavailable(_)
                | CadastroError::Config(_)
                | CadastroError::Io(_)
                | CadastroError::Serialization(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CadastroError>;
