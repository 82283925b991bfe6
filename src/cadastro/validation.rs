//! Field-level validation shared by create and update.
//!
//! Rules:
//! - Names are trimmed and must keep at least [`MIN_NAME_LEN`] characters
//! - Emails must look like `local@domain.tld`: no whitespace, exactly one `@`,
//!   and a dot inside the domain with text on both sides
//! - Phones are free-form; they are only trimmed

use crate::cpf::Cpf;
use crate::error::{CadastroError, Field, Result};

pub const MIN_NAME_LEN: usize = 2;

/// Validates and trims a client name.
///
/// # Examples
/// ```
/// use cadastro::validation::validate_name;
///
/// assert_eq!(validate_name("  Ana Costa ").unwrap(), "Ana Costa");
/// assert!(validate_name("   ").is_err());
/// assert!(validate_name("A").is_err());
/// ```
pub fn validate_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(CadastroError::MissingField(Field::Name));
    }
    if name.chars().count() < MIN_NAME_LEN {
        return Err(CadastroError::InvalidName(format!(
            "'{}' is shorter than {} characters",
            name, MIN_NAME_LEN
        )));
    }
    Ok(name.to_string())
}

/// Validates a raw CPF and returns it in canonical form.
pub fn validate_tax_id(raw: &str) -> Result<Cpf> {
    if raw.trim().is_empty() {
        return Err(CadastroError::MissingField(Field::TaxId));
    }
    Cpf::parse(raw)
}

/// Checks the `local@domain.tld` shape.
///
/// # Examples
/// ```
/// use cadastro::validation::is_valid_email;
///
/// assert!(is_valid_email("ana@example.com"));
/// assert!(is_valid_email("ana.costa@mail.example.com.br"));
/// assert!(!is_valid_email("ana@example"));
/// assert!(!is_valid_email("ana costa@example.com"));
/// assert!(!is_valid_email("@example.com"));
/// ```
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    // Some dot in the domain must have text on both sides.
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Normalizes an optional email: blank means absent, otherwise trimmed and lowercased.
pub fn normalize_email(raw: &str) -> Result<Option<String>> {
    let email = raw.trim();
    if email.is_empty() {
        return Ok(None);
    }
    if !is_valid_email(email) {
        return Err(CadastroError::InvalidEmail(email.to_string()));
    }
    Ok(Some(email.to_lowercase()))
}

/// Trims free-form optional text; blank means absent.
pub fn normalize_optional(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
