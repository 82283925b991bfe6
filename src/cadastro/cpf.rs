//! CPF validation and canonical formatting.
//!
//! A CPF is eleven digits: nine base digits followed by two verifier digits
//! computed with the modulo-11 rule. The canonical rendering used as the
//! registry's unique key is `XXX.XXX.XXX-XX`.
//!
//! Input is accepted with any punctuation (`123.456.789-09`, `12345678909`,
//! `123 456 789 09`); [`normalize`] keeps only the digits.

use crate::error::{CadastroError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const CPF_LEN: usize = 11;

/// Strips every non-digit character.
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Computes both verifier digits for the nine base digits.
///
/// # Panics
/// If `base` holds fewer than nine digits.
pub fn check_digits(base: &[u8]) -> (u8, u8) {
    let first = verifier(&base[..9], 10);
    let mut extended = base[..9].to_vec();
    extended.push(first);
    let second = verifier(&extended, 11);
    (first, second)
}

fn verifier(digits: &[u8], top_weight: u32) -> u8 {
    let sum: u32 = digits
        .iter()
        .zip((2..=top_weight).rev())
        .map(|(d, w)| u32::from(*d) * w)
        .sum();
    let rest = 11 - (sum % 11);
    if rest >= 10 {
        0
    } else {
        rest as u8
    }
}

/// Checks length, rejects repeated-digit sequences and verifies both check digits.
pub fn is_valid(raw: &str) -> bool {
    let digits: Vec<u8> = normalize(raw).bytes().map(|b| b - b'0').collect();
    if digits.len() != CPF_LEN {
        return false;
    }
    if digits.iter().all(|d| *d == digits[0]) {
        return false;
    }
    let (first, second) = check_digits(&digits);
    first == digits[9] && second == digits[10]
}

/// Renders the digits of `raw` as `XXX.XXX.XXX-XX`.
///
/// # Panics
/// If `raw` does not normalize to exactly eleven digits. Callers validate first.
pub fn canonicalize(raw: &str) -> String {
    let digits = normalize(raw);
    assert_eq!(
        digits.len(),
        CPF_LEN,
        "canonicalize requires {} digits, got {:?}",
        CPF_LEN,
        raw
    );
    format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    )
}

/// A validated CPF, always held in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cpf(String);

impl Cpf {
    pub fn parse(raw: &str) -> Result<Self> {
        if !is_valid(raw) {
            return Err(CadastroError::InvalidTaxId(raw.trim().to_string()));
        }
        Ok(Cpf(canonicalize(raw)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn digits(&self) -> String {
        normalize(&self.0)
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Cpf {
    type Err = CadastroError;

    fn from_str(s: &str) -> Result<Self> {
        Cpf::parse(s)
    }
}

impl AsRef<str> for Cpf {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Cpf {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Cpf {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Cpf::parse(&raw).map_err(serde::de::Error::custom)
    }
}
