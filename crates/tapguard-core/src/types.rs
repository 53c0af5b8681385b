use crate::{Result, constants::CREDENTIAL_LENGTH, error::Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// Fixed-length RFID credential identifier (4 bytes).
///
/// The identifier is opaque: it has no ordering beyond the order in which it
/// is stored. It displays as upper-case hex, space-separated
/// (`AA BB CC DD`), and parses from hex with optional space, colon or dash
/// separators.
///
/// # Security
/// Equality is a byte-wise constant-time comparison, so matching a presented
/// credential against the store does not leak where two identifiers differ.
#[derive(Debug, Clone, Copy, Eq, Serialize, Deserialize)]
pub struct CredentialId([u8; CREDENTIAL_LENGTH]);

impl CredentialId {
    /// Create a credential from its raw bytes.
    #[must_use]
    pub const fn new(bytes: [u8; CREDENTIAL_LENGTH]) -> Self {
        CredentialId(bytes)
    }

    /// Create a credential from a byte slice.
    ///
    /// # Errors
    /// Returns `Error::CredentialLength` if the slice is not exactly
    /// 4 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; CREDENTIAL_LENGTH] =
            bytes.try_into().map_err(|_| Error::CredentialLength {
                expected: CREDENTIAL_LENGTH,
                actual: bytes.len(),
            })?;
        Ok(CredentialId(array))
    }

    /// Get the raw identifier bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; CREDENTIAL_LENGTH] {
        &self.0
    }

    /// Format as compact upper-case hex (`AABBCCDD`).
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02X}")).collect()
    }
}

impl From<[u8; CREDENTIAL_LENGTH]> for CredentialId {
    fn from(bytes: [u8; CREDENTIAL_LENGTH]) -> Self {
        CredentialId(bytes)
    }
}

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{a:02X} {b:02X} {c:02X} {d:02X}")
    }
}

impl std::str::FromStr for CredentialId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let digits: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | ':' | '-'))
            .collect();

        if digits.len() != CREDENTIAL_LENGTH * 2 {
            return Err(Error::InvalidCredential(format!(
                "expected {} hex digits, got '{s}'",
                CREDENTIAL_LENGTH * 2
            )));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidCredential(format!("non-hex input '{s}'")));
        }

        let mut bytes = [0u8; CREDENTIAL_LENGTH];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let pair = &digits[i * 2..i * 2 + 2];
            *byte = u8::from_str_radix(pair, 16)
                .map_err(|_| Error::InvalidCredential(format!("non-hex input '{s}'")))?;
        }
        Ok(CredentialId(bytes))
    }
}

/// Constant-time comparison implementation for CredentialId
impl PartialEq for CredentialId {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl std::hash::Hash for CredentialId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}
