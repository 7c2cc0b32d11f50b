//! PEM armor handling for the three blobs in a bundle.

use serde::{Deserialize, Serialize};

use crate::error::{CredentialError, Result};
use crate::field::Field;

const CERTIFICATE_LABEL: &str = "CERTIFICATE";
const ENCRYPTED_KEY_LABEL: &str = "ENCRYPTED PRIVATE KEY";
const KEY_LABELS: &str = "RSA PRIVATE KEY, PRIVATE KEY or EC PRIVATE KEY";

/// How a private key's DER body is structured, as told by its armor label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEncoding {
    /// `RSA PRIVATE KEY`
    Pkcs1,
    /// `PRIVATE KEY`
    Pkcs8,
    /// `EC PRIVATE KEY`
    Sec1,
}

impl KeyEncoding {
    fn from_label(label: &str) -> Option<Self> {
        match label {
            "RSA PRIVATE KEY" => Some(Self::Pkcs1),
            "PRIVATE KEY" => Some(Self::Pkcs8),
            "EC PRIVATE KEY" => Some(Self::Sec1),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pkcs1 => "RSA PRIVATE KEY",
            Self::Pkcs8 => "PRIVATE KEY",
            Self::Sec1 => "EC PRIVATE KEY",
        }
    }
}

/// True when `text` is blank or nothing but armor lines with no body, as in
/// an unedited template.
pub fn is_placeholder(text: &str) -> bool {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .all(is_armor_line)
}

fn is_armor_line(line: &str) -> bool {
    (line.starts_with("-----BEGIN ") || line.starts_with("-----END ")) && line.ends_with("-----")
}

/// Decode the single PEM block in `text`.
fn decode_single(field: Field, text: &str) -> Result<pem::Pem> {
    if text.trim().is_empty() {
        return Err(CredentialError::MissingValue { field });
    }
    if is_placeholder(text) {
        return Err(malformed(field, "empty PEM body"));
    }

    let mut blocks = pem::parse_many(text).map_err(|e| malformed(field, e.to_string()))?;
    match blocks.len() {
        0 => Err(malformed(field, "no PEM block found")),
        1 => Ok(blocks.remove(0)),
        n => Err(malformed(
            field,
            format!("expected exactly one PEM block, found {n}"),
        )),
    }
}

/// DER bytes of the certificate in `text`.
///
/// # Errors
///
/// Returns `MalformedPem` unless `text` holds exactly one non-empty PEM
/// block, or `UnexpectedLabel` when that block is not a certificate.
pub fn decode_certificate(field: Field, text: &str) -> Result<Vec<u8>> {
    let block = decode_single(field, text)?;
    if block.tag() != CERTIFICATE_LABEL {
        return Err(CredentialError::UnexpectedLabel {
            field,
            expected: CERTIFICATE_LABEL,
            found: block.tag().to_string(),
        });
    }
    if block.contents().is_empty() {
        return Err(malformed(field, "empty PEM body"));
    }
    Ok(block.into_contents())
}

/// Encoding and DER bytes of the unencrypted private key in `text`.
///
/// # Errors
///
/// Returns `MalformedPem` or `UnexpectedLabel` like
/// [`decode_certificate`], and `EncryptedKey` for a passphrase-protected
/// key.
pub fn decode_private_key(field: Field, text: &str) -> Result<(KeyEncoding, Vec<u8>)> {
    let block = decode_single(field, text)?;
    if block.tag() == ENCRYPTED_KEY_LABEL {
        return Err(CredentialError::EncryptedKey { field });
    }
    let Some(encoding) = KeyEncoding::from_label(block.tag()) else {
        return Err(CredentialError::UnexpectedLabel {
            field,
            expected: KEY_LABELS,
            found: block.tag().to_string(),
        });
    };
    if block.contents().is_empty() {
        return Err(malformed(field, "empty PEM body"));
    }
    Ok((encoding, block.into_contents()))
}

fn malformed(field: Field, reason: impl Into<String>) -> CredentialError {
    CredentialError::MalformedPem {
        field,
        reason: reason.into(),
    }
}
