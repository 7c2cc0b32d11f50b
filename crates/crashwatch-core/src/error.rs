use std::path::PathBuf;
use thiserror::Error;

use crate::field::Field;

/// Result type alias for credential operations
pub type Result<T> = std::result::Result<T, CredentialError>;

/// Errors raised while loading, inspecting or exporting a credential bundle
#[derive(Error, Debug)]
pub enum CredentialError {
    /// A required value was blank
    #[error("missing value: {field} is empty")]
    MissingValue {
        /// The blank field
        field: Field,
    },

    /// A PEM blob could not be decoded
    #[error("malformed PEM in {field}: {reason}")]
    MalformedPem {
        /// Field holding the blob
        field: Field,
        /// What went wrong
        reason: String,
    },

    /// A PEM block carried the wrong armor label
    #[error("unexpected PEM label in {field}: expected {expected}, found {found:?}")]
    UnexpectedLabel {
        /// Field holding the blob
        field: Field,
        /// Labels accepted for this field
        expected: &'static str,
        /// Label found in the blob
        found: String,
    },

    /// Private key is passphrase-protected
    #[error("{field} is encrypted; an unencrypted key is required")]
    EncryptedKey {
        /// Field holding the key
        field: Field,
    },

    /// Key type or encoding the pairing check cannot handle
    #[error("unsupported private key: {reason}")]
    UnsupportedKey {
        /// Why the key was rejected
        reason: String,
    },

    /// Private key does not belong to the device certificate
    #[error("private key does not match the device certificate's public key")]
    KeyMismatch,

    /// Endpoint is not a bare DNS name
    #[error("invalid endpoint {value:?}: {reason}")]
    InvalidEndpoint {
        /// Offending hostname
        value: String,
        /// What went wrong
        reason: &'static str,
    },

    /// Value cannot be embedded in the firmware header
    #[error("{field} cannot be embedded in a C header")]
    HeaderEncoding {
        /// Field holding the value
        field: Field,
    },

    /// Reading or writing a file failed
    #[error("I/O error on {}: {}", path.display(), source)]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Bundle file is not valid TOML
    #[error("bundle file parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Bundle could not be written as TOML
    #[error("bundle serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl CredentialError {
    /// Build an [`Io`](Self::Io) error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The bundle field this error is about, if any
    #[must_use]
    pub const fn field(&self) -> Option<Field> {
        match self {
            Self::MissingValue { field }
            | Self::MalformedPem { field, .. }
            | Self::UnexpectedLabel { field, .. }
            | Self::EncryptedKey { field }
            | Self::HeaderEncoding { field } => Some(*field),
            Self::UnsupportedKey { .. } | Self::KeyMismatch => Some(Field::PrivateKey),
            Self::InvalidEndpoint { .. } => Some(Field::Endpoint),
            Self::Io { .. } | Self::Toml(_) | Self::TomlSerialize(_) => None,
        }
    }

    /// Returns true if the bundle's contents are at fault rather than the
    /// environment it was read from
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        !matches!(self, Self::Io { .. })
    }
}
