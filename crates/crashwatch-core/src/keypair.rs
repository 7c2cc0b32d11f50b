//! Private key decoding and the certificate/key pairing check.
//!
//! The public half of the private key is derived with `ring` and compared
//! byte-for-byte with the subject public key of the device certificate.
//! Both are the same canonical encoding: DER `RSAPublicKey` for RSA, the
//! uncompressed point for ECDSA, the raw 32 bytes for Ed25519.

use ring::rand::SystemRandom;
use ring::signature::{
    EcdsaKeyPair, Ed25519KeyPair, KeyPair, RsaKeyPair, ECDSA_P256_SHA256_ASN1_SIGNING,
    ECDSA_P384_SHA384_ASN1_SIGNING,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::armor::{self, KeyEncoding};
use crate::certificate::CertificateSummary;
use crate::error::{CredentialError, Result};
use crate::field::Field;

/// Asymmetric key types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyAlgorithm {
    Rsa,
    EcdsaP256,
    EcdsaP384,
    Ed25519,
    /// Anything else, by OID
    Other(String),
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rsa => f.write_str("RSA"),
            Self::EcdsaP256 => f.write_str("ECDSA P-256"),
            Self::EcdsaP384 => f.write_str("ECDSA P-384"),
            Self::Ed25519 => f.write_str("Ed25519"),
            Self::Other(oid) => write!(f, "unknown ({oid})"),
        }
    }
}

/// A decoded private key, reduced to what the pairing check needs.
#[derive(Clone)]
pub struct PrivateKeyInfo {
    /// Armor the key arrived in
    pub encoding: KeyEncoding,
    /// Key type
    pub algorithm: KeyAlgorithm,
    public_key: Vec<u8>,
}

impl fmt::Debug for PrivateKeyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKeyInfo")
            .field("encoding", &self.encoding)
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

impl PrivateKeyInfo {
    /// Decode the private key in `text` and derive its public key.
    ///
    /// # Errors
    ///
    /// Returns `MalformedPem`, `UnexpectedLabel` or `EncryptedKey` when the
    /// PEM cannot be decoded, and `UnsupportedKey` when the key is not RSA,
    /// ECDSA P-256/P-384 or Ed25519.
    pub fn parse(field: Field, text: &str) -> Result<Self> {
        let (encoding, der) = armor::decode_private_key(field, text)?;
        let (algorithm, public_key) = derive_public_key(encoding, &der)?;
        debug!(field = %field, algorithm = %algorithm, "parsed private key");
        Ok(Self {
            encoding,
            algorithm,
            public_key,
        })
    }

    /// Public key bytes derived from the private key.
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }
}

fn derive_public_key(encoding: KeyEncoding, der: &[u8]) -> Result<(KeyAlgorithm, Vec<u8>)> {
    match encoding {
        KeyEncoding::Pkcs1 => RsaKeyPair::from_der(der)
            .map(|k| (KeyAlgorithm::Rsa, k.public_key().as_ref().to_vec()))
            .map_err(|e| unsupported(format!("RSA key rejected: {e}"))),
        KeyEncoding::Pkcs8 => derive_from_pkcs8(der),
        KeyEncoding::Sec1 => Err(unsupported(
            "SEC1 EC keys must be converted to PKCS#8 (BEGIN PRIVATE KEY)",
        )),
    }
}

fn derive_from_pkcs8(der: &[u8]) -> Result<(KeyAlgorithm, Vec<u8>)> {
    if let Ok(k) = RsaKeyPair::from_pkcs8(der) {
        return Ok((KeyAlgorithm::Rsa, k.public_key().as_ref().to_vec()));
    }

    let rng = SystemRandom::new();
    if let Ok(k) = EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, der, &rng) {
        return Ok((KeyAlgorithm::EcdsaP256, k.public_key().as_ref().to_vec()));
    }
    if let Ok(k) = EcdsaKeyPair::from_pkcs8(&ECDSA_P384_SHA384_ASN1_SIGNING, der, &rng) {
        return Ok((KeyAlgorithm::EcdsaP384, k.public_key().as_ref().to_vec()));
    }

    Ed25519KeyPair::from_pkcs8_maybe_unchecked(der)
        .map(|k| (KeyAlgorithm::Ed25519, k.public_key().as_ref().to_vec()))
        .map_err(|_| unsupported("PKCS#8 key is not RSA, ECDSA P-256/P-384 or Ed25519"))
}

fn unsupported(reason: impl Into<String>) -> CredentialError {
    CredentialError::UnsupportedKey {
        reason: reason.into(),
    }
}

/// Check that `key` is the private half of `cert`'s public key.
///
/// # Errors
///
/// Returns `KeyMismatch` when the public keys differ.
pub fn check_pair(cert: &CertificateSummary, key: &PrivateKeyInfo) -> Result<()> {
    if cert.key_algorithm != key.algorithm || cert.public_key != key.public_key {
        debug!(
            cert_algorithm = %cert.key_algorithm,
            key_algorithm = %key.algorithm,
            "device certificate and private key do not pair"
        );
        return Err(CredentialError::KeyMismatch);
    }
    Ok(())
}
