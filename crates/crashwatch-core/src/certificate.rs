//! X.509 inspection of the two certificates in a bundle.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use tracing::debug;
use x509_parser::prelude::X509Certificate;
use x509_parser::x509::SubjectPublicKeyInfo;

use crate::armor;
use crate::error::{CredentialError, Result};
use crate::field::Field;
use crate::hash::sha256_hex;
use crate::keypair::KeyAlgorithm;

const OID_RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.1";
const OID_EC_PUBLIC_KEY: &str = "1.2.840.10045.2.1";
const OID_ED25519: &str = "1.3.101.112";

/// What a certificate says about itself.
#[derive(Debug, Clone, Serialize)]
pub struct CertificateSummary {
    /// Bundle slot the certificate came from
    pub field: Field,
    /// Subject distinguished name (human-readable)
    pub subject: String,
    /// Issuer distinguished name (human-readable)
    pub issuer: String,
    /// First CN of the subject, if any
    pub common_name: Option<String>,
    /// Serial number (hex)
    pub serial: String,
    /// Not valid before
    pub not_before: DateTime<Utc>,
    /// Not valid after
    pub not_after: DateTime<Utc>,
    /// SHA-256 fingerprint of the DER encoding (hex)
    pub fingerprint: String,
    /// Algorithm of the subject public key
    pub key_algorithm: KeyAlgorithm,
    /// Raw subject public key bits
    #[serde(skip)]
    pub public_key: Vec<u8>,
}

impl CertificateSummary {
    /// Decode the single certificate in `text`.
    ///
    /// # Errors
    ///
    /// Returns `MalformedPem` or `UnexpectedLabel` when `text` is not
    /// exactly one well-formed certificate.
    pub fn parse(field: Field, text: &str) -> Result<Self> {
        let der = armor::decode_certificate(field, text)?;
        let (_, cert) = x509_parser::parse_x509_certificate(&der).map_err(|e| {
            CredentialError::MalformedPem {
                field,
                reason: format!("not a valid X.509 certificate: {e}"),
            }
        })?;

        let summary = Self::from_x509(field, &der, &cert);
        debug!(
            field = %field,
            subject = %summary.subject,
            fingerprint = %summary.fingerprint,
            "parsed certificate"
        );
        Ok(summary)
    }

    fn from_x509(field: Field, der: &[u8], cert: &X509Certificate<'_>) -> Self {
        let common_name = cert
            .subject()
            .iter_common_name()
            .next()
            .and_then(|cn| cn.as_str().ok())
            .map(str::to_string);

        Self {
            field,
            subject: cert.subject().to_string(),
            issuer: cert.issuer().to_string(),
            common_name,
            serial: cert.raw_serial_as_string(),
            not_before: asn1_to_utc(cert.validity().not_before),
            not_after: asn1_to_utc(cert.validity().not_after),
            fingerprint: sha256_hex(der),
            key_algorithm: classify_key(cert.public_key()),
            public_key: cert.public_key().subject_public_key.data.to_vec(),
        }
    }

    /// Whether `now` falls outside the validity window.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.not_after || now < self.not_before
    }

    /// Subject and issuer are the same name.
    pub fn is_self_issued(&self) -> bool {
        self.subject == self.issuer
    }
}

fn classify_key(spki: &SubjectPublicKeyInfo<'_>) -> KeyAlgorithm {
    let oid = spki.algorithm.algorithm.to_id_string();
    match oid.as_str() {
        OID_RSA_ENCRYPTION => KeyAlgorithm::Rsa,
        // Uncompressed point length gives the curve
        OID_EC_PUBLIC_KEY => match spki.subject_public_key.data.len() {
            65 => KeyAlgorithm::EcdsaP256,
            97 => KeyAlgorithm::EcdsaP384,
            _ => KeyAlgorithm::Other(oid),
        },
        OID_ED25519 => KeyAlgorithm::Ed25519,
        _ => KeyAlgorithm::Other(oid),
    }
}

/// Convert an ASN.1 `GeneralizedTime` / `UTCTime` to `DateTime<Utc>`.
fn asn1_to_utc(t: x509_parser::time::ASN1Time) -> DateTime<Utc> {
    Utc.timestamp_opt(t.timestamp(), 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}
