//! Optional up-front validation of a bundle.
//!
//! Run this before any network attempt to turn bad configuration into a
//! fatal error at startup instead of a TLS failure at connect time.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::armor::KeyEncoding;
use crate::bundle::CredentialBundle;
use crate::certificate::CertificateSummary;
use crate::endpoint::Endpoint;
use crate::error::{CredentialError, Result};
use crate::field::Field;
use crate::keypair::{self, KeyAlgorithm, PrivateKeyInfo};

/// What a fully valid bundle contains.
#[derive(Debug, Clone, Serialize)]
pub struct BundleReport {
    pub thing_name: String,
    pub endpoint: Endpoint,
    pub root_ca: CertificateSummary,
    pub device_certificate: CertificateSummary,
    pub key_algorithm: KeyAlgorithm,
    pub key_encoding: KeyEncoding,
}

impl BundleReport {
    /// Certificates outside their validity window at `now`.
    pub fn expired_certificates(&self, now: DateTime<Utc>) -> Vec<&CertificateSummary> {
        [&self.root_ca, &self.device_certificate]
            .into_iter()
            .filter(|c| c.is_expired_at(now))
            .collect()
    }
}

const PLAIN_FIELDS: [Field; 3] = [Field::ThingName, Field::WifiSsid, Field::WifiPassword];

fn require(bundle: &CredentialBundle, field: Field) -> Result<&str> {
    let value = bundle.get(field);
    if value.trim().is_empty() {
        return Err(CredentialError::MissingValue { field });
    }
    Ok(value)
}

fn parse_endpoint(bundle: &CredentialBundle) -> Result<Endpoint> {
    Endpoint::parse(require(bundle, Field::Endpoint)?)
}

/// Every problem with `bundle`, in field order. Empty when the bundle is
/// usable.
pub fn diagnose(bundle: &CredentialBundle) -> Vec<CredentialError> {
    let mut problems: Vec<CredentialError> = PLAIN_FIELDS
        .into_iter()
        .filter_map(|field| require(bundle, field).err())
        .collect();

    let endpoint = parse_endpoint(bundle);
    let root_ca = CertificateSummary::parse(Field::RootCa, bundle.root_ca());
    let device = CertificateSummary::parse(Field::DeviceCertificate, bundle.device_certificate());
    let key = PrivateKeyInfo::parse(Field::PrivateKey, bundle.private_key());
    let paired = match (&device, &key) {
        (Ok(cert), Ok(key)) => keypair::check_pair(cert, key),
        _ => Ok(()),
    };

    problems.extend(
        [
            endpoint.err(),
            root_ca.err(),
            device.err(),
            key.err(),
            paired.err(),
        ]
        .into_iter()
        .flatten(),
    );
    debug!(count = problems.len(), "bundle diagnosed");
    problems
}

/// Validate `bundle`, failing on the first problem found.
///
/// Checks run in the same order [`diagnose`] lists them, so the error is
/// always the head of that list.
///
/// # Errors
///
/// Returns `MissingValue` for a blank field, `InvalidEndpoint`,
/// `MalformedPem` / `UnexpectedLabel` / `EncryptedKey` / `UnsupportedKey`
/// for a blob that does not decode, or `KeyMismatch` when the private key
/// does not belong to the device certificate.
pub fn validate(bundle: &CredentialBundle) -> Result<BundleReport> {
    build_report(bundle).map_err(|e| {
        warn!(error = %e, "credential bundle rejected");
        e
    })
}

fn build_report(bundle: &CredentialBundle) -> Result<BundleReport> {
    for field in PLAIN_FIELDS {
        require(bundle, field)?;
    }
    let endpoint = parse_endpoint(bundle)?;
    let root_ca = CertificateSummary::parse(Field::RootCa, bundle.root_ca())?;
    let device_certificate =
        CertificateSummary::parse(Field::DeviceCertificate, bundle.device_certificate())?;
    let key = PrivateKeyInfo::parse(Field::PrivateKey, bundle.private_key())?;
    keypair::check_pair(&device_certificate, &key)?;

    Ok(BundleReport {
        thing_name: bundle.thing_name().to_string(),
        endpoint,
        root_ca,
        device_certificate,
        key_algorithm: key.algorithm,
        key_encoding: key.encoding,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT_CA: &str = include_str!("../tests/fixtures/root_ca.pem");
    const DEVICE_CRT: &str = include_str!("../tests/fixtures/device_rsa.crt");
    const DEVICE_KEY: &str = include_str!("../tests/fixtures/device_rsa.key");
    const OTHER_KEY: &str = include_str!("../tests/fixtures/other_rsa.key");

    fn good() -> CredentialBundle {
        CredentialBundle::builder()
            .thing_name("car-001")
            .wifi("garage", "hunter22")
            .endpoint("a1b2c3-ats.iot.eu-west-1.amazonaws.com")
            .root_ca(ROOT_CA)
            .device_certificate(DEVICE_CRT)
            .private_key(DEVICE_KEY)
            .build()
    }

    #[test]
    fn valid_bundle_reports() {
        let report = validate(&good()).unwrap();
        assert_eq!(report.thing_name, "car-001");
        assert_eq!(report.endpoint.aws_region(), Some("eu-west-1"));
        assert_eq!(report.device_certificate.common_name.as_deref(), Some("car-001"));
        assert_eq!(report.key_algorithm, KeyAlgorithm::Rsa);
        assert_eq!(report.key_encoding, KeyEncoding::Pkcs1);
        assert!(report.expired_certificates(Utc::now()).is_empty());
        assert!(diagnose(&good()).is_empty());
    }

    #[test]
    fn each_blank_field_is_missing() {
        for field in Field::ALL {
            let bundle = CredentialBundle::builder()
                .thing_name("car-001")
                .wifi("garage", "hunter22")
                .endpoint("a1b2c3-ats.iot.eu-west-1.amazonaws.com")
                .root_ca(ROOT_CA)
                .device_certificate(DEVICE_CRT)
                .private_key(DEVICE_KEY)
                .set(field, "")
                .build();

            match validate(&bundle) {
                Err(CredentialError::MissingValue { field: f }) => assert_eq!(f, field),
                other => panic!("{field}: expected MissingValue, got {other:?}"),
            }
        }
    }

    #[test]
    fn template_lists_every_problem() {
        let problems = diagnose(&CredentialBundle::placeholder());
        let fields: Vec<_> = problems.iter().filter_map(CredentialError::field).collect();
        assert_eq!(
            fields,
            [
                Field::Endpoint,
                Field::RootCa,
                Field::DeviceCertificate,
                Field::PrivateKey
            ]
        );
        assert!(problems[1..]
            .iter()
            .all(|e| matches!(e, CredentialError::MalformedPem { .. })));
    }

    #[test]
    fn first_error_heads_the_diagnosis() {
        let bundle = CredentialBundle::builder()
            .thing_name("car-001")
            .endpoint("bad host")
            .root_ca(ROOT_CA)
            .device_certificate(DEVICE_CRT)
            .private_key(OTHER_KEY)
            .build();
        let problems = diagnose(&bundle);
        assert_eq!(problems.len(), 4);
        let first = validate(&bundle).unwrap_err();
        assert_eq!(first.to_string(), problems[0].to_string());
        assert!(matches!(problems[3], CredentialError::KeyMismatch));
    }

    #[test]
    fn padded_endpoint_is_rejected() {
        let bundle = CredentialBundle::builder()
            .thing_name("car-001")
            .wifi("garage", "hunter22")
            .endpoint("  a1b2c3-ats.iot.eu-west-1.amazonaws.com \n")
            .root_ca(ROOT_CA)
            .device_certificate(DEVICE_CRT)
            .private_key(DEVICE_KEY)
            .build();
        assert!(matches!(
            validate(&bundle),
            Err(CredentialError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn mismatched_key_is_fatal() {
        let bundle = CredentialBundle::builder()
            .thing_name("car-001")
            .wifi("garage", "hunter22")
            .endpoint("a1b2c3-ats.iot.eu-west-1.amazonaws.com")
            .root_ca(ROOT_CA)
            .device_certificate(DEVICE_CRT)
            .private_key(OTHER_KEY)
            .build();
        assert!(matches!(validate(&bundle), Err(CredentialError::KeyMismatch)));
    }
}
