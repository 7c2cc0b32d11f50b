//! IoT endpoint hostname checks.

use serde::Serialize;

use crate::error::{CredentialError, Result};

const MAX_NAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;
const AWS_SUFFIX: &str = ".amazonaws.com";

/// A bare DNS name the device connects to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    host: String,
}

impl Endpoint {
    /// Accept `text` if it is a bare hostname: no scheme, port, path,
    /// whitespace or wildcard. One trailing root dot is allowed.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::InvalidEndpoint` naming the first rule the
    /// value breaks. The value is checked exactly as stored, so anything
    /// accepted here is what the firmware header will carry.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = |reason| CredentialError::InvalidEndpoint {
            value: text.to_string(),
            reason,
        };

        if text.trim().is_empty() {
            return Err(invalid("empty hostname"));
        }
        if text.chars().any(char::is_whitespace) {
            return Err(invalid("must not contain whitespace"));
        }
        let host = text.strip_suffix('.').unwrap_or(text);
        if host.contains("://") {
            return Err(invalid("must not include a scheme"));
        }
        if host.contains(':') {
            return Err(invalid("must not include a port"));
        }
        if host.contains('/') {
            return Err(invalid("must not include a path"));
        }
        if host.len() > MAX_NAME_LEN {
            return Err(invalid("longer than 253 characters"));
        }

        let labels: Vec<&str> = host.split('.').collect();
        if labels.len() < 2 {
            return Err(invalid("must be a fully-qualified name"));
        }
        for label in labels {
            if label.is_empty() || label.len() > MAX_LABEL_LEN {
                return Err(invalid("label must be 1 to 63 characters"));
            }
            if !label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
                return Err(invalid("labels may only contain letters, digits and hyphens"));
            }
            if label.starts_with('-') || label.ends_with('-') {
                return Err(invalid("labels must not start or end with a hyphen"));
            }
        }

        Ok(Self {
            host: host.to_ascii_lowercase(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Region of an `<id>.iot.<region>.amazonaws.com` endpoint.
    pub fn aws_region(&self) -> Option<&str> {
        let stem = self.host.strip_suffix(AWS_SUFFIX)?;
        let mut parts = stem.rsplitn(3, '.');
        let region = parts.next()?;
        (parts.next()? == "iot").then_some(region)
    }

    /// Endpoint serves the Amazon Trust Services certificate chain.
    pub fn is_ats(&self) -> bool {
        self.host
            .split('.')
            .next()
            .is_some_and(|id| id.ends_with("-ats"))
    }
}
