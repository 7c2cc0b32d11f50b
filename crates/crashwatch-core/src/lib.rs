//! Credential bundle for devices connecting to AWS IoT Core.
//!
//! A device needs seven values to reach its endpoint: a thing name, WiFi
//! credentials, the endpoint hostname and three PEM blobs (root CA, device
//! certificate, device private key). This crate holds them in a read-only
//! [`CredentialBundle`], loads them from a TOML file or the environment,
//! and can check them before any connection is attempted.
//!
//! - **Load**: [`loader::load`], [`loader::load_async`], [`loader::from_env`]
//! - **Validate**: [`validate::validate`] (first problem) or
//!   [`validate::diagnose`] (all problems)
//! - **Export**: [`header::render_header`] for firmware builds
//!
//! Loading never validates. An empty certificate is carried as-is until
//! either the validator or the TLS stack rejects it.
//!
//! # Example
//!
//! ```rust,ignore
//! use crashwatch_core::{loader, validate};
//!
//! let bundle = loader::load("credentials.toml".as_ref())?;
//! let report = validate::validate(&bundle)?;
//! println!("{} -> {}", report.thing_name, report.endpoint.host());
//! ```

pub mod armor;
pub mod bundle;
pub mod certificate;
pub mod endpoint;
mod error;
pub mod field;
pub mod hash;
pub mod header;
pub mod keypair;
pub mod loader;
pub mod validate;

pub use bundle::{BundleBuilder, CredentialBundle};
pub use certificate::CertificateSummary;
pub use endpoint::Endpoint;
pub use error::{CredentialError, Result};
pub use field::Field;
pub use keypair::{KeyAlgorithm, PrivateKeyInfo};
pub use validate::BundleReport;
