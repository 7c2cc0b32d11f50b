//! Loading bundles from TOML files and the environment.
//!
//! Loading is a one-shot blocking (or awaited) read. It never validates:
//! missing keys and unset variables come back as empty strings.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::bundle::CredentialBundle;
use crate::error::{CredentialError, Result};
use crate::field::Field;

/// Prefix marking an environment value as a path to read instead of PEM text.
const FILE_REF_PREFIX: char = '@';

/// On-disk layout of a bundle file.
#[derive(Default, Serialize, Deserialize)]
struct BundleFile {
    #[serde(default)]
    thing_name: String,
    #[serde(default)]
    wifi_ssid: String,
    #[serde(default)]
    wifi_password: String,
    #[serde(default)]
    endpoint: String,
    #[serde(default)]
    certificates: CertificateSection,
}

#[derive(Default, Serialize, Deserialize)]
struct CertificateSection {
    #[serde(default)]
    root_ca: PemSource,
    #[serde(default)]
    device_certificate: PemSource,
    #[serde(default)]
    private_key: PemSource,
}

/// A PEM blob given inline or as `{ file = "path" }`.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PemSource {
    Inline(String),
    File { file: PathBuf },
}

impl Default for PemSource {
    fn default() -> Self {
        Self::Inline(String::new())
    }
}

impl PemSource {
    fn resolve(self, base_dir: Option<&Path>) -> Result<String> {
        match self {
            Self::Inline(text) => Ok(text),
            Self::File { file } => {
                let path = relative_to(base_dir, &file);
                debug!(path = %path.display(), "reading PEM file");
                std::fs::read_to_string(&path).map_err(|e| CredentialError::io(path, e))
            }
        }
    }

    async fn resolve_async(self, base_dir: Option<&Path>) -> Result<String> {
        match self {
            Self::Inline(text) => Ok(text),
            Self::File { file } => {
                let path = relative_to(base_dir, &file);
                debug!(path = %path.display(), "reading PEM file");
                tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|e| CredentialError::io(path, e))
            }
        }
    }
}

fn relative_to(base_dir: Option<&Path>, file: &Path) -> PathBuf {
    match base_dir {
        Some(base) if file.is_relative() => base.join(file),
        _ => file.to_path_buf(),
    }
}

impl BundleFile {
    fn into_bundle(self, root_ca: String, device_certificate: String, private_key: String) -> CredentialBundle {
        CredentialBundle::new(
            self.thing_name,
            self.wifi_ssid,
            self.wifi_password,
            self.endpoint,
            root_ca,
            device_certificate,
            private_key,
        )
    }
}

/// Parse a bundle document. Relative `{ file = ... }` references are resolved
/// against `base_dir`, or the working directory when it is `None`.
///
/// # Errors
///
/// Returns `Toml` for a document that does not parse and `Io` when a
/// referenced PEM file cannot be read.
pub fn from_toml_str(text: &str, base_dir: Option<&Path>) -> Result<CredentialBundle> {
    let mut file: BundleFile = toml::from_str(text)?;
    let certs = std::mem::take(&mut file.certificates);

    let root_ca = certs.root_ca.resolve(base_dir)?;
    let device_certificate = certs.device_certificate.resolve(base_dir)?;
    let private_key = certs.private_key.resolve(base_dir)?;

    Ok(finish(file.into_bundle(root_ca, device_certificate, private_key)))
}

/// Load a bundle file.
///
/// # Errors
///
/// Fails like [`from_toml_str`], or with `Io` if `path` cannot be read.
pub fn load(path: &Path) -> Result<CredentialBundle> {
    debug!(path = %path.display(), "loading credential bundle");
    let text = std::fs::read_to_string(path).map_err(|e| CredentialError::io(path, e))?;
    from_toml_str(&text, path.parent())
}

/// Load a bundle file without blocking the runtime.
///
/// # Errors
///
/// Same as [`load`].
pub async fn load_async(path: &Path) -> Result<CredentialBundle> {
    debug!(path = %path.display(), "loading credential bundle");
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CredentialError::io(path, e))?;

    let mut file: BundleFile = toml::from_str(&text)?;
    let certs = std::mem::take(&mut file.certificates);
    let base_dir = path.parent();

    let root_ca = certs.root_ca.resolve_async(base_dir).await?;
    let device_certificate = certs.device_certificate.resolve_async(base_dir).await?;
    let private_key = certs.private_key.resolve_async(base_dir).await?;

    Ok(finish(file.into_bundle(root_ca, device_certificate, private_key)))
}

/// Read the `CRASHWATCH_*` environment variables.
///
/// # Errors
///
/// Same as [`from_env_with`].
pub fn from_env() -> Result<CredentialBundle> {
    from_env_with(|name| std::env::var(name).ok())
}

/// Build a bundle from an arbitrary variable lookup.
///
/// PEM variables may hold the text itself (with literal `\n` escapes if the
/// environment cannot carry newlines) or `@path` to read it from a file.
///
/// # Errors
///
/// Returns `Io` when an `@path` reference cannot be read.
pub fn from_env_with<F>(lookup: F) -> Result<CredentialBundle>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = CredentialBundle::builder();
    for field in Field::ALL {
        let Some(raw) = lookup(field.env_var()) else {
            continue;
        };
        let value = if field.is_pem() {
            pem_from_env(&raw)?
        } else {
            raw
        };
        builder = builder.set(field, value);
    }
    Ok(finish(builder.build()))
}

fn pem_from_env(raw: &str) -> Result<String> {
    if let Some(path) = raw.strip_prefix(FILE_REF_PREFIX) {
        let path = Path::new(path.trim());
        return std::fs::read_to_string(path).map_err(|e| CredentialError::io(path, e));
    }
    if raw.contains('\n') {
        Ok(raw.to_string())
    } else {
        Ok(raw.replace("\\n", "\n"))
    }
}

fn finish(bundle: CredentialBundle) -> CredentialBundle {
    let blank = bundle.blank_fields();
    if !blank.is_empty() {
        debug!(fields = ?blank, "bundle has blank values");
    }
    info!(thing = bundle.thing_name(), endpoint = bundle.endpoint(), "credential bundle loaded");
    bundle
}

/// Render a bundle as a TOML document with every PEM blob inline.
///
/// # Errors
///
/// Returns `TomlSerialize` if the document cannot be rendered.
pub fn to_toml_string(bundle: &CredentialBundle) -> Result<String> {
    let file = BundleFile {
        thing_name: bundle.thing_name().to_string(),
        wifi_ssid: bundle.wifi_ssid().to_string(),
        wifi_password: bundle.wifi_password().to_string(),
        endpoint: bundle.endpoint().to_string(),
        certificates: CertificateSection {
            root_ca: PemSource::Inline(bundle.root_ca().to_string()),
            device_certificate: PemSource::Inline(bundle.device_certificate().to_string()),
            private_key: PemSource::Inline(bundle.private_key().to_string()),
        },
    };
    Ok(toml::to_string_pretty(&file)?)
}

/// Write a bundle file, creating parent directories as needed.
///
/// # Errors
///
/// Returns `Io` when the directory or file cannot be written, or
/// `TomlSerialize` if rendering fails.
pub fn save(bundle: &CredentialBundle, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| CredentialError::io(parent, e))?;
        }
    }
    let content = to_toml_string(bundle)?;
    std::fs::write(path, content).map_err(|e| CredentialError::io(path, e))?;
    debug!(path = %path.display(), "credential bundle saved");
    Ok(())
}
