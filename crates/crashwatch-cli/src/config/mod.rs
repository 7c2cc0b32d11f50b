//! Where the credential bundle comes from.

use anyhow::{Context as _, Result};
use crashwatch_core::{loader, CredentialBundle};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the bundle inside the config directory.
pub const BUNDLE_FILE_NAME: &str = "credentials.toml";

/// Default bundle path in the platform config directory.
pub fn default_bundle_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("io", "crashwatch", "crashwatch")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    Ok(dirs.config_dir().join(BUNDLE_FILE_NAME))
}

/// The explicit path if given, otherwise the default.
pub fn resolve_bundle_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => default_bundle_path(),
    }
}

/// Origin of the bundle for this invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleSource {
    /// A TOML bundle file
    File(PathBuf),
    /// `CRASHWATCH_*` environment variables
    Environment,
}

impl BundleSource {
    /// Load the bundle once. No validation happens here.
    pub async fn load(&self) -> Result<CredentialBundle> {
        debug!(source = %self, "loading bundle");
        match self {
            Self::File(path) => load_file(path).await,
            Self::Environment => {
                loader::from_env().context("Failed to read bundle from the environment")
            }
        }
    }
}

async fn load_file(path: &Path) -> Result<CredentialBundle> {
    if !path.exists() {
        anyhow::bail!(
            "No bundle file at {}\n\n\
             Create one with `crashwatch init`, pass --bundle, or use --from-env.",
            path.display()
        );
    }
    loader::load_async(path)
        .await
        .with_context(|| format!("Failed to load bundle from {}", path.display()))
}

impl std::fmt::Display for BundleSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Environment => write!(f, "environment"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let path = resolve_bundle_path(Some(PathBuf::from("/tmp/car.toml"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/car.toml"));
    }

    #[tokio::test]
    async fn missing_file_explains_itself() {
        let dir = tempfile::TempDir::new().unwrap();
        let source = BundleSource::File(dir.path().join("absent.toml"));
        let err = source.load().await.unwrap_err();
        assert!(err.to_string().contains("crashwatch init"));
    }
}
