//! CLI configuration

use std::path::{Path, PathBuf};

use anyhow::Context;
use restpki_client::ClientConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Connection to the REST PKI instance
    #[serde(default)]
    pub restpki: ClientConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Where finished artifacts go
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for signed files when no output path is given
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Image placed on the right of the footnote stamp (PNG)
    #[serde(default)]
    pub stamp_image: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            stamp_image: None,
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("app-data")
}

impl CliConfig {
    /// Load the config file, or defaults when it does not exist.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Apply command-line (or environment) overrides on top of the file values.
    pub fn apply_overrides(
        &mut self,
        endpoint: Option<String>,
        access_token: Option<String>,
        data_dir: Option<PathBuf>,
    ) {
        if let Some(endpoint) = endpoint {
            self.restpki.endpoint_url = endpoint;
        }
        if let Some(access_token) = access_token {
            self.restpki.access_token = access_token;
        }
        if let Some(data_dir) = data_dir {
            self.output.data_dir = data_dir;
        }
    }

    /// Path for a new artifact in the data directory, named after a fresh UUID
    pub fn artifact_path(&self, extension: &str) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(&self.output.data_dir).with_context(|| {
            format!("failed to create {}", self.output.data_dir.display())
        })?;
        Ok(self
            .output
            .data_dir
            .join(format!("{}.{}", uuid::Uuid::new_v4(), extension)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig::load(dir.path().join("restpki.toml")).unwrap();
        assert_eq!(config.restpki.endpoint_url, "https://pki.rest/");
        assert_eq!(config.output.data_dir, PathBuf::from("app-data"));
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[restpki]
access_token = "abc"
timeout_secs = 5

[output]
stamp_image = "content/PdfStamp.png"
"#
        )
        .unwrap();

        let config = CliConfig::load(file.path()).unwrap();
        assert_eq!(config.restpki.access_token, "abc");
        assert_eq!(config.restpki.timeout_secs, 5);
        assert_eq!(config.restpki.endpoint_url, "https://pki.rest/");
        assert_eq!(config.output.data_dir, PathBuf::from("app-data"));
        assert_eq!(
            config.output.stamp_image,
            Some(PathBuf::from("content/PdfStamp.png"))
        );
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "restpki = 3").unwrap();
        assert!(CliConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_overrides_and_artifact_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CliConfig::default();
        config.apply_overrides(
            Some("http://localhost:5000/".into()),
            Some("token".into()),
            Some(dir.path().join("out")),
        );
        assert_eq!(config.restpki.endpoint_url, "http://localhost:5000/");
        assert_eq!(config.restpki.access_token, "token");

        let path = config.artifact_path("pdf").unwrap();
        assert_eq!(path.parent().unwrap(), dir.path().join("out"));
        assert_eq!(path.extension().unwrap(), "pdf");
        assert!(dir.path().join("out").is_dir());
    }
}
