use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{DigestAlgorithmAndValue, ExplorerSettings, SignatureExplorer, SignerInfo};
use crate::client::RestPkiClient;
use crate::digest::DigestAlgorithm;
use crate::encoding;
use crate::error::Result;

const CADES_OPEN_PATH: &str = "Api/CadesSignatures/Open";
const CADES_REQUIRED_HASHES_PATH: &str = "Api/CadesSignatures/RequiredHashes";
const CMS_SIGNATURE_MIME_TYPE: &str = "application/pkcs7-signature";

pub type CadesSignerInfo = SignerInfo;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CadesSignature {
    #[serde(default)]
    pub encapsulated_content_type: Option<String>,
    #[serde(default)]
    pub has_encapsulated_content: bool,
    #[serde(default, deserialize_with = "crate::encoding::null_as_default")]
    pub signers: Vec<CadesSignerInfo>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RequiredHashesRequest {
    content: String,
    mime_type: &'static str,
}

/// Opens a CMS signature, optionally with the detached content it signs
pub struct CadesSignatureExplorer<'a> {
    client: &'a RestPkiClient,
    settings: ExplorerSettings,
    data_file: Option<Vec<u8>>,
}

impl<'a> CadesSignatureExplorer<'a> {
    pub fn new(client: &'a RestPkiClient) -> Self {
        Self {
            client,
            settings: ExplorerSettings::default(),
            data_file: None,
        }
    }

    /// Content of a detached signature. Only its digests are sent.
    pub fn with_data_file(mut self, content: impl Into<Vec<u8>>) -> Self {
        self.data_file = Some(content.into());
        self
    }

    pub fn with_data_file_path(mut self, path: impl AsRef<Path>) -> Result<Self> {
        self.data_file = Some(std::fs::read(path)?);
        Ok(self)
    }

    async fn required_hashes(&self, cms: &[u8]) -> Result<Vec<DigestAlgorithm>> {
        let request = RequiredHashesRequest {
            content: encoding::encode(cms),
            mime_type: CMS_SIGNATURE_MIME_TYPE,
        };
        let names: Vec<String> = self
            .client
            .post(CADES_REQUIRED_HASHES_PATH, &request)
            .await?;
        names
            .iter()
            .map(|name| DigestAlgorithm::from_api_name(name))
            .collect()
    }

    async fn data_hashes(&self, cms: &[u8]) -> Result<Option<Vec<DigestAlgorithmAndValue>>> {
        let Some(data) = self.data_file.as_deref().filter(|d| !d.is_empty()) else {
            return Ok(None);
        };
        let algorithms = self.required_hashes(cms).await?;
        if algorithms.is_empty() {
            return Ok(None);
        }
        debug!(?algorithms, "Computing data hashes for detached content");
        Ok(Some(
            algorithms
                .into_iter()
                .map(|alg| DigestAlgorithmAndValue::compute(alg, data))
                .collect(),
        ))
    }
}

#[async_trait]
impl SignatureExplorer for CadesSignatureExplorer<'_> {
    type Output = CadesSignature;

    fn settings(&self) -> &ExplorerSettings {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut ExplorerSettings {
        &mut self.settings
    }

    async fn open(&self) -> Result<CadesSignature> {
        let cms = self.settings.require_signature_file()?;
        let data_hashes = self.data_hashes(cms).await?;
        let request = self
            .settings
            .request(cms, CMS_SIGNATURE_MIME_TYPE, data_hashes);
        let signature: CadesSignature = self.client.post(CADES_OPEN_PATH, &request).await?;
        info!(
            signers = signature.signers.len(),
            encapsulated = signature.has_encapsulated_content,
            "CMS signature opened"
        );
        Ok(signature)
    }
}
