use std::ops::Deref;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use super::{ExplorerSettings, SignatureExplorer, SignerInfo};
use crate::client::RestPkiClient;
use crate::error::Result;

const PADES_OPEN_PATH: &str = "Api/PadesSignatures/Open";
const PDF_MIME_TYPE: &str = "application/pdf";

/// Signer of a PDF, including document timestamps
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PadesSignerInfo {
    #[serde(flatten)]
    pub signer: SignerInfo,
    #[serde(default)]
    pub is_document_timestamp: bool,
    #[serde(default)]
    pub signature_field_name: Option<String>,
}

impl Deref for PadesSignerInfo {
    type Target = SignerInfo;

    fn deref(&self) -> &SignerInfo {
        &self.signer
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PadesSignature {
    #[serde(default, deserialize_with = "crate::encoding::null_as_default")]
    pub signers: Vec<PadesSignerInfo>,
}

/// Opens a signed PDF
pub struct PadesSignatureExplorer<'a> {
    client: &'a RestPkiClient,
    settings: ExplorerSettings,
}

impl<'a> PadesSignatureExplorer<'a> {
    pub fn new(client: &'a RestPkiClient) -> Self {
        Self {
            client,
            settings: ExplorerSettings::default(),
        }
    }
}

#[async_trait]
impl SignatureExplorer for PadesSignatureExplorer<'_> {
    type Output = PadesSignature;

    fn settings(&self) -> &ExplorerSettings {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut ExplorerSettings {
        &mut self.settings
    }

    async fn open(&self) -> Result<PadesSignature> {
        let content = self.settings.require_signature_file()?;
        let request = self.settings.request(content, PDF_MIME_TYPE, None);
        let signature: PadesSignature = self.client.post(PADES_OPEN_PATH, &request).await?;
        info!(signers = signature.signers.len(), "PDF signature opened");
        Ok(signature)
    }
}
