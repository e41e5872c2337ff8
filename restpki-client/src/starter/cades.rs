//! CAdES (CMS) signature starter

use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use super::{non_empty, post_start, SignatureStarter, SignerFields, SignerSettings};
use super::{ClientSideSignatureInstructions, WebPkiStart};
use crate::client::RestPkiClient;
use crate::encoding;
use crate::error::{RestError, Result};

const CADES_SIGNATURES_PATH: &str = "Api/CadesSignatures";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CadesSignaturePostRequest<'a> {
    #[serde(flatten)]
    signer: SignerFields<'a>,
    encapsulate_content: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_to_sign: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cms_to_co_sign: Option<String>,
}

/// Starts a CAdES signature of arbitrary content, or a co-signature of an existing CMS
pub struct CadesSignatureStarter<'a> {
    client: &'a RestPkiClient,
    settings: SignerSettings,
    content_to_sign: Option<Vec<u8>>,
    cms_to_co_sign: Option<Vec<u8>>,
    encapsulate_content: Option<bool>,
}

impl<'a> CadesSignatureStarter<'a> {
    pub fn new(client: &'a RestPkiClient) -> Self {
        Self {
            client,
            settings: SignerSettings::default(),
            content_to_sign: None,
            cms_to_co_sign: None,
            encapsulate_content: None,
        }
    }

    pub fn with_content_to_sign(mut self, content: impl Into<Vec<u8>>) -> Self {
        self.content_to_sign = Some(content.into());
        self
    }

    pub fn with_file_to_sign(mut self, path: impl AsRef<Path>) -> Result<Self> {
        self.content_to_sign = Some(std::fs::read(path)?);
        Ok(self)
    }

    /// Existing CMS to add a signature to
    pub fn with_cms_to_co_sign(mut self, cms: impl Into<Vec<u8>>) -> Self {
        self.cms_to_co_sign = Some(cms.into());
        self
    }

    pub fn with_cms_file_to_co_sign(mut self, path: impl AsRef<Path>) -> Result<Self> {
        self.cms_to_co_sign = Some(std::fs::read(path)?);
        Ok(self)
    }

    /// Whether the signed content is embedded in the resulting CMS
    pub fn with_encapsulate_content(mut self, encapsulate: bool) -> Self {
        self.encapsulate_content = Some(encapsulate);
        self
    }

    fn request(&self, require_certificate: bool) -> Result<CadesSignaturePostRequest<'_>> {
        let content = non_empty(&self.content_to_sign);
        let cms = non_empty(&self.cms_to_co_sign);
        if content.is_none() && cms.is_none() {
            return Err(RestError::MissingParameter("content to sign or CMS to co-sign"));
        }
        if require_certificate {
            self.settings.require_certificate()?;
        }
        let policy = self.settings.require_policy()?;

        Ok(CadesSignaturePostRequest {
            signer: self.settings.fields(policy),
            encapsulate_content: self.encapsulate_content,
            content_to_sign: content.map(encoding::encode),
            cms_to_co_sign: cms.map(encoding::encode),
        })
    }
}

#[async_trait]
impl SignatureStarter for CadesSignatureStarter<'_> {
    fn settings(&self) -> &SignerSettings {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut SignerSettings {
        &mut self.settings
    }

    async fn start_with_web_pki(&self) -> Result<WebPkiStart> {
        let request = self.request(false)?;
        let response = post_start(self.client, CADES_SIGNATURES_PATH, &request).await?;
        info!(
            co_sign = request.cms_to_co_sign.is_some(),
            "CAdES signature started for Web PKI"
        );
        Ok(response.into_web_pki())
    }

    async fn start(&self) -> Result<ClientSideSignatureInstructions> {
        let request = self.request(true)?;
        let response = post_start(self.client, CADES_SIGNATURES_PATH, &request).await?;
        info!(
            co_sign = request.cms_to_co_sign.is_some(),
            "CAdES signature started for client-side signing"
        );
        response.into_instructions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::standard::StandardSignaturePolicies;

    fn client() -> RestPkiClient {
        RestPkiClient::new(ClientConfig::new("http://localhost:1", "token")).unwrap()
    }

    #[test]
    fn test_requires_content_or_cms() {
        let client = client();
        let starter = CadesSignatureStarter::new(&client)
            .with_signature_policy(StandardSignaturePolicies::CADES_BES);
        let err = starter.request(false).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The content to sign or CMS to co-sign was not set"
        );
    }

    #[test]
    fn test_co_sign_only() {
        let client = client();
        let starter = CadesSignatureStarter::new(&client)
            .with_cms_to_co_sign(b"cms".to_vec())
            .with_encapsulate_content(true)
            .with_signature_policy(StandardSignaturePolicies::CADES_ICPBR_ADR_BASICA);

        let value = serde_json::to_value(starter.request(false).unwrap()).unwrap();
        assert_eq!(value["cmsToCoSign"], "Y21z");
        assert!(value.get("contentToSign").is_none());
        assert_eq!(value["encapsulateContent"], true);
        assert!(value["certificate"].is_null());
    }

    #[test]
    fn test_missing_policy() {
        let client = client();
        let starter = CadesSignatureStarter::new(&client).with_content_to_sign(b"data".to_vec());
        assert!(matches!(
            starter.request(false),
            Err(RestError::MissingParameter("signature policy"))
        ));
    }
}
