//! Signature starters: the first half of the start/finish handshake
//!
//! A starter sends the signer metadata and the content to sign. The server
//! answers with a token identifying the pending signature and, when the
//! signer certificate is known up front, the data the client must sign.

mod cades;
mod pades;
mod xml;

pub use cades::CadesSignatureStarter;
pub use pades::PadesSignatureStarter;
pub use xml::XmlSignatureStarter;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::RestPkiClient;
use crate::digest::DigestAlgorithm;
use crate::encoding;
use crate::error::{RestError, Result};
use crate::models::CertificateModel;

/// Settings shared by every starter
#[derive(Debug, Clone, Default)]
pub struct SignerSettings {
    pub(crate) certificate_base64: Option<String>,
    pub(crate) signature_policy_id: Option<Uuid>,
    pub(crate) security_context_id: Option<Uuid>,
    pub(crate) callback_argument: Option<String>,
}

impl SignerSettings {
    pub(crate) fn require_policy(&self) -> Result<Uuid> {
        self.signature_policy_id
            .ok_or(RestError::MissingParameter("signature policy"))
    }

    pub(crate) fn require_certificate(&self) -> Result<&str> {
        self.certificate_base64
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or(RestError::MissingParameter("signer certificate"))
    }

    pub(crate) fn fields(&self, signature_policy_id: Uuid) -> SignerFields<'_> {
        SignerFields {
            certificate: self.certificate_base64.as_deref(),
            signature_policy_id,
            security_context_id: self.security_context_id,
            callback_argument: self.callback_argument.as_deref(),
        }
    }
}

/// Request fields common to all start calls
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignerFields<'a> {
    pub certificate: Option<&'a str>,
    pub signature_policy_id: Uuid,
    pub security_context_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_argument: Option<&'a str>,
}

/// Response of every start call
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StartSignatureResponse {
    token: String,
    #[serde(default)]
    to_sign_data: Option<String>,
    #[serde(default)]
    to_sign_hash: Option<String>,
    #[serde(default)]
    digest_algorithm_oid: Option<String>,
    #[serde(default)]
    certificate: Option<CertificateModel>,
}

impl StartSignatureResponse {
    fn into_web_pki(self) -> WebPkiStart {
        WebPkiStart {
            token: self.token,
            certificate: self.certificate,
        }
    }

    fn into_instructions(self) -> Result<ClientSideSignatureInstructions> {
        let to_sign_data = self
            .to_sign_data
            .as_deref()
            .ok_or(RestError::IncompleteResponse("toSignData"))?;
        let to_sign_hash = self
            .to_sign_hash
            .as_deref()
            .ok_or(RestError::IncompleteResponse("toSignHash"))?;
        let digest_algorithm_oid = self
            .digest_algorithm_oid
            .ok_or(RestError::IncompleteResponse("digestAlgorithmOid"))?;

        Ok(ClientSideSignatureInstructions {
            token: self.token,
            to_sign_data: encoding::decode(to_sign_data)?,
            to_sign_hash: encoding::decode(to_sign_hash)?,
            digest_algorithm: DigestAlgorithm::from_oid(&digest_algorithm_oid),
            digest_algorithm_oid,
            certificate: self.certificate,
        })
    }
}

/// Result of starting a signature that the browser (Web PKI) will complete
#[derive(Debug, Clone)]
pub struct WebPkiStart {
    /// Token to pass to the page and later to the finisher
    pub token: String,
    /// Signer certificate, when one was given to the starter
    pub certificate: Option<CertificateModel>,
}

/// What the client must sign to complete a signature on its own
#[derive(Debug, Clone)]
pub struct ClientSideSignatureInstructions {
    pub token: String,
    /// Full data to sign (for signing APIs that hash internally)
    pub to_sign_data: Vec<u8>,
    /// Pre-computed digest of `to_sign_data`
    pub to_sign_hash: Vec<u8>,
    pub digest_algorithm_oid: String,
    /// `None` when the OID is not one of the known digest algorithms
    pub digest_algorithm: Option<DigestAlgorithm>,
    pub certificate: Option<CertificateModel>,
}

/// Common interface of the PAdES, CAdES and XML starters
#[async_trait]
pub trait SignatureStarter: Send + Sync {
    fn settings(&self) -> &SignerSettings;

    fn settings_mut(&mut self) -> &mut SignerSettings;

    /// Start a signature to be completed by Web PKI in the browser.
    /// The signer certificate is optional.
    async fn start_with_web_pki(&self) -> Result<WebPkiStart>;

    /// Start a signature to be completed by the caller. The signer
    /// certificate is required.
    async fn start(&self) -> Result<ClientSideSignatureInstructions>;

    /// Signer certificate, DER-encoded
    fn with_signer_certificate(mut self, certificate: &[u8]) -> Self
    where
        Self: Sized,
    {
        self.settings_mut().certificate_base64 = Some(encoding::encode(certificate));
        self
    }

    /// Signer certificate, already base64-encoded
    fn with_signer_certificate_base64(mut self, certificate: impl Into<String>) -> Self
    where
        Self: Sized,
    {
        self.settings_mut().certificate_base64 = Some(certificate.into());
        self
    }

    fn with_signature_policy(mut self, signature_policy_id: Uuid) -> Self
    where
        Self: Sized,
    {
        self.settings_mut().signature_policy_id = Some(signature_policy_id);
        self
    }

    fn with_security_context(mut self, security_context_id: Uuid) -> Self
    where
        Self: Sized,
    {
        self.settings_mut().security_context_id = Some(security_context_id);
        self
    }

    /// Opaque value handed back by the finisher
    fn with_callback_argument(mut self, callback_argument: impl Into<String>) -> Self
    where
        Self: Sized,
    {
        self.settings_mut().callback_argument = Some(callback_argument.into());
        self
    }
}

/// POST a start request and decode the common response.
pub(crate) async fn post_start<B: Serialize + Sync>(
    client: &RestPkiClient,
    path: &str,
    request: &B,
) -> Result<StartSignatureResponse> {
    client.post(path, request).await
}

pub(crate) fn non_empty(content: &Option<Vec<u8>>) -> Option<&[u8]> {
    content.as_deref().filter(|c| !c.is_empty())
}
