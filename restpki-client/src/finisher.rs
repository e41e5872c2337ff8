//! Signature finishers: the second half of the start/finish handshake
//!
//! A finisher takes the token returned by a starter and, for client-side
//! signatures, the signature bytes the client produced over `to_sign_hash`.
//! The server assembles the signed artifact and returns it along with the
//! signer certificate.

use std::marker::PhantomData;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::client::RestPkiClient;
use crate::encoding::{self, base64_bytes};
use crate::error::{RestError, Result};
use crate::models::CertificateModel;

/// Per-signature-type behavior of a finisher
pub trait FinishKind {
    /// Base path of the signature resource, without the token
    const API_PATH: &'static str;
    /// Label used in log events
    const LABEL: &'static str;

    type Output: DeserializeOwned;
}

/// PAdES finisher marker
#[derive(Debug, Clone, Copy)]
pub struct Pades;

/// CAdES finisher marker
#[derive(Debug, Clone, Copy)]
pub struct Cades;

/// XML finisher marker
#[derive(Debug, Clone, Copy)]
pub struct Xml;

impl FinishKind for Pades {
    const API_PATH: &'static str = "Api/PadesSignatures";
    const LABEL: &'static str = "PAdES";
    type Output = PadesSignatureResult;
}

impl FinishKind for Cades {
    const API_PATH: &'static str = "Api/CadesSignatures";
    const LABEL: &'static str = "CAdES";
    type Output = CadesSignatureResult;
}

impl FinishKind for Xml {
    const API_PATH: &'static str = "Api/XmlSignatures";
    const LABEL: &'static str = "XML";
    type Output = XmlSignatureResult;
}

pub type PadesSignatureFinisher<'a> = SignatureFinisher<'a, Pades>;
pub type CadesSignatureFinisher<'a> = SignatureFinisher<'a, Cades>;
pub type XmlSignatureFinisher<'a> = SignatureFinisher<'a, Xml>;

#[derive(Serialize)]
struct SignedBytesRequest<'a> {
    signature: &'a str,
}

/// Completes a pending signature identified by its token
pub struct SignatureFinisher<'a, K: FinishKind> {
    client: &'a RestPkiClient,
    token: Option<String>,
    signature_base64: Option<String>,
    _kind: PhantomData<K>,
}

impl<'a, K: FinishKind> SignatureFinisher<'a, K> {
    pub fn new(client: &'a RestPkiClient) -> Self {
        Self {
            client,
            token: None,
            signature_base64: None,
            _kind: PhantomData,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Signature computed by the client over `to_sign_hash`
    pub fn with_signature(mut self, signature: &[u8]) -> Self {
        self.signature_base64 = Some(encoding::encode(signature));
        self
    }

    pub fn with_signature_base64(mut self, signature: impl Into<String>) -> Self {
        self.signature_base64 = Some(signature.into());
        self
    }

    fn token_segment(&self) -> Result<String> {
        let token = self
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(RestError::MissingParameter("token"))?;
        Ok(urlencoding::encode(token).into_owned())
    }

    /// Send the finish request and return the signed artifact.
    ///
    /// Without a signature the server completes a Web PKI signature
    /// (`Finalize`); with one it embeds the client's signature (`SignedBytes`).
    pub async fn finish(self) -> Result<K::Output> {
        let token = self.token_segment()?;
        let signature = self.signature_base64.as_deref().filter(|s| !s.is_empty());
        let output: K::Output = match signature {
            None => {
                let path = format!("{}/{}/Finalize", K::API_PATH, token);
                self.client.post_empty(&path).await?
            }
            Some(signature) => {
                let path = format!("{}/{}/SignedBytes", K::API_PATH, token);
                self.client
                    .post(&path, &SignedBytesRequest { signature })
                    .await?
            }
        };
        info!(
            kind = K::LABEL,
            client_side = signature.is_some(),
            "Signature finished"
        );
        Ok(output)
    }
}

/// Signed PDF returned by the PAdES finisher
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PadesSignatureResult {
    #[serde(with = "base64_bytes")]
    pub signed_pdf: Vec<u8>,
    #[serde(default)]
    pub callback_argument: Option<String>,
    #[serde(default)]
    pub certificate: Option<CertificateModel>,
}

impl PadesSignatureResult {
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.signed_pdf)?;
        Ok(())
    }
}

/// CMS returned by the CAdES finisher
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CadesSignatureResult {
    #[serde(with = "base64_bytes")]
    pub cms: Vec<u8>,
    #[serde(default)]
    pub callback_argument: Option<String>,
    #[serde(default)]
    pub certificate: Option<CertificateModel>,
}

impl CadesSignatureResult {
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.cms)?;
        Ok(())
    }
}

/// Signed XML returned by the XML finisher
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XmlSignatureResult {
    #[serde(with = "base64_bytes")]
    pub signed_xml: Vec<u8>,
    #[serde(default)]
    pub certificate: Option<CertificateModel>,
}

impl XmlSignatureResult {
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.signed_xml)?;
        Ok(())
    }
}
