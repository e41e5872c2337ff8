//! Signature explorers: open a signed file and let the server validate it

mod cades;
mod pades;

pub use cades::{CadesSignature, CadesSignatureExplorer, CadesSignerInfo};
pub use pades::{PadesSignature, PadesSignatureExplorer, PadesSignerInfo};

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::digest::DigestAlgorithm;
use crate::encoding::{self, base64_bytes};
use crate::error::{RestError, Result};
use crate::models::CertificateModel;
use crate::validation::ValidationResults;

/// Settings shared by every explorer
#[derive(Debug, Clone)]
pub struct ExplorerSettings {
    pub(crate) signature_file: Option<Vec<u8>>,
    pub(crate) validate: bool,
    pub(crate) default_signature_policy_id: Option<Uuid>,
    pub(crate) acceptable_explicit_policies: Option<Vec<Uuid>>,
    pub(crate) security_context_id: Option<Uuid>,
}

impl Default for ExplorerSettings {
    fn default() -> Self {
        Self {
            signature_file: None,
            validate: true,
            default_signature_policy_id: None,
            acceptable_explicit_policies: None,
            security_context_id: None,
        }
    }
}

impl ExplorerSettings {
    pub(crate) fn require_signature_file(&self) -> Result<&[u8]> {
        self.signature_file
            .as_deref()
            .filter(|f| !f.is_empty())
            .ok_or(RestError::MissingParameter("signature file to open"))
    }

    pub(crate) fn request<'a>(
        &'a self,
        content: &[u8],
        mime_type: &'static str,
        data_hashes: Option<Vec<DigestAlgorithmAndValue>>,
    ) -> OpenSignatureRequest<'a> {
        OpenSignatureRequest {
            validate: self.validate,
            default_signature_policy_id: self.default_signature_policy_id,
            security_context_id: self.security_context_id,
            acceptable_explicit_policies: self.acceptable_explicit_policies.as_deref(),
            data_hashes,
            file: FileModel {
                content: encoding::encode(content),
                mime_type,
                blob_id: None,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileModel {
    pub content: String,
    pub mime_type: &'static str,
    pub blob_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OpenSignatureRequest<'a> {
    validate: bool,
    default_signature_policy_id: Option<Uuid>,
    security_context_id: Option<Uuid>,
    acceptable_explicit_policies: Option<&'a [Uuid]>,
    data_hashes: Option<Vec<DigestAlgorithmAndValue>>,
    file: FileModel,
}

/// A digest value tagged with its algorithm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestAlgorithmAndValue {
    pub algorithm: DigestAlgorithm,
    #[serde(with = "base64_bytes")]
    pub value: Vec<u8>,
    #[serde(default)]
    pub hex_value: Option<String>,
}

impl DigestAlgorithmAndValue {
    /// Digest `data` locally with `algorithm`
    pub fn compute(algorithm: DigestAlgorithm, data: &[u8]) -> Self {
        Self {
            algorithm,
            value: algorithm.compute(data),
            hex_value: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignatureAlgorithmIdentifier {
    pub name: Option<String>,
    pub oid: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignatureAlgorithmAndValue {
    pub algorithm: SignatureAlgorithmIdentifier,
}

/// Explicit policy a signature commits to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignaturePolicyIdentifier {
    pub oid: Option<String>,
    pub uri: Option<String>,
}

/// One signer of an opened signature
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignerInfo {
    pub message_digest: DigestAlgorithmAndValue,
    #[serde(default)]
    pub signature: Option<SignatureAlgorithmAndValue>,
    #[serde(default)]
    pub signature_policy: Option<SignaturePolicyIdentifier>,
    #[serde(default)]
    pub certificate: Option<CertificateModel>,
    #[serde(default)]
    pub signing_time: Option<DateTime<FixedOffset>>,
    /// Present when the explorer was asked to validate
    #[serde(default)]
    pub validation_results: Option<ValidationResults>,
}

impl SignerInfo {
    /// `false` when validation ran and reported errors
    pub fn is_valid(&self) -> bool {
        self.validation_results
            .as_ref()
            .map_or(true, ValidationResults::is_valid)
    }
}

/// Common interface of the PAdES and CAdES explorers
#[async_trait]
pub trait SignatureExplorer: Send + Sync {
    type Output;

    fn settings(&self) -> &ExplorerSettings;

    fn settings_mut(&mut self) -> &mut ExplorerSettings;

    /// Send the signature file to the server and decode its signers.
    async fn open(&self) -> Result<Self::Output>;

    fn with_signature_file(mut self, content: impl Into<Vec<u8>>) -> Self
    where
        Self: Sized,
    {
        self.settings_mut().signature_file = Some(content.into());
        self
    }

    fn with_signature_file_path(mut self, path: impl AsRef<Path>) -> Result<Self>
    where
        Self: Sized,
    {
        self.settings_mut().signature_file = Some(std::fs::read(path)?);
        Ok(self)
    }

    /// Whether the server validates each signer (default: true)
    fn with_validate(mut self, validate: bool) -> Self
    where
        Self: Sized,
    {
        self.settings_mut().validate = validate;
        self
    }

    /// Policy used for signers that do not commit to an explicit one
    fn with_default_signature_policy(mut self, signature_policy_id: Uuid) -> Self
    where
        Self: Sized,
    {
        self.settings_mut().default_signature_policy_id = Some(signature_policy_id);
        self
    }

    /// Explicit policies accepted as-is, usually from [`crate::StandardSignaturePolicyCatalog`]
    fn with_acceptable_explicit_policies(mut self, policies: Vec<Uuid>) -> Self
    where
        Self: Sized,
    {
        self.settings_mut().acceptable_explicit_policies = Some(policies);
        self
    }

    fn with_security_context(mut self, security_context_id: Uuid) -> Self
    where
        Self: Sized,
    {
        self.settings_mut().security_context_id = Some(security_context_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signer_info_decoding() {
        let signer: SignerInfo = serde_json::from_str(
            r#"{
                "messageDigest": {"algorithm": "SHA256", "value": "AQID", "hexValue": "010203"},
                "signature": {"algorithm": {"name": "SHA256WithRSA", "oid": "1.2.840.113549.1.1.11"}},
                "signaturePolicy": null,
                "certificate": {"subjectName": {"commonName": "Ada"}},
                "signingTime": "2016-05-04T17:35:03-03:00",
                "validationResults": {"errors": [], "warnings": null, "passedChecks": [{"type": "X", "message": "ok"}]}
            }"#,
        )
        .unwrap();

        assert_eq!(signer.message_digest.algorithm, DigestAlgorithm::Sha256);
        assert_eq!(signer.message_digest.value, vec![1, 2, 3]);
        assert_eq!(
            signer.signature.unwrap().algorithm.name.as_deref(),
            Some("SHA256WithRSA")
        );
        let signing_time = signer.signing_time.unwrap();
        assert_eq!(signing_time.offset().local_minus_utc(), -3 * 3600);
        assert!(signer.validation_results.unwrap().is_valid());
    }

    #[test]
    fn test_unknown_digest_algorithm_fails() {
        let result = serde_json::from_str::<SignerInfo>(
            r#"{"messageDigest": {"algorithm": "WHIRLPOOL", "value": ""}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_open_request_shape() {
        let settings = ExplorerSettings {
            default_signature_policy_id: Some(Uuid::nil()),
            ..Default::default()
        };
        let hashes = vec![DigestAlgorithmAndValue::compute(DigestAlgorithm::Sha1, b"abc")];
        let value =
            serde_json::to_value(settings.request(b"%PDF", "application/pdf", Some(hashes))).unwrap();

        assert_eq!(value["validate"], true);
        assert_eq!(value["defaultSignaturePolicyId"], "00000000-0000-0000-0000-000000000000");
        assert!(value["acceptableExplicitPolicies"].is_null());
        assert_eq!(value["file"]["content"], "JVBERg==");
        assert_eq!(value["file"]["mimeType"], "application/pdf");
        assert!(value["file"]["blobId"].is_null());
        assert_eq!(value["dataHashes"][0]["algorithm"], "SHA1");
        assert_eq!(value["dataHashes"][0]["value"], "qZk+NkcGgWq6PiVxeFDCbJzQ2J0=");
        assert!(value["dataHashes"][0]["hexValue"].is_null());
    }

    #[test]
    fn test_missing_signature_file() {
        let settings = ExplorerSettings::default();
        assert!(matches!(
            settings.require_signature_file(),
            Err(RestError::MissingParameter("signature file to open"))
        ));
    }
}
