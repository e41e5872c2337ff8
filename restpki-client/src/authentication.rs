//! Certificate authentication through Web PKI

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::client::RestPkiClient;
use crate::error::Result;
use crate::models::CertificateModel;
use crate::validation::ValidationResults;

const AUTHENTICATIONS_PATH: &str = "Api/Authentications";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthenticationPostRequest {
    security_context_id: Uuid,
}

#[derive(Deserialize)]
struct AuthenticationPostResponse {
    token: String,
}

/// Outcome of an authentication: who signed the nonce, and whether their
/// certificate is trusted in the requested security context
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationResult {
    #[serde(default)]
    pub certificate: Option<CertificateModel>,
    #[serde(default, deserialize_with = "crate::encoding::null_as_default")]
    pub validation_results: ValidationResults,
}

impl AuthenticationResult {
    pub fn is_valid(&self) -> bool {
        self.validation_results.is_valid()
    }
}

pub struct Authentication<'a> {
    client: &'a RestPkiClient,
}

impl<'a> Authentication<'a> {
    pub fn new(client: &'a RestPkiClient) -> Self {
        Self { client }
    }

    /// Request a nonce for the browser to sign; returns its token.
    pub async fn start_with_web_pki(&self, security_context_id: Uuid) -> Result<String> {
        let response: AuthenticationPostResponse = self
            .client
            .post(
                AUTHENTICATIONS_PATH,
                &AuthenticationPostRequest {
                    security_context_id,
                },
            )
            .await?;
        info!(%security_context_id, "Authentication started");
        Ok(response.token)
    }

    /// Validate the signed nonce and the certificate that signed it.
    pub async fn complete_with_web_pki(&self, token: &str) -> Result<AuthenticationResult> {
        let path = format!(
            "{}/{}/Finalize",
            AUTHENTICATIONS_PATH,
            urlencoding::encode(token)
        );
        let result: AuthenticationResult = self.client.post_empty(&path).await?;
        info!(valid = result.is_valid(), "Authentication completed");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_decoding() {
        let result: AuthenticationResult = serde_json::from_str(
            r#"{
                "certificate": {"subjectName": {"commonName": "Ada"}, "emailAddress": "ada@example.com"},
                "validationResults": {"errors": [{"type": "CertificateRevoked", "message": "revoked"}]}
            }"#,
        )
        .unwrap();
        assert!(!result.is_valid());
        assert_eq!(
            result.certificate.unwrap().email_address.as_deref(),
            Some("ada@example.com")
        );
    }
}
