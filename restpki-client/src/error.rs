//! Error types for the REST PKI client

use reqwest::Method;
use thiserror::Error;

use crate::validation::ValidationResults;

/// REST PKI client error
#[derive(Debug, Error)]
pub enum RestError {
    /// The API could not be reached (connection, TLS or timeout failure)
    #[error("REST action {verb} {url} unreachable")]
    Unreachable {
        verb: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-2xx status that carries no REST PKI error code
    #[error("REST action {verb} {url} returned HTTP error {status}{}", suffix(": ", .message))]
    Http {
        verb: Method,
        url: String,
        status: u16,
        message: Option<String>,
    },

    /// The API rejected the request with a `ValidationError` code
    #[error("{results}")]
    Validation {
        verb: Method,
        url: String,
        results: ValidationResults,
    },

    /// The API rejected the request with a domain error code
    #[error("REST PKI action {verb} {url} error: {code}{}", parenthesized(.detail))]
    RestPki {
        verb: Method,
        url: String,
        code: String,
        detail: Option<String>,
    },

    /// A successful response body could not be decoded
    #[error("Invalid response from {verb} {url}: {source}")]
    InvalidResponse {
        verb: Method,
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A successful response lacked a field required by the operation
    #[error("The response is missing the {0} field")]
    IncompleteResponse(&'static str),

    /// A required parameter was not set before calling the API
    #[error("The {0} was not set")]
    MissingParameter(&'static str),

    /// The API named a digest algorithm this client does not know
    #[error("Unsupported digest algorithm: {0}")]
    UnsupportedDigestAlgorithm(String),

    /// A color could not be parsed
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base64 decode error
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Reading or writing a local file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RestError {
    /// HTTP verb of the failed request, for errors raised by an API call
    pub fn verb(&self) -> Option<&Method> {
        match self {
            RestError::Unreachable { verb, .. }
            | RestError::Http { verb, .. }
            | RestError::Validation { verb, .. }
            | RestError::RestPki { verb, .. }
            | RestError::InvalidResponse { verb, .. } => Some(verb),
            _ => None,
        }
    }

    /// URL of the failed request, for errors raised by an API call
    pub fn url(&self) -> Option<&str> {
        match self {
            RestError::Unreachable { url, .. }
            | RestError::Http { url, .. }
            | RestError::Validation { url, .. }
            | RestError::RestPki { url, .. }
            | RestError::InvalidResponse { url, .. } => Some(url),
            _ => None,
        }
    }

    /// HTTP status code of the failed request, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            RestError::Http { status, .. } => Some(*status),
            RestError::Validation { .. } | RestError::RestPki { .. } => Some(422),
            _ => None,
        }
    }

    /// Validation results attached to a `ValidationError` response
    pub fn validation_results(&self) -> Option<&ValidationResults> {
        match self {
            RestError::Validation { results, .. } => Some(results),
            _ => None,
        }
    }
}

fn suffix(separator: &str, value: &Option<String>) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => format!("{separator}{v}"),
        _ => String::new(),
    }
}

fn parenthesized(value: &Option<String>) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => format!(" ({v})"),
        _ => String::new(),
    }
}

/// Result type for REST PKI operations
pub type Result<T> = std::result::Result<T, RestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_message() {
        let err = RestError::Http {
            verb: Method::POST,
            url: "https://pki.rest/Api/PadesSignatures".into(),
            status: 500,
            message: Some("Internal failure".into()),
        };
        assert_eq!(
            err.to_string(),
            "REST action POST https://pki.rest/Api/PadesSignatures returned HTTP error 500: Internal failure"
        );
        assert_eq!(err.status(), Some(500));

        let bare = RestError::Http {
            verb: Method::GET,
            url: "u".into(),
            status: 404,
            message: None,
        };
        assert_eq!(bare.to_string(), "REST action GET u returned HTTP error 404");
    }

    #[test]
    fn test_rest_pki_error_message() {
        let err = RestError::RestPki {
            verb: Method::POST,
            url: "u".into(),
            code: "SignatureSessionNotFound".into(),
            detail: Some("token expired".into()),
        };
        assert_eq!(
            err.to_string(),
            "REST PKI action POST u error: SignatureSessionNotFound (token expired)"
        );

        let no_detail = RestError::RestPki {
            verb: Method::POST,
            url: "u".into(),
            code: "CertificateNotFound".into(),
            detail: Some(String::new()),
        };
        assert_eq!(no_detail.to_string(), "REST PKI action POST u error: CertificateNotFound");
    }

    #[test]
    fn test_missing_parameter_message() {
        let err = RestError::MissingParameter("PDF to sign");
        assert_eq!(err.to_string(), "The PDF to sign was not set");
        assert!(err.verb().is_none());
        assert!(err.url().is_none());
    }
}
