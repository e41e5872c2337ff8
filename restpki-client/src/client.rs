//! HTTP transport for the REST PKI API

use std::time::Duration;

use reqwest::{header, Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::authentication::Authentication;
use crate::config::ClientConfig;
use crate::error::{RestError, Result};
use crate::presets::PresetCache;
use crate::validation::ValidationResults;

/// Error code the API uses for requests rejected by validation
const VALIDATION_ERROR_CODE: &str = "ValidationError";

/// Error payload returned on non-2xx responses
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorModel {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    validation_results: Option<ValidationResults>,
}

/// HTTP client for the REST PKI API
///
/// Every request carries the access token as a bearer token and asks for
/// JSON. Non-2xx responses are mapped to [`RestError`] variants.
///
/// # Example
///
/// ```rust,no_run
/// use restpki_client::{ClientConfig, RestPkiClient, StandardSecurityContexts};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = RestPkiClient::new(ClientConfig::new("https://pki.rest/", "my-token"))?;
/// let token = client
///     .authentication()
///     .start_with_web_pki(StandardSecurityContexts::PKI_BRAZIL)
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct RestPkiClient {
    config: ClientConfig,
    endpoint: String,
    client: Client,
    pub(crate) presets: PresetCache,
}

impl RestPkiClient {
    /// Create a new client. Fails when the configuration is unusable.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        let bearer = header::HeaderValue::from_str(&format!("Bearer {}", config.access_token))
            .map_err(|_| RestError::Config("access token contains invalid characters".into()))?;
        headers.insert(header::AUTHORIZATION, bearer);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RestError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint: config.normalized_endpoint(),
            config,
            client,
            presets: PresetCache::default(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Entry point for certificate authentication
    pub fn authentication(&self) -> Authentication<'_> {
        Authentication::new(self)
    }

    /// GET a path relative to the endpoint and decode the JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!(verb = "GET", %url, "REST PKI request");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| {
                log_failure(RestError::Unreachable {
                    verb: Method::GET,
                    url: url.clone(),
                    source,
                })
            })?;

        self.handle_response(Method::GET, url, response).await
    }

    /// POST a JSON body to a path relative to the endpoint.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        debug!(verb = "POST", %url, "REST PKI request");

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|source| {
                log_failure(RestError::Unreachable {
                    verb: Method::POST,
                    url: url.clone(),
                    source,
                })
            })?;

        self.handle_response(Method::POST, url, response).await
    }

    /// POST without a body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!(verb = "POST", %url, "REST PKI request");

        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|source| {
                log_failure(RestError::Unreachable {
                    verb: Method::POST,
                    url: url.clone(),
                    source,
                })
            })?;

        self.handle_response(Method::POST, url, response).await
    }

    // ==================== Helper Methods ====================

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path.trim_start_matches('/'))
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        verb: Method,
        url: String,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(log_failure(check_response(verb, url, status, &body)));
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(source) => return Err(log_failure(RestError::Unreachable { verb, url, source })),
        };

        serde_json::from_slice(&body)
            .map_err(|source| log_failure(RestError::InvalidResponse { verb, url, source }))
    }
}

fn log_failure(error: RestError) -> RestError {
    warn!(error = %error, "REST PKI request failed");
    error
}

/// Map a non-2xx response to the matching error kind.
fn check_response(verb: Method, url: String, status: StatusCode, body: &[u8]) -> RestError {
    let model = match serde_json::from_slice::<ErrorModel>(body) {
        Ok(model) => model,
        Err(_) => {
            return RestError::Http {
                verb,
                url,
                status: status.as_u16(),
                message: None,
            }
        }
    };

    match model.code.filter(|c| !c.is_empty()) {
        Some(code) if status == StatusCode::UNPROCESSABLE_ENTITY => {
            if code == VALIDATION_ERROR_CODE {
                return RestError::Validation {
                    verb,
                    url,
                    results: model.validation_results.unwrap_or_default(),
                };
            }
            RestError::RestPki {
                verb,
                url,
                code,
                detail: model.detail,
            }
        }
        _ => RestError::Http {
            verb,
            url,
            status: status.as_u16(),
            message: model.message,
        },
    }
}
