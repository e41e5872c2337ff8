//! Rust client SDK for the REST PKI signature API
//!
//! Wraps the JSON-over-HTTPS API of REST PKI: signatures are started and
//! finished through a two-step token handshake, signed files can be opened
//! for server-side validation, and users can be authenticated by their
//! certificates. All cryptography happens on the server.
//!
//! # Example
//!
//! ```rust,no_run
//! use restpki_client::{
//!     ClientConfig, PadesSignatureFinisher, PadesSignatureStarter, RestPkiClient,
//!     SignatureStarter, StandardSecurityContexts, StandardSignaturePolicies,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = RestPkiClient::new(ClientConfig {
//!     access_token: "my-access-token".into(),
//!     ..Default::default()
//! })?;
//!
//! // Start the signature and hand the token to the browser
//! let started = PadesSignatureStarter::new(&client)
//!     .with_pdf_path("document.pdf")?
//!     .with_signature_policy(StandardSignaturePolicies::PADES_BASIC)
//!     .with_security_context(StandardSecurityContexts::PKI_BRAZIL)
//!     .start_with_web_pki()
//!     .await?;
//!
//! // ... once the browser signed, finish it
//! let result = PadesSignatureFinisher::new(&client)
//!     .with_token(started.token)
//!     .finish()
//!     .await?;
//! result.write_to_path("document-signed.pdf")?;
//! # Ok(())
//! # }
//! ```

pub mod authentication;
pub mod client;
pub mod config;
pub mod digest;
pub mod error;
pub mod explorer;
pub mod finisher;
pub mod models;
pub mod presets;
pub mod standard;
pub mod starter;
pub mod validation;

mod encoding;

// Re-export main types
pub use authentication::{Authentication, AuthenticationResult};
pub use client::RestPkiClient;
pub use config::ClientConfig;
pub use digest::DigestAlgorithm;
pub use error::{RestError, Result};
pub use explorer::{
    CadesSignature, CadesSignatureExplorer, CadesSignerInfo, DigestAlgorithmAndValue,
    ExplorerSettings, PadesSignature, PadesSignatureExplorer, PadesSignerInfo, SignatureExplorer,
    SignerInfo,
};
pub use finisher::{
    CadesSignatureFinisher, CadesSignatureResult, PadesSignatureFinisher, PadesSignatureResult,
    SignatureFinisher, XmlSignatureFinisher, XmlSignatureResult,
};
pub use models::*;
pub use standard::{StandardSecurityContexts, StandardSignaturePolicies, StandardSignaturePolicyCatalog};
pub use starter::{
    CadesSignatureStarter, ClientSideSignatureInstructions, PadesSignatureStarter,
    SignatureStarter, SignerSettings, WebPkiStart, XmlSignatureStarter,
};
pub use validation::{ValidationItem, ValidationResults};
