//! XML signature starter (full document or single element)

use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use super::{non_empty, post_start, SignatureStarter, SignerFields, SignerSettings};
use super::{ClientSideSignatureInstructions, WebPkiStart};
use crate::client::RestPkiClient;
use crate::encoding;
use crate::error::{RestError, Result};
use crate::models::{
    SignatureElementLocation, XmlIdResolutionTable, XmlInsertionOption, XmlNamespaceManager,
};

const FULL_XML_SIGNATURE_PATH: &str = "Api/XmlSignatures/FullXmlSignature";
const XML_ELEMENT_SIGNATURE_PATH: &str = "Api/XmlSignatures/XmlElementSignature";

/// What part of the document gets signed
#[derive(Debug, Clone)]
enum XmlSignatureTarget {
    FullXml,
    Element {
        element_id: Option<String>,
        id_resolution_table: Option<XmlIdResolutionTable>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct XmlSignaturePostRequest<'a> {
    #[serde(flatten)]
    signer: SignerFields<'a>,
    signature_element_id: Option<&'a str>,
    xml: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    signature_element_location: Option<SignatureElementLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    element_to_sign_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id_resolution_table: Option<&'a XmlIdResolutionTable>,
}

/// Starts an XML signature, either enveloping the whole document or a single element
pub struct XmlSignatureStarter<'a> {
    client: &'a RestPkiClient,
    settings: SignerSettings,
    target: XmlSignatureTarget,
    xml_content: Option<Vec<u8>>,
    signature_element_id: Option<String>,
    location_xpath: Option<String>,
    location_insertion_option: Option<XmlInsertionOption>,
    location_namespaces: Option<XmlNamespaceManager>,
}

impl<'a> XmlSignatureStarter<'a> {
    fn with_target(client: &'a RestPkiClient, target: XmlSignatureTarget) -> Self {
        Self {
            client,
            settings: SignerSettings::default(),
            target,
            xml_content: None,
            signature_element_id: None,
            location_xpath: None,
            location_insertion_option: None,
            location_namespaces: None,
        }
    }

    /// Sign the whole document
    pub fn full_xml(client: &'a RestPkiClient) -> Self {
        Self::with_target(client, XmlSignatureTarget::FullXml)
    }

    /// Sign the element whose ID is given with [`Self::with_element_to_sign_id`]
    pub fn element(client: &'a RestPkiClient) -> Self {
        Self::with_target(
            client,
            XmlSignatureTarget::Element {
                element_id: None,
                id_resolution_table: None,
            },
        )
    }

    pub fn is_element_signature(&self) -> bool {
        matches!(self.target, XmlSignatureTarget::Element { .. })
    }

    pub fn with_xml_content(mut self, content: impl Into<Vec<u8>>) -> Self {
        self.xml_content = Some(content.into());
        self
    }

    pub fn with_xml_path(mut self, path: impl AsRef<Path>) -> Result<Self> {
        self.xml_content = Some(std::fs::read(path)?);
        Ok(self)
    }

    /// Where to insert the signature element. Without it the server picks a default.
    pub fn with_signature_element_location(
        mut self,
        xpath: impl Into<String>,
        insertion_option: XmlInsertionOption,
        namespace_manager: Option<XmlNamespaceManager>,
    ) -> Self {
        self.location_xpath = Some(xpath.into());
        self.location_insertion_option = Some(insertion_option);
        self.location_namespaces = namespace_manager;
        self
    }

    /// `Id` attribute given to the generated signature element
    pub fn with_signature_element_id(mut self, id: impl Into<String>) -> Self {
        self.signature_element_id = Some(id.into());
        self
    }

    /// ID of the element to sign. Ignored for full-document signatures.
    pub fn with_element_to_sign_id(mut self, id: impl Into<String>) -> Self {
        if let XmlSignatureTarget::Element { element_id, .. } = &mut self.target {
            *element_id = Some(id.into());
        }
        self
    }

    /// ID attribute lookup rules. Ignored for full-document signatures.
    pub fn with_id_resolution_table(mut self, table: XmlIdResolutionTable) -> Self {
        if let XmlSignatureTarget::Element {
            id_resolution_table,
            ..
        } = &mut self.target
        {
            *id_resolution_table = Some(table);
        }
        self
    }

    fn path(&self) -> &'static str {
        match self.target {
            XmlSignatureTarget::FullXml => FULL_XML_SIGNATURE_PATH,
            XmlSignatureTarget::Element { .. } => XML_ELEMENT_SIGNATURE_PATH,
        }
    }

    fn request(&self, require_certificate: bool) -> Result<XmlSignaturePostRequest<'_>> {
        if require_certificate {
            self.settings.require_certificate()?;
        }
        let policy = self.settings.require_policy()?;
        let xml = non_empty(&self.xml_content).ok_or(RestError::MissingParameter("XML"))?;

        let (element_to_sign_id, id_resolution_table) = match &self.target {
            XmlSignatureTarget::FullXml => (None, None),
            XmlSignatureTarget::Element {
                element_id,
                id_resolution_table,
            } => {
                let id = element_id
                    .as_deref()
                    .filter(|id| !id.is_empty())
                    .ok_or(RestError::MissingParameter("XML element Id to sign"))?;
                (Some(id), id_resolution_table.as_ref())
            }
        };

        let signature_element_location = match (&self.location_xpath, self.location_insertion_option) {
            (Some(xpath), Some(option)) => Some(SignatureElementLocation::new(
                xpath.clone(),
                option,
                self.location_namespaces.as_ref(),
            )),
            _ => None,
        };

        let mut signer = self.settings.fields(policy);
        signer.callback_argument = None;

        Ok(XmlSignaturePostRequest {
            signer,
            signature_element_id: self.signature_element_id.as_deref(),
            xml: encoding::encode(xml),
            signature_element_location,
            element_to_sign_id,
            id_resolution_table,
        })
    }
}

#[async_trait]
impl SignatureStarter for XmlSignatureStarter<'_> {
    fn settings(&self) -> &SignerSettings {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut SignerSettings {
        &mut self.settings
    }

    async fn start_with_web_pki(&self) -> Result<WebPkiStart> {
        let request = self.request(false)?;
        let response = post_start(self.client, self.path(), &request).await?;
        info!(
            element = self.is_element_signature(),
            "XML signature started for Web PKI"
        );
        Ok(response.into_web_pki())
    }

    async fn start(&self) -> Result<ClientSideSignatureInstructions> {
        let request = self.request(true)?;
        let response = post_start(self.client, self.path(), &request).await?;
        info!(
            element = self.is_element_signature(),
            "XML signature started for client-side signing"
        );
        response.into_instructions()
    }
}
