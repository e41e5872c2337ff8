//! PAdES (PDF) signature starter

use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use super::{non_empty, post_start, SignatureStarter, SignerFields, SignerSettings};
use super::{ClientSideSignatureInstructions, WebPkiStart};
use crate::client::RestPkiClient;
use crate::encoding;
use crate::error::{RestError, Result};
use crate::models::{PadesMeasurementUnits, PadesPageOptimization, PadesVisualRepresentation, PdfMark};

const PADES_SIGNATURES_PATH: &str = "Api/PadesSignatures";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PadesSignaturePostRequest<'a> {
    #[serde(flatten)]
    signer: SignerFields<'a>,
    pdf_marks: &'a [PdfMark],
    bypass_marks_if_signed: bool,
    measurement_units: Option<PadesMeasurementUnits>,
    page_optimization: Option<&'a PadesPageOptimization>,
    visual_representation: Option<&'a PadesVisualRepresentation>,
    pdf_to_sign: String,
}

/// Starts a PAdES signature of a PDF
pub struct PadesSignatureStarter<'a> {
    client: &'a RestPkiClient,
    settings: SignerSettings,
    pdf_content: Option<Vec<u8>>,
    measurement_units: Option<PadesMeasurementUnits>,
    page_optimization: Option<PadesPageOptimization>,
    bypass_marks_if_signed: bool,
    visual_representation: Option<PadesVisualRepresentation>,
    pdf_marks: Vec<PdfMark>,
}

impl<'a> PadesSignatureStarter<'a> {
    pub fn new(client: &'a RestPkiClient) -> Self {
        Self {
            client,
            settings: SignerSettings::default(),
            pdf_content: None,
            measurement_units: None,
            page_optimization: None,
            bypass_marks_if_signed: true,
            visual_representation: None,
            pdf_marks: Vec::new(),
        }
    }

    pub fn with_pdf_content(mut self, content: impl Into<Vec<u8>>) -> Self {
        self.pdf_content = Some(content.into());
        self
    }

    pub fn with_pdf_path(mut self, path: impl AsRef<Path>) -> Result<Self> {
        self.pdf_content = Some(std::fs::read(path)?);
        Ok(self)
    }

    pub fn with_visual_representation(mut self, representation: PadesVisualRepresentation) -> Self {
        self.visual_representation = Some(representation);
        self
    }

    pub fn with_measurement_units(mut self, units: PadesMeasurementUnits) -> Self {
        self.measurement_units = Some(units);
        self
    }

    pub fn with_page_optimization(mut self, optimization: PadesPageOptimization) -> Self {
        self.page_optimization = Some(optimization);
        self
    }

    /// Skip the PDF marks when the document already carries signatures (default: true)
    pub fn with_bypass_marks_if_signed(mut self, bypass: bool) -> Self {
        self.bypass_marks_if_signed = bypass;
        self
    }

    pub fn with_pdf_mark(mut self, mark: PdfMark) -> Self {
        self.pdf_marks.push(mark);
        self
    }

    fn request(&self, require_certificate: bool) -> Result<PadesSignaturePostRequest<'_>> {
        let pdf = non_empty(&self.pdf_content).ok_or(RestError::MissingParameter("PDF to sign"))?;
        if require_certificate {
            self.settings.require_certificate()?;
        }
        let policy = self.settings.require_policy()?;

        Ok(PadesSignaturePostRequest {
            signer: self.settings.fields(policy),
            pdf_marks: &self.pdf_marks,
            bypass_marks_if_signed: self.bypass_marks_if_signed,
            measurement_units: self.measurement_units,
            page_optimization: self.page_optimization.as_ref(),
            visual_representation: self.visual_representation.as_ref(),
            pdf_to_sign: encoding::encode(pdf),
        })
    }
}

#[async_trait]
impl SignatureStarter for PadesSignatureStarter<'_> {
    fn settings(&self) -> &SignerSettings {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut SignerSettings {
        &mut self.settings
    }

    async fn start_with_web_pki(&self) -> Result<WebPkiStart> {
        let request = self.request(false)?;
        let response = post_start(self.client, PADES_SIGNATURES_PATH, &request).await?;
        info!("PAdES signature started for Web PKI");
        Ok(response.into_web_pki())
    }

    async fn start(&self) -> Result<ClientSideSignatureInstructions> {
        let request = self.request(true)?;
        let response = post_start(self.client, PADES_SIGNATURES_PATH, &request).await?;
        info!("PAdES signature started for client-side signing");
        response.into_instructions()
    }
}
