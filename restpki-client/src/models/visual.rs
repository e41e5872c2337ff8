//! PAdES visual representation (signature stamp) descriptors

use serde::{Deserialize, Serialize};

use crate::encoding;

/// Units used by every coordinate of a visual representation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PadesMeasurementUnits {
    #[default]
    Centimeters,
    PdfPoints,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PadesPaperSize {
    #[default]
    Custom,
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
    A7,
    A8,
    Letter,
    Legal,
    Ledger,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PadesPageOrientation {
    #[default]
    Auto,
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PadesTextHorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PadesHorizontalAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PadesVerticalAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PadesSize {
    pub width: f64,
    pub height: f64,
}

impl PadesSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Rectangle anchored by any combination of its edges and dimensions
///
/// Unset fields are left for the server to compute; for instance `left` and
/// `width` fix the horizontal placement while `right` stays open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PadesVisualRectangle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl PadesVisualRectangle {
    /// Fixed-size rectangle anchored at the top-left corner
    pub fn top_left(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left: Some(left),
            top: Some(top),
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    /// Fixed-size rectangle anchored at the bottom-right corner
    pub fn bottom_right(right: f64, bottom: f64, width: f64, height: f64) -> Self {
        Self {
            right: Some(right),
            bottom: Some(bottom),
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    /// Rectangle defined by its margins to the page (or container) edges
    pub fn margins(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left: Some(left),
            top: Some(top),
            right: Some(right),
            bottom: Some(bottom),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PadesPageOptimization {
    pub paper_size: PadesPaperSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_paper_size: Option<PadesSize>,
    #[serde(default)]
    pub page_orientation: PadesPageOrientation,
}

/// Automatic placement: signatures are laid out in rows inside a container
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PadesVisualAutoPositioning {
    pub container: PadesVisualRectangle,
    pub signature_rectangle_size: PadesSize,
    #[serde(default)]
    pub row_spacing: f64,
}

/// Where the stamp goes. Either `auto` or `manual` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PadesVisualPositioning {
    /// Page number; negative values count from the end, `0` adds a new page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<i32>,
    #[serde(default)]
    pub measurement_units: PadesMeasurementUnits,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_optimization: Option<PadesPageOptimization>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto: Option<PadesVisualAutoPositioning>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual: Option<PadesVisualRectangle>,
}

impl PadesVisualPositioning {
    /// Manual placement of the stamp on a given page
    pub fn manual(page_number: i32, rectangle: PadesVisualRectangle) -> Self {
        Self {
            page_number: Some(page_number),
            manual: Some(rectangle),
            ..Default::default()
        }
    }
}

/// Image or other binary resource, embedded or referenced by URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContentOrReference {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Base64 content
    #[serde(default)]
    pub content: Option<String>,
}

impl ResourceContentOrReference {
    pub fn from_content(content: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            url: None,
            mime_type: Some(mime_type.into()),
            content: Some(encoding::encode(content)),
        }
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PadesVisualText {
    /// Text with `{{signerName}}`-style placeholders resolved by the server
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub include_signing_time: bool,
    #[serde(default)]
    pub horizontal_align: PadesTextHorizontalAlign,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<PadesVisualRectangle>,
}

impl PadesVisualText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_signing_time(mut self, include: bool) -> Self {
        self.include_signing_time = include;
        self
    }

    pub fn with_container(mut self, container: PadesVisualRectangle) -> Self {
        self.container = Some(container);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PadesVisualImage {
    pub resource: ResourceContentOrReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<u8>,
    #[serde(default)]
    pub horizontal_align: PadesHorizontalAlign,
    #[serde(default)]
    pub vertical_align: PadesVerticalAlign,
}

impl PadesVisualImage {
    pub fn new(resource: ResourceContentOrReference) -> Self {
        Self {
            resource,
            ..Default::default()
        }
    }
}

/// Complete visual representation of a PAdES signature
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PadesVisualRepresentation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<PadesVisualText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<PadesVisualImage>,
    pub position: PadesVisualPositioning,
}

impl PadesVisualRepresentation {
    pub fn new(position: PadesVisualPositioning) -> Self {
        Self {
            text: None,
            image: None,
            position,
        }
    }

    pub fn with_text(mut self, text: PadesVisualText) -> Self {
        self.text = Some(text);
        self
    }

    pub fn with_image(mut self, image: PadesVisualImage) -> Self {
        self.image = Some(image);
        self
    }
}
