//! PDF marks: text and images stamped on every page of a PDF before signing

use serde::{Deserialize, Serialize};

use super::visual::{PadesVisualRectangle, ResourceContentOrReference};
use crate::error::{RestError, Result};

/// RGB color with an alpha channel expressed as a percentage (0..=100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    pub alpha: u8,
    pub blue: u8,
    pub green: u8,
    pub red: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(255, 255, 255, 0);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::rgba(red, green, blue, 100)
    }

    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            alpha,
            blue,
            green,
            red,
        }
    }

    /// Parse `#RRGGBB`, fully opaque.
    pub fn from_hex(hex: &str) -> Result<Self> {
        Self::from_hex_with_alpha(hex, 100)
    }

    /// Parse `#RRGGBB` with the given alpha percentage.
    pub fn from_hex_with_alpha(hex: &str, alpha: u8) -> Result<Self> {
        let digits = hex
            .strip_prefix('#')
            .filter(|d| d.len() == 6 && d.is_ascii())
            .ok_or_else(|| RestError::InvalidColor(hex.to_string()))?;

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| RestError::InvalidColor(hex.to_string()))
        };

        Ok(Self::rgba(channel(0..2)?, channel(2..4)?, channel(4..6)?, alpha))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PdfTextStyle {
    #[default]
    Normal,
    Bold,
    Italic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfTextSection {
    pub style: PdfTextStyle,
    pub text: String,
    pub color: Color,
    pub font_size: Option<f64>,
}

impl PdfTextSection {
    pub fn new(text: impl Into<String>, color: Color) -> Self {
        Self {
            style: PdfTextStyle::Normal,
            text: text.into(),
            color,
            font_size: None,
        }
    }

    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = Some(font_size);
        self
    }

    pub fn with_style(mut self, style: PdfTextStyle) -> Self {
        self.style = style;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfMarkImage {
    pub resource: ResourceContentOrReference,
    pub opacity: u8,
}

impl PdfMarkImage {
    pub fn new(content: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            resource: ResourceContentOrReference::from_content(content, mime_type),
            opacity: 100,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfMarkTextElement {
    pub relative_container: Option<PadesVisualRectangle>,
    pub rotation: i32,
    pub text_sections: Vec<PdfTextSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfMarkImageElement {
    pub relative_container: Option<PadesVisualRectangle>,
    pub rotation: i32,
    pub image: PdfMarkImage,
}

/// Element of a mark, tagged on the wire by `elementType`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "elementType")]
pub enum PdfMarkElement {
    Text(PdfMarkTextElement),
    Image(PdfMarkImageElement),
}

impl PdfMarkElement {
    pub fn text(relative_container: PadesVisualRectangle, sections: Vec<PdfTextSection>) -> Self {
        PdfMarkElement::Text(PdfMarkTextElement {
            relative_container: Some(relative_container),
            rotation: 0,
            text_sections: sections,
        })
    }

    pub fn image(relative_container: PadesVisualRectangle, image: PdfMarkImage) -> Self {
        PdfMarkElement::Image(PdfMarkImageElement {
            relative_container: Some(relative_container),
            rotation: 0,
            image,
        })
    }
}

/// Box drawn on the PDF, holding text and image elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfMark {
    pub container: Option<PadesVisualRectangle>,
    pub border_width: f64,
    pub border_color: Color,
    pub background_color: Color,
    pub elements: Vec<PdfMarkElement>,
}

impl Default for PdfMark {
    fn default() -> Self {
        Self {
            container: None,
            border_width: 0.0,
            border_color: Color::BLACK,
            background_color: Color::TRANSPARENT,
            elements: Vec::new(),
        }
    }
}

impl PdfMark {
    pub fn new(container: PadesVisualRectangle) -> Self {
        Self {
            container: Some(container),
            ..Default::default()
        }
    }

    pub fn with_border(mut self, width: f64, color: Color) -> Self {
        self.border_width = width;
        self.border_color = color;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_element(mut self, element: PdfMarkElement) -> Self {
        self.elements.push(element);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::from_hex("#000000").unwrap(), Color::BLACK);
        assert_eq!(
            Color::from_hex_with_alpha("#FF8000", 50).unwrap(),
            Color::rgba(255, 128, 0, 50)
        );
        assert!(Color::from_hex("FF8000").is_err());
        assert!(Color::from_hex("#FF80").is_err());
        assert!(matches!(Color::from_hex("#GG0000"), Err(RestError::InvalidColor(_))));
    }

    #[test]
    fn test_default_mark() {
        let mark = PdfMark::default();
        assert_eq!(mark.border_width, 0.0);
        assert_eq!(mark.border_color, Color::BLACK);
        assert_eq!(mark.background_color.alpha, 0);
    }

    #[test]
    fn test_element_type_tag() {
        let mark = PdfMark::new(PadesVisualRectangle::bottom_right(1.0, 1.0, 8.0, 1.5))
            .with_border(1.0, Color::from_hex("#0000FF").unwrap())
            .with_element(PdfMarkElement::text(
                PadesVisualRectangle::margins(0.2, 0.2, 0.2, 0.2),
                vec![PdfTextSection::new("Signed", Color::BLACK).with_style(PdfTextStyle::Bold)],
            ))
            .with_element(PdfMarkElement::image(
                PadesVisualRectangle::top_left(0.0, 0.0, 1.0, 1.0),
                PdfMarkImage::new(b"img", "image/png"),
            ));

        let value = serde_json::to_value(&mark).unwrap();
        assert_eq!(value["elements"][0]["elementType"], json!("Text"));
        assert_eq!(value["elements"][0]["textSections"][0]["style"], json!("Bold"));
        assert_eq!(value["elements"][1]["elementType"], json!("Image"));
        assert_eq!(value["elements"][1]["image"]["opacity"], json!(100));
        assert_eq!(value["borderColor"], json!({"alpha": 100, "blue": 255, "green": 0, "red": 0}));

        let decoded: PdfMark = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, mark);
    }
}
