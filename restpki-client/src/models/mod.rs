//! Data models exchanged with the API

pub mod certificate;
pub mod marks;
pub mod visual;
pub mod xml;

pub use certificate::{CertificateModel, NameModel, PkiBrazilCertificateModel};
pub use marks::{
    Color, PdfMark, PdfMarkElement, PdfMarkImage, PdfMarkImageElement, PdfMarkTextElement,
    PdfTextSection, PdfTextStyle,
};
pub use visual::{
    PadesHorizontalAlign, PadesMeasurementUnits, PadesPageOptimization, PadesPageOrientation,
    PadesPaperSize, PadesSize, PadesTextHorizontalAlign, PadesVerticalAlign,
    PadesVisualAutoPositioning, PadesVisualImage, PadesVisualPositioning, PadesVisualRectangle,
    PadesVisualRepresentation, PadesVisualText, ResourceContentOrReference,
};
pub use xml::{
    SignatureElementLocation, XmlIdResolutionTable, XmlInsertionOption, XmlNamespace,
    XmlElementIdAttribute, XmlNamespaceManager, XmlQualifiedName,
};
