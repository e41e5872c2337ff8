//! Subcommands driving the signature workflows
//!
//! Each workflow mirrors a page of the REST PKI sample apps: start a
//! signature (or authentication), complete it with the token, and open
//! signed files for validation.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Subcommand, ValueEnum};
use restpki_client::finisher::{Cades, FinishKind, Pades, Xml};
use restpki_client::{
    CadesSignatureExplorer, CadesSignatureStarter, PadesHorizontalAlign, PadesSignatureExplorer,
    PadesSignatureStarter, PadesTextHorizontalAlign, PadesVisualImage, PadesVisualRectangle,
    PadesVisualRepresentation, PadesVisualText, ResourceContentOrReference, RestPkiClient,
    SignatureExplorer, SignatureFinisher, SignatureStarter, StandardSecurityContexts,
    StandardSignaturePolicies, StandardSignaturePolicyCatalog, XmlInsertionOption,
    XmlNamespaceManager, XmlSignatureStarter,
};
use tracing::info;
use uuid::Uuid;

use crate::config::CliConfig;
use crate::render;

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Authenticate a user by their certificate
    #[command(subcommand)]
    Auth(AuthCommands),

    /// Sign PDFs (PAdES)
    #[command(subcommand)]
    Pades(PadesCommands),

    /// Sign arbitrary files (CAdES)
    #[command(subcommand)]
    Cades(CadesCommands),

    /// Sign XML documents or elements
    #[command(subcommand)]
    Xml(XmlCommands),

    /// Open and validate signed files
    #[command(subcommand)]
    Open(OpenCommands),

    /// Show PAdES visual positioning presets
    #[command(subcommand)]
    Presets(PresetCommands),
}

#[derive(Debug, Subcommand)]
pub enum AuthCommands {
    /// Start an authentication and print the token for Web PKI
    Start {
        /// Security context used to validate the user certificate (default: PKI Brazil)
        #[arg(long)]
        security_context: Option<Uuid>,
    },

    /// Complete an authentication once Web PKI signed the nonce
    Complete {
        token: String,
    },
}

/// Signer options shared by every `start` command
#[derive(Debug, Args)]
pub struct SignerArgs {
    /// Signer certificate (DER). When given, the signature is completed client-side.
    #[arg(long)]
    pub certificate: Option<PathBuf>,

    /// Signature policy ID (default depends on the signature type)
    #[arg(long)]
    pub policy: Option<Uuid>,

    /// Security context ID (default: PKI Brazil)
    #[arg(long)]
    pub security_context: Option<Uuid>,

    /// Opaque value returned when the signature is finished
    #[arg(long)]
    pub callback_argument: Option<String>,
}

/// Options shared by every `finish` command
#[derive(Debug, Args)]
pub struct FinishArgs {
    /// Token printed by the `start` command
    pub token: String,

    /// Signature computed over the to-sign hash (raw bytes), for client-side signatures
    #[arg(long)]
    pub signature: Option<PathBuf>,

    /// Output file (default: a new file in the data directory)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum PadesCommands {
    /// Start a PDF signature
    Start {
        pdf: PathBuf,

        #[command(flatten)]
        signer: SignerArgs,

        /// Add a visual stamp positioned as a footnote
        #[arg(long)]
        footnote_stamp: bool,
    },

    /// Finish a PDF signature
    Finish(FinishArgs),
}

#[derive(Debug, Subcommand)]
pub enum CadesCommands {
    /// Start a CMS signature of a file, or a co-signature of an existing CMS
    Start {
        file: Option<PathBuf>,

        /// Existing CMS (.p7s) to co-sign
        #[arg(long)]
        cosign: Option<PathBuf>,

        /// Embed the signed content in the CMS
        #[arg(long)]
        encapsulate: bool,

        #[command(flatten)]
        signer: SignerArgs,
    },

    /// Finish a CMS signature
    Finish(FinishArgs),
}

/// Where the signature element is inserted
#[derive(Debug, Args)]
pub struct LocationArgs {
    /// XPath of the reference node
    #[arg(long)]
    pub xpath: Option<String>,

    #[arg(long, value_enum, default_value_t = Insertion::AppendChild)]
    pub insertion: Insertion,

    /// Namespace binding used by the XPath, as `prefix=uri` (repeatable)
    #[arg(long = "namespace", value_parser = parse_namespace)]
    pub namespaces: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Insertion {
    AppendChild,
    PrependChild,
    AppendSibling,
    PrependSibling,
}

impl From<Insertion> for XmlInsertionOption {
    fn from(insertion: Insertion) -> Self {
        match insertion {
            Insertion::AppendChild => XmlInsertionOption::AppendChild,
            Insertion::PrependChild => XmlInsertionOption::PrependChild,
            Insertion::AppendSibling => XmlInsertionOption::AppendSibling,
            Insertion::PrependSibling => XmlInsertionOption::PrependSibling,
        }
    }
}

fn parse_namespace(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((prefix, uri)) if !prefix.is_empty() && !uri.is_empty() => {
            Ok((prefix.to_string(), uri.to_string()))
        }
        _ => Err(format!("expected prefix=uri, got '{value}'")),
    }
}

#[derive(Debug, Subcommand)]
pub enum XmlCommands {
    /// Start a signature of the whole XML document
    FullStart {
        xml: PathBuf,

        #[command(flatten)]
        location: LocationArgs,

        #[command(flatten)]
        signer: SignerArgs,
    },

    /// Start a signature of a single element, identified by its ID
    ElementStart {
        xml: PathBuf,

        #[arg(long)]
        element_id: String,

        #[command(flatten)]
        location: LocationArgs,

        #[command(flatten)]
        signer: SignerArgs,
    },

    /// Finish an XML signature
    Finish(FinishArgs),
}

/// Validation parameter sets for opening signatures
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ValidationProfile {
    /// Basic policy for any signer with an ICP-Brasil certificate
    #[default]
    BasicIcpBrasil,
    /// Only fully compliant ICP-Brasil policies
    StrictIcpBrasil,
    /// Basic policy for any signer trusted by Windows
    Windows,
    /// ICP-Brasil policies that survive signer certificate expiry or revocation
    SignerProtection,
    /// ICP-Brasil policies that also survive CA certificate expiry (CAdES only)
    CaProtection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SignatureFormat {
    Pades,
    Cades,
}

impl ValidationProfile {
    fn apply<E: SignatureExplorer>(self, explorer: E, format: SignatureFormat) -> anyhow::Result<E> {
        let basic_policy = match format {
            SignatureFormat::Pades => StandardSignaturePolicies::PADES_BASIC,
            SignatureFormat::Cades => StandardSignaturePolicies::CADES_BES,
        };
        let explorer = match (self, format) {
            (ValidationProfile::BasicIcpBrasil, _) => explorer
                .with_default_signature_policy(basic_policy)
                .with_security_context(StandardSecurityContexts::PKI_BRAZIL),
            (ValidationProfile::Windows, _) => explorer
                .with_default_signature_policy(basic_policy)
                .with_security_context(StandardSecurityContexts::WINDOWS_SERVER),
            (ValidationProfile::StrictIcpBrasil, SignatureFormat::Pades) => explorer
                .with_acceptable_explicit_policies(StandardSignaturePolicyCatalog::pki_brazil_pades()),
            (ValidationProfile::StrictIcpBrasil, SignatureFormat::Cades) => explorer
                .with_acceptable_explicit_policies(StandardSignaturePolicyCatalog::pki_brazil_cades()),
            (ValidationProfile::SignerProtection, SignatureFormat::Pades) => explorer
                .with_acceptable_explicit_policies(
                    StandardSignaturePolicyCatalog::pki_brazil_pades_with_signer_certificate_protection(),
                ),
            (ValidationProfile::SignerProtection, SignatureFormat::Cades) => explorer
                .with_acceptable_explicit_policies(
                    StandardSignaturePolicyCatalog::pki_brazil_cades_with_signer_certificate_protection(),
                ),
            (ValidationProfile::CaProtection, SignatureFormat::Cades) => explorer
                .with_acceptable_explicit_policies(
                    StandardSignaturePolicyCatalog::pki_brazil_cades_with_ca_certificate_protection(),
                ),
            (ValidationProfile::CaProtection, SignatureFormat::Pades) => {
                bail!("the ca-protection profile is only available for CAdES signatures")
            }
        };
        Ok(explorer.with_validate(true))
    }
}

#[derive(Debug, Subcommand)]
pub enum OpenCommands {
    /// Open a signed PDF
    Pades {
        pdf: PathBuf,

        #[arg(long, value_enum, default_value_t)]
        profile: ValidationProfile,
    },

    /// Open a CMS signature
    Cades {
        p7s: PathBuf,

        /// Signed content, for detached signatures
        #[arg(long)]
        data: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t)]
        profile: ValidationProfile,
    },
}

#[derive(Debug, Subcommand)]
pub enum PresetCommands {
    /// Stamp positioned as a footnote
    Footnote {
        /// Page number; negative values count from the last page
        #[arg(long, allow_hyphen_values = true)]
        page: Option<i32>,

        /// Stamps per row
        #[arg(long)]
        rows: Option<u32>,
    },

    /// Stamp on a new page appended to the document
    NewPage,
}

/// Run a command and return the text to print
pub async fn execute(
    client: &RestPkiClient,
    config: &CliConfig,
    command: Commands,
) -> anyhow::Result<String> {
    match command {
        Commands::Auth(AuthCommands::Start { security_context }) => {
            let token = client
                .authentication()
                .start_with_web_pki(security_context.unwrap_or(StandardSecurityContexts::PKI_BRAZIL))
                .await?;
            Ok(format!(
                "Token: {token}\nSign the nonce with Web PKI, then run `auth complete {token}`."
            ))
        }

        Commands::Auth(AuthCommands::Complete { token }) => {
            let result = client.authentication().complete_with_web_pki(&token).await?;
            Ok(render::format_authentication(&result))
        }

        Commands::Pades(PadesCommands::Start {
            pdf,
            signer,
            footnote_stamp,
        }) => {
            let mut starter = PadesSignatureStarter::new(client)
                .with_pdf_path(&pdf)
                .with_context(|| format!("failed to read {}", pdf.display()))?;
            if footnote_stamp {
                starter = starter.with_visual_representation(footnote_stamp_for(client, config).await?);
            }
            start(starter, &signer, StandardSignaturePolicies::PADES_BASIC).await
        }

        Commands::Pades(PadesCommands::Finish(args)) => {
            let result = finisher::<Pades>(client, &args)?
                .finish()
                .await?;
            let path = output_path(config, args.out, "pdf")?;
            result.write_to_path(&path)?;
            Ok(render::format_finished(
                "PDF",
                &path,
                result.certificate.as_ref(),
                result.callback_argument.as_deref(),
            ))
        }

        Commands::Cades(CadesCommands::Start {
            file,
            cosign,
            encapsulate,
            signer,
        }) => {
            let mut starter = CadesSignatureStarter::new(client).with_encapsulate_content(encapsulate);
            if let Some(file) = &file {
                starter = starter
                    .with_file_to_sign(file)
                    .with_context(|| format!("failed to read {}", file.display()))?;
            }
            if let Some(cms) = &cosign {
                starter = starter
                    .with_cms_file_to_co_sign(cms)
                    .with_context(|| format!("failed to read {}", cms.display()))?;
            }
            start(starter, &signer, StandardSignaturePolicies::CADES_BES).await
        }

        Commands::Cades(CadesCommands::Finish(args)) => {
            let result = finisher::<Cades>(client, &args)?
                .finish()
                .await?;
            let path = output_path(config, args.out, "p7s")?;
            result.write_to_path(&path)?;
            Ok(render::format_finished(
                "File",
                &path,
                result.certificate.as_ref(),
                result.callback_argument.as_deref(),
            ))
        }

        Commands::Xml(XmlCommands::FullStart {
            xml,
            location,
            signer,
        }) => {
            let starter = XmlSignatureStarter::full_xml(client)
                .with_xml_path(&xml)
                .with_context(|| format!("failed to read {}", xml.display()))?;
            let starter = apply_location(starter, location);
            start(starter, &signer, StandardSignaturePolicies::XML_XADES_BES).await
        }

        Commands::Xml(XmlCommands::ElementStart {
            xml,
            element_id,
            location,
            signer,
        }) => {
            let starter = XmlSignatureStarter::element(client)
                .with_xml_path(&xml)
                .with_context(|| format!("failed to read {}", xml.display()))?
                .with_element_to_sign_id(element_id);
            let starter = apply_location(starter, location);
            start(
                starter,
                &signer,
                StandardSignaturePolicies::XML_ICPBR_NFE_PADRAO_NACIONAL,
            )
            .await
        }

        Commands::Xml(XmlCommands::Finish(args)) => {
            let result = finisher::<Xml>(client, &args)?
                .finish()
                .await?;
            let path = output_path(config, args.out, "xml")?;
            result.write_to_path(&path)?;
            Ok(render::format_finished(
                "XML",
                &path,
                result.certificate.as_ref(),
                None,
            ))
        }

        Commands::Open(OpenCommands::Pades { pdf, profile }) => {
            let explorer = PadesSignatureExplorer::new(client)
                .with_signature_file_path(&pdf)
                .with_context(|| format!("failed to read {}", pdf.display()))?;
            let signature = profile.apply(explorer, SignatureFormat::Pades)?.open().await?;
            Ok(render::format_pades_signature(&signature))
        }

        Commands::Open(OpenCommands::Cades { p7s, data, profile }) => {
            let mut explorer = CadesSignatureExplorer::new(client)
                .with_signature_file_path(&p7s)
                .with_context(|| format!("failed to read {}", p7s.display()))?;
            if let Some(data) = &data {
                explorer = explorer
                    .with_data_file_path(data)
                    .with_context(|| format!("failed to read {}", data.display()))?;
            }
            let signature = profile.apply(explorer, SignatureFormat::Cades)?.open().await?;
            Ok(render::format_cades_signature(&signature))
        }

        Commands::Presets(PresetCommands::Footnote { page, rows }) => {
            let preset = client.footnote_preset(page, rows).await?;
            Ok(render::format_preset("Footnote", &preset))
        }

        Commands::Presets(PresetCommands::NewPage) => {
            let preset = client.new_page_preset().await?;
            Ok(render::format_preset("New page", &preset))
        }
    }
}

/// Apply the signer options, then start for Web PKI or for client-side signing.
async fn start<S: SignatureStarter>(
    starter: S,
    args: &SignerArgs,
    default_policy: Uuid,
) -> anyhow::Result<String> {
    let mut starter = starter
        .with_signature_policy(args.policy.unwrap_or(default_policy))
        .with_security_context(
            args.security_context
                .unwrap_or(StandardSecurityContexts::PKI_BRAZIL),
        );
    if let Some(arg) = &args.callback_argument {
        starter = starter.with_callback_argument(arg.clone());
    }

    match &args.certificate {
        Some(path) => {
            let certificate = std::fs::read(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let instructions = starter
                .with_signer_certificate(&certificate)
                .start()
                .await?;
            Ok(render::format_instructions(&instructions))
        }
        None => {
            let started = starter.start_with_web_pki().await?;
            Ok(render::format_web_pki_start(&started))
        }
    }
}

fn finisher<'a, K: FinishKind>(
    client: &'a RestPkiClient,
    args: &FinishArgs,
) -> anyhow::Result<SignatureFinisher<'a, K>> {
    let mut finisher = SignatureFinisher::<K>::new(client).with_token(args.token.clone());
    if let Some(path) = &args.signature {
        let signature = std::fs::read(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        finisher = finisher.with_signature(&signature);
    }
    Ok(finisher)
}

fn apply_location<'a>(starter: XmlSignatureStarter<'a>, location: LocationArgs) -> XmlSignatureStarter<'a> {
    let Some(xpath) = location.xpath else {
        return starter;
    };
    let namespaces = location
        .namespaces
        .into_iter()
        .fold(XmlNamespaceManager::new(), |nsm, (prefix, uri)| {
            nsm.with_namespace(prefix, uri)
        });
    starter.with_signature_element_location(xpath, location.insertion.into(), Some(namespaces))
}

fn output_path(config: &CliConfig, out: Option<PathBuf>, extension: &str) -> anyhow::Result<PathBuf> {
    match out {
        Some(path) => Ok(path),
        None => config.artifact_path(extension),
    }
}

/// Visual stamp with the signer's name at the bottom of the last page
async fn footnote_stamp_for(
    client: &RestPkiClient,
    config: &CliConfig,
) -> anyhow::Result<PadesVisualRepresentation> {
    let position = client
        .footnote_preset(None, None)
        .await
        .context("failed to fetch the footnote preset")?;
    let text = PadesVisualText {
        font_size: Some(13.0),
        horizontal_align: PadesTextHorizontalAlign::Left,
        ..PadesVisualText::new("Signed by {{signerName}} ({{signerNationalId}})")
    }
    .with_signing_time(true)
    .with_container(PadesVisualRectangle::margins(0.2, 0.2, 0.2, 0.2));

    let mut representation = PadesVisualRepresentation::new(position).with_text(text);
    if let Some(image) = &config.output.stamp_image {
        representation = representation.with_image(stamp_image(image)?);
    }
    info!("Footnote stamp added");
    Ok(representation)
}

fn stamp_image(path: &Path) -> anyhow::Result<PadesVisualImage> {
    let content = std::fs::read(path)
        .with_context(|| format!("failed to read stamp image {}", path.display()))?;
    Ok(PadesVisualImage {
        opacity: Some(50),
        horizontal_align: PadesHorizontalAlign::Right,
        ..PadesVisualImage::new(ResourceContentOrReference::from_content(&content, "image/png"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Commands,
    }

    #[test]
    fn test_parse_namespace() {
        assert_eq!(
            parse_namespace("ls=http://www.lacunasoftware.com/sample").unwrap(),
            ("ls".to_string(), "http://www.lacunasoftware.com/sample".to_string())
        );
        assert!(parse_namespace("no-separator").is_err());
        assert!(parse_namespace("=uri").is_err());
    }

    #[test]
    fn test_parse_open_profile() {
        let cli = TestCli::try_parse_from([
            "restpki", "open", "cades", "doc.p7s", "--data", "doc.txt", "--profile", "signer-protection",
        ])
        .unwrap();
        match cli.command {
            Commands::Open(OpenCommands::Cades { profile, data, .. }) => {
                assert_eq!(profile, ValidationProfile::SignerProtection);
                assert_eq!(data, Some(PathBuf::from("doc.txt")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_default_profile() {
        let cli = TestCli::try_parse_from(["restpki", "open", "pades", "doc.pdf"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Open(OpenCommands::Pades { profile: ValidationProfile::BasicIcpBrasil, .. })
        ));
    }

    #[test]
    fn test_parse_xml_element_start() {
        let cli = TestCli::try_parse_from([
            "restpki",
            "xml",
            "element-start",
            "nfe.xml",
            "--element-id",
            "NFe123",
            "--xpath",
            "//nfe:infNFe",
            "--insertion",
            "append-sibling",
            "--namespace",
            "nfe=http://www.portalfiscal.inf.br/nfe",
        ])
        .unwrap();
        match cli.command {
            Commands::Xml(XmlCommands::ElementStart { element_id, location, signer, .. }) => {
                assert_eq!(element_id, "NFe123");
                assert_eq!(location.insertion, Insertion::AppendSibling);
                assert_eq!(location.namespaces.len(), 1);
                assert!(signer.certificate.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_negative_footnote_page() {
        let cli =
            TestCli::try_parse_from(["restpki", "presets", "footnote", "--page", "-1"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Presets(PresetCommands::Footnote { page: Some(-1), rows: None })
        ));
    }

    #[test]
    fn test_ca_protection_rejected_for_pades() {
        let client = RestPkiClient::new(restpki_client::ClientConfig::new("http://localhost:1", "t"))
            .unwrap();
        let explorer = PadesSignatureExplorer::new(&client);
        assert!(ValidationProfile::CaProtection
            .apply(explorer, SignatureFormat::Pades)
            .is_err());
    }
}
