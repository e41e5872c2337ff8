//! Text rendering of API results for the terminal

use std::path::Path;

use restpki_client::{
    AuthenticationResult, CadesSignature, CertificateModel, ClientSideSignatureInstructions,
    PadesSignature, PadesVisualPositioning, SignerInfo, ValidationResults, WebPkiStart,
};

const SIGNING_TIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S %:z";

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

fn joined(values: &[Option<&String>]) -> String {
    let parts: Vec<&str> = values
        .iter()
        .filter_map(|v| v.map(String::as_str))
        .filter(|v| !v.is_empty())
        .collect();
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(" ")
    }
}

/// Format signer certificate details, including the ICP-Brasil fields
pub fn format_certificate(cert: &CertificateModel, indent: &str) -> String {
    let pki = &cert.pki_brazil;
    let mut output = String::new();
    output.push_str(&format!("{indent}Subject:  {}\n", or_dash(Some(cert.subject_common_name()))));
    output.push_str(&format!("{indent}Email:    {}\n", or_dash(cert.email_address.as_deref())));
    output.push_str(&format!("{indent}Issuer:   {}\n", or_dash(cert.issuer_display_name.as_deref())));
    output.push_str(&format!("{indent}Serial:   {}\n", or_dash(cert.serial_number.as_deref())));
    output.push_str(&format!("{indent}ICP-Brasil fields:\n"));
    output.push_str(&format!("{indent}  Certificate type: {}\n", or_dash(pki.certificate_type.as_deref())));
    output.push_str(&format!("{indent}  CPF:              {}\n", or_dash(pki.cpf.as_deref())));
    output.push_str(&format!("{indent}  Responsavel:      {}\n", or_dash(pki.responsavel.as_deref())));
    output.push_str(&format!("{indent}  Company:          {}\n", or_dash(pki.company_name.as_deref())));
    output.push_str(&format!("{indent}  CNPJ:             {}\n", or_dash(pki.cnpj.as_deref())));
    output.push_str(&format!(
        "{indent}  RG:               {}\n",
        joined(&[pki.rg_numero.as_ref(), pki.rg_emissor.as_ref(), pki.rg_emissor_uf.as_ref()])
    ));
    output.push_str(&format!(
        "{indent}  OAB:              {}\n",
        joined(&[pki.oab_numero.as_ref(), pki.oab_uf.as_ref()])
    ));
    output
}

pub fn format_web_pki_start(started: &WebPkiStart) -> String {
    let mut output = format!("Token: {}\n", started.token);
    output.push_str("Complete the signature with Web PKI, then run the matching `finish` command.");
    output
}

pub fn format_instructions(instructions: &ClientSideSignatureInstructions) -> String {
    let mut output = String::new();
    output.push_str(&format!("Token:            {}\n", instructions.token));
    output.push_str(&format!(
        "Digest algorithm: {} ({})\n",
        instructions
            .digest_algorithm
            .map(|alg| alg.name())
            .unwrap_or("unknown"),
        instructions.digest_algorithm_oid
    ));
    output.push_str(&format!("To-sign hash:     {}\n", hex::encode(&instructions.to_sign_hash)));
    output.push_str(&format!("To-sign data:     {} bytes\n", instructions.to_sign_data.len()));
    output.push_str("Sign the hash with the signer's private key and pass the result to `finish --signature`.");
    output
}

/// Format a finished signature: where it was written and who signed
pub fn format_finished(
    label: &str,
    path: &Path,
    certificate: Option<&CertificateModel>,
    callback_argument: Option<&str>,
) -> String {
    let mut output = format!("{label} signed successfully: {}\n", path.display());
    if let Some(arg) = callback_argument.filter(|a| !a.is_empty()) {
        output.push_str(&format!("Callback argument: {arg}\n"));
    }
    if let Some(cert) = certificate {
        output.push_str("\nSigner information:\n");
        output.push_str(&format_certificate(cert, "  "));
    }
    output
}

pub fn format_authentication(result: &AuthenticationResult) -> String {
    let mut output = String::new();
    if result.is_valid() {
        output.push_str("Authentication succeeded\n");
    } else {
        output.push_str("Authentication failed\n");
    }
    if let Some(cert) = &result.certificate {
        output.push_str("\nUser certificate:\n");
        output.push_str(&format_certificate(cert, "  "));
    }
    output.push('\n');
    output.push_str(&format_validation(&result.validation_results, 0));
    output
}

pub fn format_validation(results: &ValidationResults, indentation_level: usize) -> String {
    results.to_string_indented(indentation_level)
}

fn format_signer(index: usize, signer: &SignerInfo, extra: &str) -> String {
    let mut output = format!("Signer #{}{}\n", index + 1, extra);
    if let Some(cert) = &signer.certificate {
        output.push_str(&format_certificate(cert, "  "));
    }
    output.push_str(&format!(
        "  Message digest: {} {}\n",
        signer.message_digest.algorithm,
        hex::encode(&signer.message_digest.value)
    ));
    if let Some(time) = signer.signing_time {
        output.push_str(&format!("  Signing time:   {}\n", time.format(SIGNING_TIME_FORMAT)));
    }
    if let Some(oid) = signer.signature_policy.as_ref().and_then(|p| p.oid.as_deref()) {
        output.push_str(&format!("  Policy:         {oid}\n"));
    }
    if let Some(results) = &signer.validation_results {
        output.push_str(&format_validation(results, 1));
        output.push('\n');
    }
    output
}

pub fn format_pades_signature(signature: &PadesSignature) -> String {
    if signature.signers.is_empty() {
        return "No signatures found".to_string();
    }
    let mut output = String::new();
    output.push_str("PAdES Signature\n");
    output.push_str("===============\n\n");
    for (i, signer) in signature.signers.iter().enumerate() {
        let mut extra = String::new();
        if let Some(field) = signer.signature_field_name.as_deref() {
            extra.push_str(&format!(" ({field})"));
        }
        if signer.is_document_timestamp {
            extra.push_str(" [document timestamp]");
        }
        output.push_str(&format_signer(i, signer, &extra));
        output.push('\n');
    }
    output
}

pub fn format_cades_signature(signature: &CadesSignature) -> String {
    let mut output = String::new();
    output.push_str("CAdES Signature\n");
    output.push_str("===============\n\n");
    output.push_str(&format!(
        "Encapsulated content: {}\n",
        if signature.has_encapsulated_content {
            or_dash(signature.encapsulated_content_type.as_deref())
        } else {
            "none (detached)"
        }
    ));
    if signature.signers.is_empty() {
        output.push_str("No signers\n");
        return output;
    }
    output.push('\n');
    for (i, signer) in signature.signers.iter().enumerate() {
        output.push_str(&format_signer(i, signer, ""));
        output.push('\n');
    }
    output
}

pub fn format_preset(name: &str, preset: &PadesVisualPositioning) -> String {
    let mut output = format!("{name} preset\n");
    output.push_str(&format!(
        "  Page:  {}\n",
        preset
            .page_number
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string())
    ));
    output.push_str(&format!("  Units: {:?}\n", preset.measurement_units));
    if let Some(auto) = &preset.auto {
        output.push_str(&format!(
            "  Auto:  {} x {} stamps, row spacing {}\n",
            auto.signature_rectangle_size.width, auto.signature_rectangle_size.height, auto.row_spacing
        ));
    }
    if let Some(manual) = &preset.manual {
        output.push_str(&format!("  Manual: {manual:?}\n"));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use restpki_client::{NameModel, ValidationItem};

    fn certificate() -> CertificateModel {
        let mut cert = CertificateModel {
            subject_name: NameModel {
                common_name: Some("Alan Mathison Turing".into()),
                ..Default::default()
            },
            email_address: Some("alan@example.com".into()),
            ..Default::default()
        };
        cert.pki_brazil.cpf = Some("123.456.789-09".into());
        cert.pki_brazil.rg_numero = Some("1234".into());
        cert.pki_brazil.rg_emissor_uf = Some("SP".into());
        cert
    }

    #[test]
    fn test_format_certificate() {
        let output = format_certificate(&certificate(), "");
        assert!(output.contains("Subject:  Alan Mathison Turing"));
        assert!(output.contains("CPF:              123.456.789-09"));
        assert!(output.contains("RG:               1234 SP"));
        assert!(output.contains("OAB:              -"));
    }

    #[test]
    fn test_format_authentication_failure() {
        let result = AuthenticationResult {
            certificate: Some(certificate()),
            validation_results: ValidationResults::new(
                vec![ValidationItem::new("CertificateRevoked", "revoked")],
                vec![],
                vec![],
            ),
        };
        let output = format_authentication(&result);
        assert!(output.starts_with("Authentication failed"));
        assert!(output.contains("1 checks performed, 1 errors"));
    }

    #[test]
    fn test_format_empty_pades_signature() {
        let signature = PadesSignature { signers: vec![] };
        assert_eq!(format_pades_signature(&signature), "No signatures found");
    }
}
