//! Certificate information returned after signature and authentication actions

use serde::{Deserialize, Serialize};

/// Distinguished name fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NameModel {
    pub common_name: Option<String>,
    pub given_name: Option<String>,
    pub surname: Option<String>,
    pub title: Option<String>,
    pub organization: Option<String>,
    pub organization_unit: Option<String>,
    pub locality: Option<String>,
    pub state_name: Option<String>,
    pub country: Option<String>,
    pub email_address: Option<String>,
    pub serial_number: Option<String>,
}

/// ICP-Brasil specific certificate fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PkiBrazilCertificateModel {
    pub certificate_type: Option<String>,
    pub cpf: Option<String>,
    pub cnpj: Option<String>,
    pub responsavel: Option<String>,
    pub company_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub oab_numero: Option<String>,
    #[serde(rename = "oabUF")]
    pub oab_uf: Option<String>,
    pub rg_numero: Option<String>,
    pub rg_emissor: Option<String>,
    #[serde(rename = "rgEmissorUF")]
    pub rg_emissor_uf: Option<String>,
}

/// Read-only snapshot of a certificate, as decoded by the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificateModel {
    pub subject_name: NameModel,
    pub issuer_name: NameModel,
    pub issuer_display_name: Option<String>,
    pub serial_number: Option<String>,
    pub validity_start: Option<String>,
    pub validity_end: Option<String>,
    pub email_address: Option<String>,
    pub pki_brazil: PkiBrazilCertificateModel,
    /// Issuer certificate, when the server resolved the chain
    pub issuer: Option<Box<CertificateModel>>,
}

impl CertificateModel {
    /// Subject common name, or empty when the server did not send one
    pub fn subject_common_name(&self) -> &str {
        self.subject_name.common_name.as_deref().unwrap_or_default()
    }

    /// Certificate chain starting at this certificate
    pub fn chain(&self) -> impl Iterator<Item = &CertificateModel> {
        std::iter::successors(Some(self), |cert| cert.issuer.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_icp_brasil_certificate() {
        let json = r#"{
            "subjectName": {"commonName": "Alan Mathison Turing", "country": "BR"},
            "issuerName": {"commonName": "Lacuna CA Test v1"},
            "issuerDisplayName": "Lacuna CA Test v1",
            "serialNumber": "1234",
            "emailAddress": "alan@example.com",
            "pkiBrazil": {
                "certificateType": "A3",
                "cpf": "56072386105",
                "oabUF": "SP",
                "rgEmissorUF": "DF",
                "responsavel": null
            },
            "issuer": {"subjectName": {"commonName": "Lacuna CA Test v1"}, "issuer": null}
        }"#;

        let cert: CertificateModel = serde_json::from_str(json).unwrap();
        assert_eq!(cert.subject_common_name(), "Alan Mathison Turing");
        assert_eq!(cert.pki_brazil.cpf.as_deref(), Some("56072386105"));
        assert_eq!(cert.pki_brazil.oab_uf.as_deref(), Some("SP"));
        assert_eq!(cert.pki_brazil.rg_emissor_uf.as_deref(), Some("DF"));
        assert!(cert.pki_brazil.responsavel.is_none());

        let names: Vec<&str> = cert.chain().map(|c| c.subject_common_name()).collect();
        assert_eq!(names, vec!["Alan Mathison Turing", "Lacuna CA Test v1"]);
    }

    #[test]
    fn test_decode_empty_object() {
        let cert: CertificateModel = serde_json::from_str("{}").unwrap();
        assert_eq!(cert, CertificateModel::default());
        assert_eq!(cert.subject_common_name(), "");
    }
}
