//! Identifiers of the security contexts and signature policies built into REST PKI

use uuid::{uuid, Uuid};

/// Trust configurations used when validating certificates
pub struct StandardSecurityContexts;

impl StandardSecurityContexts {
    pub const PKI_BRAZIL: Uuid = uuid!("201856ce-273c-4058-a872-8937bd547d36");
    pub const PKI_ITALY: Uuid = uuid!("c438b17e-4862-446b-86ad-6f85734f0bfe");
    pub const WINDOWS_SERVER: Uuid = uuid!("3881384c-a54d-45c5-bbe9-976b674f5ec7");
}

/// Signature policies enforced by the server
pub struct StandardSignaturePolicies;

impl StandardSignaturePolicies {
    pub const PADES_BASIC: Uuid = uuid!("78d20b33-014d-440e-ad07-929f05d00cdf");
    pub const PADES_BASIC_WITH_ICPBR_CERTS: Uuid = uuid!("3fec800c-366c-49bf-82c5-2e72154e70f6");
    pub const PADES_T_WITH_ICPBR_CERTS: Uuid = uuid!("6a39aeea-a2d0-4754-bf8c-19da15296ddb");
    pub const PADES_ICPBR_ADR_BASICA: Uuid = uuid!("531d5012-4c0d-4b6f-89e8-ebdcc605d7c2");
    pub const PADES_ICPBR_ADR_TEMPO: Uuid = uuid!("10f0d9a5-a0a9-42e9-9523-e181ce05a25b");

    pub const CADES_BES: Uuid = uuid!("a4522485-c9e5-46c3-950b-0d6e951e17d1");
    pub const CADES_ICPBR_ADR_BASICA: Uuid = uuid!("3ddd8001-1672-4eb5-a4a2-6e32b17ddc46");
    pub const CADES_ICPBR_ADR_TEMPO: Uuid = uuid!("a5332ad1-d105-447c-a4bb-b5d02177e439");
    pub const CADES_ICPBR_ADR_VALIDACAO: Uuid = uuid!("92378630-dddf-45eb-8296-8fee0b73d5bb");
    pub const CADES_ICPBR_ADR_COMPLETA: Uuid = uuid!("30d881e7-924a-4a14-b5cc-d5a1717d92f6");

    pub const XML_XADES_BES: Uuid = uuid!("1beba282-d1b6-4458-8e46-bd8ad6800b54");
    pub const XML_DSIG_BASIC: Uuid = uuid!("2bb5d8c9-49ba-4c62-8104-8141f6459d08");
    pub const XML_ICPBR_NFE_PADRAO_NACIONAL: Uuid = uuid!("a3c24251-d43a-4ba4-b25d-ee8e2ab24f06");
    pub const XML_ICPBR_ADR_BASICA: Uuid = uuid!("1cf5db62-58b6-40ba-88a3-d41bada9b621");
    pub const XML_ICPBR_ADR_TEMPO: Uuid = uuid!("5aa2e0af-5269-43b0-8d45-f4ef52921f04");
}

/// Sets of explicit policies accepted when opening signatures
pub struct StandardSignaturePolicyCatalog;

impl StandardSignaturePolicyCatalog {
    pub fn pki_brazil_cades() -> Vec<Uuid> {
        vec![
            StandardSignaturePolicies::CADES_ICPBR_ADR_BASICA,
            StandardSignaturePolicies::CADES_ICPBR_ADR_TEMPO,
            StandardSignaturePolicies::CADES_ICPBR_ADR_COMPLETA,
        ]
    }

    /// Policies whose signatures stay valid after the signer certificate expires or is revoked
    pub fn pki_brazil_cades_with_signer_certificate_protection() -> Vec<Uuid> {
        vec![
            StandardSignaturePolicies::CADES_ICPBR_ADR_TEMPO,
            StandardSignaturePolicies::CADES_ICPBR_ADR_COMPLETA,
        ]
    }

    pub fn pki_brazil_cades_with_ca_certificate_protection() -> Vec<Uuid> {
        vec![StandardSignaturePolicies::CADES_ICPBR_ADR_COMPLETA]
    }

    pub fn pki_brazil_pades() -> Vec<Uuid> {
        vec![
            StandardSignaturePolicies::PADES_ICPBR_ADR_BASICA,
            StandardSignaturePolicies::PADES_ICPBR_ADR_TEMPO,
        ]
    }

    pub fn pki_brazil_pades_with_signer_certificate_protection() -> Vec<Uuid> {
        vec![StandardSignaturePolicies::PADES_ICPBR_ADR_TEMPO]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protection_catalogs_are_subsets() {
        let all = StandardSignaturePolicyCatalog::pki_brazil_cades();
        for policy in StandardSignaturePolicyCatalog::pki_brazil_cades_with_signer_certificate_protection() {
            assert!(all.contains(&policy));
        }
        assert!(!StandardSignaturePolicyCatalog::pki_brazil_pades_with_signer_certificate_protection()
            .contains(&StandardSignaturePolicies::PADES_ICPBR_ADR_BASICA));
    }

    #[test]
    fn test_uuid_serializes_hyphenated() {
        assert_eq!(
            serde_json::to_string(&StandardSecurityContexts::PKI_BRAZIL).unwrap(),
            "\"201856ce-273c-4058-a872-8937bd547d36\""
        );
    }
}
