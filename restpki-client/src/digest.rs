//! Digest algorithms known to the API

use std::fmt;
use std::str::FromStr;

use md5::Md5;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::error::{RestError, Result};

/// Digest algorithm, as named by the API (`SHA256`) or identified by OID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl DigestAlgorithm {
    pub const ALL: [DigestAlgorithm; 5] = [
        DigestAlgorithm::Md5,
        DigestAlgorithm::Sha1,
        DigestAlgorithm::Sha256,
        DigestAlgorithm::Sha384,
        DigestAlgorithm::Sha512,
    ];

    /// Resolve the API's algorithm name (`MD5`, `SHA1`, `SHA256`, `SHA384`, `SHA512`).
    pub fn from_api_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.api_name() == name)
            .ok_or_else(|| RestError::UnsupportedDigestAlgorithm(name.to_string()))
    }

    /// Resolve a digest algorithm OID, as sent in `digestAlgorithmOid`.
    pub fn from_oid(oid: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|alg| alg.oid() == oid)
    }

    /// Name used on the wire
    pub fn api_name(self) -> &'static str {
        match self {
            DigestAlgorithm::Md5 => "MD5",
            DigestAlgorithm::Sha1 => "SHA1",
            DigestAlgorithm::Sha256 => "SHA256",
            DigestAlgorithm::Sha384 => "SHA384",
            DigestAlgorithm::Sha512 => "SHA512",
        }
    }

    /// Human-readable name (`SHA-256`)
    pub fn name(self) -> &'static str {
        match self {
            DigestAlgorithm::Md5 => "MD5",
            DigestAlgorithm::Sha1 => "SHA-1",
            DigestAlgorithm::Sha256 => "SHA-256",
            DigestAlgorithm::Sha384 => "SHA-384",
            DigestAlgorithm::Sha512 => "SHA-512",
        }
    }

    pub fn oid(self) -> &'static str {
        match self {
            DigestAlgorithm::Md5 => "1.2.840.113549.2.5",
            DigestAlgorithm::Sha1 => "1.3.14.3.2.26",
            DigestAlgorithm::Sha256 => "2.16.840.1.101.3.4.2.1",
            DigestAlgorithm::Sha384 => "2.16.840.1.101.3.4.2.2",
            DigestAlgorithm::Sha512 => "2.16.840.1.101.3.4.2.3",
        }
    }

    /// Digest length in bytes
    pub fn output_len(self) -> usize {
        match self {
            DigestAlgorithm::Md5 => 16,
            DigestAlgorithm::Sha1 => 20,
            DigestAlgorithm::Sha256 => 32,
            DigestAlgorithm::Sha384 => 48,
            DigestAlgorithm::Sha512 => 64,
        }
    }

    /// Hash `data` with this algorithm.
    pub fn compute(self, data: &[u8]) -> Vec<u8> {
        match self {
            DigestAlgorithm::Md5 => Md5::digest(data).to_vec(),
            DigestAlgorithm::Sha1 => Sha1::digest(data).to_vec(),
            DigestAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
            DigestAlgorithm::Sha384 => Sha384::digest(data).to_vec(),
            DigestAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = RestError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_api_name(s)
    }
}

impl Serialize for DigestAlgorithm {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.api_name())
    }
}

impl<'de> Deserialize<'de> for DigestAlgorithm {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Self::from_api_name(&name).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_name_lookup() {
        assert_eq!(DigestAlgorithm::from_api_name("SHA256").unwrap(), DigestAlgorithm::Sha256);
        assert_eq!("SHA1".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha1);
        assert!(matches!(
            DigestAlgorithm::from_api_name("WHIRLPOOL"),
            Err(RestError::UnsupportedDigestAlgorithm(name)) if name == "WHIRLPOOL"
        ));
    }

    #[test]
    fn test_oid_lookup() {
        assert_eq!(
            DigestAlgorithm::from_oid("2.16.840.1.101.3.4.2.3"),
            Some(DigestAlgorithm::Sha512)
        );
        assert_eq!(DigestAlgorithm::from_oid("1.2.3.4"), None);
    }

    #[test]
    fn test_compute_known_vectors() {
        assert_eq!(
            hex::encode(DigestAlgorithm::Md5.compute(b"abc")),
            "900150983cd24fb0d6963f7d28e17f72"
        );
        assert_eq!(
            hex::encode(DigestAlgorithm::Sha1.compute(b"abc")),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert_eq!(
            hex::encode(DigestAlgorithm::Sha256.compute(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_output_len_matches_compute() {
        for alg in DigestAlgorithm::ALL {
            assert_eq!(alg.compute(b"data").len(), alg.output_len(), "{alg}");
        }
    }

    #[test]
    fn test_serde_uses_api_names() {
        let json = serde_json::to_string(&DigestAlgorithm::Sha384).unwrap();
        assert_eq!(json, "\"SHA384\"");
        let decoded: Vec<DigestAlgorithm> = serde_json::from_str(r#"["MD5","SHA512"]"#).unwrap();
        assert_eq!(decoded, vec![DigestAlgorithm::Md5, DigestAlgorithm::Sha512]);
        assert!(serde_json::from_str::<DigestAlgorithm>("\"CRC32\"").is_err());
    }
}
