use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// MD5 (128-bit).
    Md5,
    /// SHA-1 (160-bit).
    Sha1,
    /// SHA-224 (224-bit).
    Sha224,
    /// SHA-256 (256-bit).
    Sha256,
    /// SHA-384 (384-bit).
    Sha384,
    /// SHA-512 (512-bit).
    Sha512,
}

impl DigestAlgorithm {
    pub const ALL: [DigestAlgorithm; 6] = [
        DigestAlgorithm::Md5,
        DigestAlgorithm::Sha1,
        DigestAlgorithm::Sha224,
        DigestAlgorithm::Sha256,
        DigestAlgorithm::Sha384,
        DigestAlgorithm::Sha512,
    ];

    /// Length of the raw digest in bytes.
    ///
    /// The hex rendering is always twice this long.
    pub const fn digest_length(self) -> usize {
        match self {
            DigestAlgorithm::Md5 => 16,
            DigestAlgorithm::Sha1 => 20,
            DigestAlgorithm::Sha224 => 28,
            DigestAlgorithm::Sha256 => 32,
            DigestAlgorithm::Sha384 => 48,
            DigestAlgorithm::Sha512 => 64,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            DigestAlgorithm::Md5 => "md5",
            DigestAlgorithm::Sha1 => "sha1",
            DigestAlgorithm::Sha224 => "sha224",
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Sha384 => "sha384",
            DigestAlgorithm::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown digest algorithm: {0}")]
pub struct ParseAlgorithmError(pub String);

impl FromStr for DigestAlgorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "md5" => Ok(DigestAlgorithm::Md5),
            "sha1" | "sha-1" => Ok(DigestAlgorithm::Sha1),
            "sha224" | "sha-224" => Ok(DigestAlgorithm::Sha224),
            "sha256" | "sha-256" => Ok(DigestAlgorithm::Sha256),
            "sha384" | "sha-384" => Ok(DigestAlgorithm::Sha384),
            "sha512" | "sha-512" => Ok(DigestAlgorithm::Sha512),
            _ => Err(ParseAlgorithmError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_lengths() {
        let lengths: Vec<_> = DigestAlgorithm::ALL.iter().map(|a| a.digest_length()).collect();
        assert_eq!(lengths, [16, 20, 28, 32, 48, 64]);
    }

    #[test]
    fn test_parse_round_trips_display() {
        for algorithm in DigestAlgorithm::ALL {
            assert_eq!(algorithm.to_string().parse::<DigestAlgorithm>(), Ok(algorithm));
        }
    }

    #[test]
    fn test_parse_accepts_dashed_and_mixed_case() {
        assert_eq!("SHA-256".parse(), Ok(DigestAlgorithm::Sha256));
        assert_eq!(" Sha-1 ".parse(), Ok(DigestAlgorithm::Sha1));
        assert_eq!("MD5".parse(), Ok(DigestAlgorithm::Md5));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "blake3".parse::<DigestAlgorithm>().unwrap_err();
        assert_eq!(err, ParseAlgorithmError("blake3".to_string()));
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&DigestAlgorithm::Sha384).unwrap();
        assert_eq!(json, "\"sha384\"");
        let parsed: DigestAlgorithm = serde_json::from_str("\"sha224\"").unwrap();
        assert_eq!(parsed, DigestAlgorithm::Sha224);
    }
}
