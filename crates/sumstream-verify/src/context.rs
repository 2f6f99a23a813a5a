use md5::Md5;
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};

use crate::{DigestAlgorithm, DigestHasher, Hasher, Result, verify_hex};

enum AnyHasher {
    Md5(DigestHasher<Md5>),
    Sha1(DigestHasher<Sha1>),
    Sha224(DigestHasher<Sha224>),
    Sha256(DigestHasher<Sha256>),
    Sha384(DigestHasher<Sha384>),
    Sha512(DigestHasher<Sha512>),
}

impl AnyHasher {
    fn new(algorithm: DigestAlgorithm) -> Self {
        match algorithm {
            DigestAlgorithm::Md5 => AnyHasher::Md5(DigestHasher::new()),
            DigestAlgorithm::Sha1 => AnyHasher::Sha1(DigestHasher::new()),
            DigestAlgorithm::Sha224 => AnyHasher::Sha224(DigestHasher::new()),
            DigestAlgorithm::Sha256 => AnyHasher::Sha256(DigestHasher::new()),
            DigestAlgorithm::Sha384 => AnyHasher::Sha384(DigestHasher::new()),
            DigestAlgorithm::Sha512 => AnyHasher::Sha512(DigestHasher::new()),
        }
    }
}

impl Hasher for AnyHasher {
    fn update(&mut self, data: &[u8]) {
        match self {
            AnyHasher::Md5(h) => h.update(data),
            AnyHasher::Sha1(h) => h.update(data),
            AnyHasher::Sha224(h) => h.update(data),
            AnyHasher::Sha256(h) => h.update(data),
            AnyHasher::Sha384(h) => h.update(data),
            AnyHasher::Sha512(h) => h.update(data),
        }
    }

    fn finalize(self) -> Vec<u8> {
        match self {
            AnyHasher::Md5(h) => h.finalize(),
            AnyHasher::Sha1(h) => h.finalize(),
            AnyHasher::Sha224(h) => h.finalize(),
            AnyHasher::Sha256(h) => h.finalize(),
            AnyHasher::Sha384(h) => h.finalize(),
            AnyHasher::Sha512(h) => h.finalize(),
        }
    }
}

/// Incremental digest of one algorithm.
///
/// Accepts arbitrary-length input through [`update`](Self::update) and
/// produces a fixed-length digest on [`finalize`](Self::finalize). Finalizing
/// twice does not recompute: the second call returns the cached digest, and
/// updates after finalize are ignored.
pub struct DigestContext {
    algorithm: DigestAlgorithm,
    hasher:    Option<AnyHasher>,
    digest:    Option<Vec<u8>>,
}

impl DigestContext {
    pub fn new(algorithm: DigestAlgorithm) -> Self {
        Self {
            algorithm,
            hasher: Some(AnyHasher::new(algorithm)),
            digest: None,
        }
    }

    pub fn algorithm(&self) -> DigestAlgorithm { self.algorithm }

    pub fn is_finalized(&self) -> bool { self.digest.is_some() }

    pub fn update(&mut self, data: &[u8]) {
        if let Some(hasher) = self.hasher.as_mut() {
            hasher.update(data);
        }
    }

    pub fn finalize(&mut self) -> &[u8] {
        if let Some(hasher) = self.hasher.take() {
            self.digest = Some(hasher.finalize());
        }
        self.digest.as_deref().unwrap_or_default()
    }

    /// Finalizes and renders the digest as lowercase hex.
    ///
    /// Returns `None` if the digest does not have the algorithm's length.
    pub fn hex_digest(&mut self) -> Option<String> {
        let expected = self.algorithm.digest_length();
        let digest = self.finalize();
        (digest.len() == expected).then(|| hex::encode(digest))
    }

    /// Finalizes and compares against a hex-encoded expected digest.
    pub fn verify(&mut self, expected_hex: &str) -> Result<()> {
        verify_hex(self.finalize(), expected_hex)
    }
}

impl std::fmt::Debug for DigestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigestContext")
            .field("algorithm", &self.algorithm)
            .field("finalized", &self.is_finalized())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finalize_is_cached() {
        let mut context = DigestContext::new(DigestAlgorithm::Sha1);
        context.update(b"abc");
        let first = context.finalize().to_vec();

        context.update(b"ignored after finalize");
        assert_eq!(context.finalize(), first.as_slice());
        assert!(context.is_finalized());
    }

    #[test]
    fn test_hex_digest_length_matches_algorithm() {
        for algorithm in DigestAlgorithm::ALL {
            let mut context = DigestContext::new(algorithm);
            context.update(b"length check");
            let hex = context.hex_digest().unwrap();
            assert_eq!(hex.len(), algorithm.digest_length() * 2, "{algorithm}");
            assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
    }

    #[test]
    fn test_empty_input() {
        let mut context = DigestContext::new(DigestAlgorithm::Md5);
        assert_eq!(
            context.hex_digest().as_deref(),
            Some("d41d8cd98f00b204e9800998ecf8427e")
        );
    }

    #[test]
    fn test_verify_against_expected() {
        let mut context = DigestContext::new(DigestAlgorithm::Sha256);
        context.update(b"hello world");
        context
            .verify("B94D27B9934D3E08A52E52D7DA7DABFAC484EFE37A5380EE9088F7ACE2EFCDE9")
            .unwrap();
        assert!(context.verify(&"00".repeat(32)).is_err());
    }
}
