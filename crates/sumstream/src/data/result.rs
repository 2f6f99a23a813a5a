use sumstream_source::Subject;
use sumstream_verify::{VerificationError, verify_hex};

use crate::error::ChecksumError;

/// Outcome of one checksum computation, paired with its subject.
#[derive(Debug)]
pub struct ChecksumResult {
    pub subject: Subject,
    /// Lowercase hex digest, or why none was produced.
    pub outcome: Result<String, ChecksumError>,
}

impl ChecksumResult {
    pub fn new(subject: Subject, outcome: Result<String, ChecksumError>) -> Self {
        Self { subject, outcome }
    }

    pub fn failed(subject: Subject, error: ChecksumError) -> Self { Self::new(subject, Err(error)) }

    /// The hex digest, `None` if the computation failed.
    pub fn checksum(&self) -> Option<&str> { self.outcome.as_deref().ok() }

    pub fn is_success(&self) -> bool { self.outcome.is_ok() }

    pub fn error(&self) -> Option<&ChecksumError> { self.outcome.as_ref().err() }

    /// Compares the digest with `expected_hex`.
    ///
    /// Returns `None` if there is no digest to compare.
    pub fn verify(&self, expected_hex: &str) -> Option<Result<(), VerificationError>> {
        let actual = hex::decode(self.checksum()?).ok()?;
        Some(verify_hex(&actual, expected_hex))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGEST: &str = "0f13e02ea41fb763b0ad09daa72a4b6e";

    #[test]
    fn test_successful_result() {
        let result = ChecksumResult::new(Subject::from("x"), Ok(DIGEST.to_string()));
        assert!(result.is_success());
        assert_eq!(result.checksum(), Some(DIGEST));
        assert!(result.verify(&DIGEST.to_uppercase()).unwrap().is_ok());
        assert!(matches!(
            result.verify("00").unwrap(),
            Err(VerificationError::Mismatch { .. })
        ));
    }

    #[test]
    fn test_failed_result() {
        let result = ChecksumResult::failed(Subject::from("x"), ChecksumError::Unknown);
        assert_eq!(result.checksum(), None);
        assert!(matches!(result.error(), Some(ChecksumError::Unknown)));
        assert!(result.verify(DIGEST).is_none());
    }
}
