use crate::{Result, VerificationError};

/// Compares a raw digest with a hex-encoded expectation.
///
/// The expectation is trimmed and matched case-insensitively.
pub fn verify_hex(actual: &[u8], expected_hex: &str) -> Result<()> {
    let trimmed = expected_hex.trim();
    let expected =
        hex::decode(trimmed).map_err(|_| VerificationError::InvalidHex(trimmed.to_string()))?;

    if expected == actual {
        Ok(())
    } else {
        Err(VerificationError::Mismatch {
            expected,
            actual: actual.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_hex_match() {
        assert!(verify_hex(&[0xde, 0xad, 0xbe, 0xef], "DeadBeef").is_ok());
    }

    #[test]
    fn test_verify_hex_mismatch() {
        let result = verify_hex(&[0x01, 0x02], "0103");
        if let Err(VerificationError::Mismatch { expected, actual }) = result {
            assert_eq!(expected, vec![0x01, 0x03]);
            assert_eq!(actual, vec![0x01, 0x02]);
        } else {
            panic!("Expected Mismatch error");
        }
    }

    #[test]
    fn test_verify_hex_invalid() {
        assert!(matches!(
            verify_hex(&[0x01], "zz"),
            Err(VerificationError::InvalidHex(s)) if s == "zz"
        ));
    }
}
