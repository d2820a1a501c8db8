//! EAN-13 check digit arithmetic.
//!
//! Payload digits are indexed from 0. Even positions weigh 1, odd positions
//! weigh 3, and the check digit is `(10 - sum % 10) % 10`.

use crate::error::{GtinError, GtinResult};

pub const PAYLOAD_LEN: usize = 12;
pub const CODE_LEN: usize = 13;

/// Compute the check digit for a 12-digit payload.
///
/// ```
/// use catalog_gtin::checksum::ean13_check_digit;
///
/// assert_eq!(ean13_check_digit("123456789012").unwrap(), '8');
/// assert!(ean13_check_digit("12345678901A").is_err());
/// ```
pub fn ean13_check_digit(payload: &str) -> GtinResult<char> {
    if payload.len() != PAYLOAD_LEN {
        return Err(GtinError::InvalidPayload {
            payload: payload.to_string(),
            reason: "payload must be exactly 12 digits",
        });
    }
    if !payload.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GtinError::InvalidPayload {
            payload: payload.to_string(),
            reason: "payload must be numeric",
        });
    }
    Ok(check_digit_unchecked(payload.as_bytes()))
}

/// Caller guarantees 12 ASCII digits.
pub(crate) fn check_digit_unchecked(digits: &[u8]) -> char {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 0 { d } else { d * 3 }
        })
        .sum();
    let check = (10 - sum % 10) % 10;
    char::from(b'0' + check as u8)
}

/// Structural EAN-13 check: 13 ASCII digits with a matching check digit.
pub fn is_valid_ean13(code: &str) -> bool {
    validate_ean13(code).is_ok()
}

/// Like [`is_valid_ean13`] but says what is wrong.
pub fn validate_ean13(code: &str) -> GtinResult<()> {
    if code.len() != CODE_LEN || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GtinError::InvalidCode {
            code: code.to_string(),
            reason: "code must be exactly 13 digits",
        });
    }
    let bytes = code.as_bytes();
    if check_digit_unchecked(&bytes[..PAYLOAD_LEN]) != char::from(bytes[PAYLOAD_LEN]) {
        return Err(GtinError::InvalidCode {
            code: code.to_string(),
            reason: "check digit mismatch",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    #[test]
    fn test_known_vector() {
        // weight 1: 1+3+5+7+9+1 = 26, weight 3: 3*(2+4+6+8+0+2) = 66
        // 92 -> (10 - 2) % 10
        assert_eq!(ean13_check_digit("123456789012").unwrap(), '8');
    }

    #[test]
    fn test_sum_multiple_of_ten_gives_zero() {
        assert_eq!(ean13_check_digit("000000000000").unwrap(), '0');
    }

    #[test]
    fn test_store_prefix_vectors() {
        assert_eq!(ean13_check_digit("252510250001").unwrap(), '5');
        assert_eq!(ean13_check_digit("252510250002").unwrap(), '2');
        assert_eq!(ean13_check_digit("252510250003").unwrap(), '9');
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert_matches!(
            ean13_check_digit("12345678901"),
            Err(GtinError::InvalidPayload { .. })
        );
        assert_matches!(
            ean13_check_digit("1234567890123"),
            Err(GtinError::InvalidPayload { .. })
        );
    }

    #[test]
    fn test_rejects_non_numeric() {
        assert_matches!(
            ean13_check_digit("12345678901x"),
            Err(GtinError::InvalidPayload { .. })
        );
        // multi-byte chars must not slip through the length check
        assert_matches!(
            ean13_check_digit("１２３４"),
            Err(GtinError::InvalidPayload { .. })
        );
    }

    #[test]
    fn test_validate_ean13() {
        assert!(is_valid_ean13("1234567890128"));
        assert!(!is_valid_ean13("1234567890127"));
        assert!(!is_valid_ean13("123456789012"));
        assert!(!is_valid_ean13("SD1234567890128"));
        assert_matches!(
            validate_ean13("1234567890120"),
            Err(GtinError::InvalidCode { reason: "check digit mismatch", .. })
        );
    }

    proptest! {
        #[test]
        fn prop_check_digit_is_single_deterministic_digit(payload in "[0-9]{12}") {
            let first = ean13_check_digit(&payload).unwrap();
            let second = ean13_check_digit(&payload).unwrap();
            prop_assert!(first.is_ascii_digit());
            prop_assert_eq!(first, second);
            let code = format!("{payload}{first}");
            prop_assert!(is_valid_ean13(&code));
        }
    }
}
