//! Validated code types.
//!
//! [`Payload`] holds exactly 12 ASCII digits and [`Gtin`] holds a payload plus
//! its matching check digit. Neither can be constructed in an invalid state,
//! so the rest of the crate passes them around without re-checking.

use std::str::FromStr;

use derive_more::{AsRef, Display, Into};
use serde::{Deserialize, Serialize};

use crate::checksum::{self, PAYLOAD_LEN};
use crate::error::{GtinError, GtinResult};

/// The 12 digits of an EAN-13 code that precede the check digit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, AsRef, Into)]
#[as_ref(str)]
pub struct Payload(String);

impl Payload {
    pub fn new(digits: impl Into<String>) -> GtinResult<Self> {
        let digits = digits.into();
        checksum::ean13_check_digit(&digits)?;
        Ok(Self(digits))
    }

    /// Map raw values onto digits with `value % 10`.
    pub(crate) fn from_digit_values<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<u32>,
    {
        let digits: String = values
            .into_iter()
            .take(PAYLOAD_LEN)
            .map(|v| {
                let v: u32 = v.into();
                char::from(b'0' + (v % 10) as u8)
            })
            .collect();
        debug_assert_eq!(digits.len(), PAYLOAD_LEN);
        Self(digits)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn check_digit(&self) -> char {
        checksum::check_digit_unchecked(self.0.as_bytes())
    }

    /// Attach the check digit.
    pub fn finish(self) -> Gtin {
        let check = self.check_digit();
        let mut code = self.0;
        code.push(check);
        Gtin(code)
    }
}

/// A full 13-digit EAN-13 code with a verified check digit.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, AsRef, Into, Serialize, Deserialize,
)]
#[as_ref(str)]
#[serde(try_from = "String", into = "String")]
pub struct Gtin(String);

impl Gtin {
    /// Parse a 13-digit code, rejecting bad lengths and wrong check digits.
    pub fn parse(code: &str) -> GtinResult<Self> {
        checksum::validate_ean13(code)?;
        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn payload(&self) -> Payload {
        Payload(self.0[..PAYLOAD_LEN].to_string())
    }
}

impl FromStr for Gtin {
    type Err = GtinError;

    fn from_str(s: &str) -> GtinResult<Self> {
        Gtin::parse(s)
    }
}

impl TryFrom<String> for Gtin {
    type Error = GtinError;

    fn try_from(value: String) -> GtinResult<Self> {
        checksum::validate_ean13(&value)?;
        Ok(Self(value))
    }
}

impl From<Payload> for Gtin {
    fn from(payload: Payload) -> Self {
        payload.finish()
    }
}

impl PartialEq<str> for Gtin {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Gtin {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_payload_finish_appends_check_digit() {
        let gtin = Payload::new("252510250001").unwrap().finish();
        assert_eq!(gtin.as_str(), "2525102500015");
        assert_eq!(gtin.payload().as_str(), "252510250001");
    }

    #[test]
    fn test_payload_rejects_short_input() {
        assert_matches!(Payload::new("2525"), Err(GtinError::InvalidPayload { .. }));
    }

    #[test]
    fn test_from_digit_values_reduces_modulo_ten() {
        let payload = Payload::from_digit_values([10u8, 255, 9, 0, 1, 2, 3, 4, 5, 6, 7, 8, 99]);
        assert_eq!(payload.as_str(), "059012345678");
    }

    #[test]
    fn test_gtin_parse_and_display() {
        let gtin: Gtin = "1234567890128".parse().unwrap();
        assert_eq!(gtin.to_string(), "1234567890128");
        assert!(Gtin::parse("1234567890129").is_err());
    }

    #[test]
    fn test_gtin_serde_rejects_invalid_checksum() {
        #[derive(Deserialize)]
        struct Row {
            code: Gtin,
        }

        let ok: Row = toml::from_str("code = \"1234567890128\"").unwrap();
        assert_eq!(ok.code, "1234567890128");
        assert!(toml::from_str::<Row>("code = \"1234567890120\"").is_err());
    }
}
