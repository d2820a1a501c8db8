//! Error types for GTIN generation.
//!
//! Every fallible operation in this crate returns [`GtinResult<T>`], an alias
//! for `Result<T, GtinError>`.
//!
//! # Error Handling Example
//!
//! ```
//! use catalog_gtin::error::{GtinError, GtinResult};
//! use catalog_gtin::checksum::ean13_check_digit;
//!
//! fn check(payload: &str) -> GtinResult<char> {
//!     ean13_check_digit(payload)
//! }
//!
//! match check("12345") {
//!     Ok(digit) => println!("check digit {digit}"),
//!     Err(GtinError::InvalidPayload { payload, reason }) => {
//!         eprintln!("bad payload {payload:?}: {reason}");
//!     }
//!     Err(other) => eprintln!("unexpected: {other}"),
//! }
//! ```

use thiserror::Error;

/// Result type alias for GTIN operations.
pub type GtinResult<T> = Result<T, GtinError>;

#[derive(Error, Debug)]
pub enum GtinError {
    /// The checksum unit was handed something other than 12 ASCII digits.
    #[error("Invalid payload {payload:?}: {reason}")]
    InvalidPayload { payload: String, reason: &'static str },

    /// A string claimed to be a full EAN-13 code but is not one.
    #[error("Invalid EAN-13 code {code:?}: {reason}")]
    InvalidCode { code: String, reason: &'static str },

    /// A synthesizer received seed material it cannot derive a payload from.
    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    /// The retry bound was hit without finding an unregistered code.
    #[error("Keyspace exhausted for {entity:?} after {attempts} attempts")]
    ExhaustedKeyspace { entity: String, attempts: u32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML Error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl GtinError {
    /// True for errors that concern a single entity and let a pass continue.
    pub fn is_entity_scoped(&self) -> bool {
        matches!(
            self,
            GtinError::InvalidSeed(_) | GtinError::ExhaustedKeyspace { .. }
        )
    }
}
