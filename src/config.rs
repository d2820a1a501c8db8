//! Run configuration.
//!
//! [`GenerationConfig`] is built either in code through the `typed-builder`
//! builder or from a TOML document:
//!
//! ```
//! use catalog_gtin::config::GenerationConfig;
//! use catalog_gtin::strategy::Strategy;
//!
//! let config = GenerationConfig::builder()
//!     .strategy(Strategy::SequencePrefix)
//!     .store_prefix("25")
//!     .date_prefix("251025")
//!     .build();
//! assert!(config.validate().is_ok());
//!
//! let config = GenerationConfig::from_toml_str(r#"
//!     strategy = "deterministic-hash"
//!     salt = "feed-2025"
//!     preserve_valid_existing = false
//! "#).unwrap();
//! assert_eq!(config.strategy, Strategy::DeterministicHash);
//! ```

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::{GtinError, GtinResult};
use crate::strategy::sequence::{SEQUENCE_MAX, SEQUENCE_MIN};
use crate::strategy::{
    DeterministicHash, PureRandom, SequencePrefix, Strategy, Synthesizer, TimeStamped,
    VariantCodes,
};

pub const DEFAULT_STORE_PREFIX: &str = "25";
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder, Serialize, Deserialize)]
#[builder(doc)]
#[serde(default)]
pub struct GenerationConfig {
    /// Which synthesizer produces candidate payloads
    #[builder(default)]
    pub strategy: Strategy,

    /// Secret salt for the deterministic-hash strategy
    #[builder(default, setter(strip_option, into))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,

    /// Two-digit store prefix (sequence-prefix and time-stamped)
    #[builder(default = DEFAULT_STORE_PREFIX.to_string(), setter(into))]
    pub store_prefix: String,

    /// Six-digit `YYMMDD` prefix; today's local date when unset
    #[builder(default, setter(strip_option, into))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_prefix: Option<String>,

    /// First sequence number handed out
    #[builder(default = SEQUENCE_MIN)]
    pub sequence_start: u32,

    /// Keep existing codes that are valid and not yet registered
    #[builder(default = true)]
    pub preserve_valid_existing: bool,

    #[builder(default)]
    pub variant_codes: VariantCodes,

    /// Fixed RNG seed for the random strategies. `u32` so it always fits a
    /// TOML integer.
    #[builder(default, setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rng_seed: Option<u32>,

    /// Retry bound before an entity fails with `ExhaustedKeyspace`
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// Stop the pass at the first entity that cannot be assigned
    #[builder(default = false)]
    pub abort_on_failure: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            salt: None,
            store_prefix: DEFAULT_STORE_PREFIX.to_string(),
            date_prefix: None,
            sequence_start: SEQUENCE_MIN,
            preserve_valid_existing: true,
            variant_codes: VariantCodes::default(),
            rng_seed: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            abort_on_failure: false,
        }
    }
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

impl GenerationConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> GtinResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> GtinResult<Self> {
        debug!("GenerationConfig: loading {}", path.as_ref().display());
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn to_toml(&self) -> GtinResult<String> {
        toml::to_string_pretty(self).map_err(|e| GtinError::InvalidConfig(e.to_string()))
    }

    /// The configured date prefix, or today's local date as `YYMMDD`.
    pub fn resolved_date_prefix(&self) -> String {
        self.date_prefix
            .clone()
            .unwrap_or_else(|| chrono::Local::now().format("%y%m%d").to_string())
    }

    pub fn validate(&self) -> GtinResult<()> {
        if !is_digits(&self.store_prefix, 2) {
            return Err(GtinError::InvalidConfig(format!(
                "store_prefix must be 2 digits, got {:?}",
                self.store_prefix
            )));
        }
        if let Some(date_prefix) = &self.date_prefix {
            if !is_digits(date_prefix, 6) {
                return Err(GtinError::InvalidConfig(format!(
                    "date_prefix must be 6 digits, got {date_prefix:?}"
                )));
            }
        }
        if !(SEQUENCE_MIN..=SEQUENCE_MAX).contains(&self.sequence_start) {
            return Err(GtinError::InvalidConfig(format!(
                "sequence_start must be within {SEQUENCE_MIN}..={SEQUENCE_MAX}, got {}",
                self.sequence_start
            )));
        }
        if self.max_attempts == 0 {
            return Err(GtinError::InvalidConfig(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if self.strategy == Strategy::DeterministicHash
            && self.salt.as_deref().is_none_or(str::is_empty)
        {
            return Err(GtinError::InvalidConfig(
                "deterministic-hash requires a non-empty salt".to_string(),
            ));
        }
        Ok(())
    }

    /// Validate and build the synthesizer for the configured strategy.
    pub fn build_synthesizer(&self) -> GtinResult<Synthesizer> {
        self.validate()?;
        let synthesizer: Synthesizer = match self.strategy {
            Strategy::DeterministicHash => {
                DeterministicHash::new(self.salt.clone().unwrap_or_default())?.into()
            }
            Strategy::SequencePrefix => SequencePrefix::new(
                &self.store_prefix,
                &self.resolved_date_prefix(),
                self.sequence_start,
            )?
            .into(),
            Strategy::PureRandom => match self.rng_seed {
                Some(seed) => PureRandom::seeded(u64::from(seed)).into(),
                None => PureRandom::from_entropy().into(),
            },
            Strategy::TimeStamped => TimeStamped::new(&self.store_prefix, self.rng_seed.map(u64::from))?.into(),
        };
        debug!("GenerationConfig: built {} synthesizer", self.strategy);
        Ok(synthesizer)
    }
}
