//! Store prefix + date prefix + running sequence.

use log::warn;

use super::{CodeSynthesizer, SynthesisSeed};
use crate::code::Payload;
use crate::error::{GtinError, GtinResult};

pub const SEQUENCE_MIN: u32 = 1;
pub const SEQUENCE_MAX: u32 = 9999;
const STORE_PREFIX_MAX: u8 = 99;

/// `[store:2][date:6][sequence:4]`.
///
/// Every call consumes one sequence number, so resampling after a collision is
/// just calling again. Once 9999 is used up the store prefix advances by one
/// and the sequence starts over at 0001.
#[derive(Debug, Clone)]
pub struct SequencePrefix {
    store_prefix: u8,
    date_prefix: String,
    next: u32,
}

impl SequencePrefix {
    pub fn new(store_prefix: &str, date_prefix: &str, start: u32) -> GtinResult<Self> {
        let store_prefix = parse_store_prefix(store_prefix)?;
        if date_prefix.len() != 6 || !date_prefix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(GtinError::InvalidSeed(format!(
                "date prefix must be 6 digits, got {date_prefix:?}"
            )));
        }
        if !(SEQUENCE_MIN..=SEQUENCE_MAX).contains(&start) {
            return Err(GtinError::InvalidSeed(format!(
                "sequence start must be within {SEQUENCE_MIN}..={SEQUENCE_MAX}, got {start}"
            )));
        }
        Ok(Self {
            store_prefix,
            date_prefix: date_prefix.to_string(),
            next: start,
        })
    }

    pub fn store_prefix(&self) -> String {
        format!("{:02}", self.store_prefix)
    }

    pub fn date_prefix(&self) -> &str {
        &self.date_prefix
    }

    /// The sequence number the next call will use.
    pub fn next_sequence(&self) -> u32 {
        self.next
    }

    fn roll_over(&mut self, entity_id: &str) -> GtinResult<()> {
        if self.store_prefix >= STORE_PREFIX_MAX {
            return Err(GtinError::ExhaustedKeyspace {
                entity: entity_id.to_string(),
                attempts: SEQUENCE_MAX,
            });
        }
        self.store_prefix += 1;
        self.next = SEQUENCE_MIN;
        warn!(
            "SequencePrefix: sequence space used up, store prefix advanced to {:02}",
            self.store_prefix
        );
        Ok(())
    }
}

pub(crate) fn parse_store_prefix(prefix: &str) -> GtinResult<u8> {
    if prefix.len() != 2 || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GtinError::InvalidSeed(format!(
            "store prefix must be 2 digits, got {prefix:?}"
        )));
    }
    prefix
        .parse()
        .map_err(|_| GtinError::InvalidSeed(format!("unparseable store prefix {prefix:?}")))
}

impl CodeSynthesizer for SequencePrefix {
    fn synthesize(&mut self, seed: &SynthesisSeed<'_>) -> GtinResult<Payload> {
        if self.next > SEQUENCE_MAX {
            self.roll_over(seed.entity_id)?;
        }
        let digits = format!(
            "{:02}{}{:04}",
            self.store_prefix, self.date_prefix, self.next
        );
        self.next += 1;
        Payload::new(digits)
    }
}
