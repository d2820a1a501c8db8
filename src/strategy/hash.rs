//! Deterministic hash-derived payloads.

use log::trace;

use super::{CodeSynthesizer, SynthesisSeed};
use crate::checksum::PAYLOAD_LEN;
use crate::code::Payload;
use crate::error::{GtinError, GtinResult};

const FIELD_SEPARATOR: &[u8] = &[0x1f];

/// Payload = first 12 bytes of `BLAKE3(salt | id | attempt)`, each reduced
/// with `byte % 10`.
///
/// The reduction is not uniform: byte values 250..=255 add one extra hit to
/// digits 0..=5. Codes stay reproducible across runs as long as the mapping
/// does not change, so it is kept as is.
#[derive(Debug, Clone)]
pub struct DeterministicHash {
    salt: String,
}

impl DeterministicHash {
    pub fn new(salt: impl Into<String>) -> GtinResult<Self> {
        let salt = salt.into();
        if salt.is_empty() {
            return Err(GtinError::InvalidSeed(
                "deterministic-hash requires a non-empty salt".to_string(),
            ));
        }
        Ok(Self { salt })
    }

    pub fn salt(&self) -> &str {
        &self.salt
    }

    fn digest(&self, entity_id: &str, attempt: u32) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.salt.as_bytes());
        hasher.update(FIELD_SEPARATOR);
        hasher.update(entity_id.as_bytes());
        hasher.update(FIELD_SEPARATOR);
        hasher.update(attempt.to_string().as_bytes());
        hasher.finalize()
    }
}

impl CodeSynthesizer for DeterministicHash {
    fn synthesize(&mut self, seed: &SynthesisSeed<'_>) -> GtinResult<Payload> {
        if seed.entity_id.trim().is_empty() {
            return Err(GtinError::InvalidSeed(
                "deterministic-hash requires a non-empty entity identifier".to_string(),
            ));
        }
        let digest = self.digest(seed.entity_id, seed.attempt);
        let payload = Payload::from_digit_values(digest.as_bytes()[..PAYLOAD_LEN].iter().copied());
        trace!(
            "DeterministicHash: {} attempt {} -> {}",
            seed.entity_id, seed.attempt, payload
        );
        Ok(payload)
    }
}
