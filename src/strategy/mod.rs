//! Candidate payload synthesis.
//!
//! A [`CodeSynthesizer`] turns seed material into a 12-digit [`Payload`]. It
//! never looks at the registry; rejecting collisions and retrying is the job of
//! [`GenerationContext`](crate::context::GenerationContext).
//!
//! # Available Strategies
//!
//! - [`DeterministicHash`]: BLAKE3 of salt, entity id and attempt counter.
//!   Re-running with the same inputs reproduces the same codes.
//! - [`SequencePrefix`]: store prefix + date prefix + 4-digit sequence.
//! - [`PureRandom`]: twelve uniformly drawn digits.
//! - [`TimeStamped`]: store prefix + clock digits + random tail.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::code::Payload;
use crate::error::GtinResult;

pub mod derived;
pub mod hash;
pub mod random;
pub mod sequence;

pub use derived::{VariantCodes, derive_from_parent};
pub use hash::DeterministicHash;
pub use random::{PureRandom, TimeStamped};
pub use sequence::SequencePrefix;

/// Seed material for one synthesis call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthesisSeed<'a> {
    /// Identifier of the entity the code is for.
    pub entity_id: &'a str,
    /// Disambiguation counter; 0 on the first try, bumped on every collision.
    pub attempt: u32,
}

impl<'a> SynthesisSeed<'a> {
    pub fn new(entity_id: &'a str) -> Self {
        Self {
            entity_id,
            attempt: 0,
        }
    }

    pub fn with_attempt(self, attempt: u32) -> Self {
        Self { attempt, ..self }
    }
}

/// Produces candidate payloads.
pub trait CodeSynthesizer {
    fn synthesize(&mut self, seed: &SynthesisSeed<'_>) -> GtinResult<Payload>;
}

/// Generation strategy, selected per run.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Strategy {
    DeterministicHash,
    #[default]
    SequencePrefix,
    PureRandom,
    TimeStamped,
}

impl Strategy {
    /// Whether the same inputs always yield the same codes.
    pub fn is_reproducible(self) -> bool {
        matches!(self, Strategy::DeterministicHash | Strategy::SequencePrefix)
    }
}

/// A configured synthesizer for one of the [`Strategy`] variants.
#[derive(Debug)]
pub enum Synthesizer {
    DeterministicHash(DeterministicHash),
    SequencePrefix(SequencePrefix),
    PureRandom(PureRandom),
    TimeStamped(TimeStamped),
}

impl Synthesizer {
    pub fn strategy(&self) -> Strategy {
        match self {
            Synthesizer::DeterministicHash(_) => Strategy::DeterministicHash,
            Synthesizer::SequencePrefix(_) => Strategy::SequencePrefix,
            Synthesizer::PureRandom(_) => Strategy::PureRandom,
            Synthesizer::TimeStamped(_) => Strategy::TimeStamped,
        }
    }
}

impl CodeSynthesizer for Synthesizer {
    fn synthesize(&mut self, seed: &SynthesisSeed<'_>) -> GtinResult<Payload> {
        match self {
            Synthesizer::DeterministicHash(s) => s.synthesize(seed),
            Synthesizer::SequencePrefix(s) => s.synthesize(seed),
            Synthesizer::PureRandom(s) => s.synthesize(seed),
            Synthesizer::TimeStamped(s) => s.synthesize(seed),
        }
    }
}

impl From<DeterministicHash> for Synthesizer {
    fn from(s: DeterministicHash) -> Self {
        Synthesizer::DeterministicHash(s)
    }
}

impl From<SequencePrefix> for Synthesizer {
    fn from(s: SequencePrefix) -> Self {
        Synthesizer::SequencePrefix(s)
    }
}

impl From<PureRandom> for Synthesizer {
    fn from(s: PureRandom) -> Self {
        Synthesizer::PureRandom(s)
    }
}

impl From<TimeStamped> for Synthesizer {
    fn from(s: TimeStamped) -> Self {
        Synthesizer::TimeStamped(s)
    }
}
