//! Per-run generation state and the bounded retry loop.

use std::collections::HashMap;

use log::{debug, trace};

use crate::code::Gtin;
use crate::config::{DEFAULT_MAX_ATTEMPTS, GenerationConfig};
use crate::error::{GtinError, GtinResult};
use crate::registry::{CodeRegistry, UniquenessRegistry};
use crate::strategy::derived::MAX_SUFFIX;
use crate::strategy::{
    CodeSynthesizer, SynthesisSeed, Synthesizer, VariantCodes, derive_from_parent,
};

/// Everything one assignment run mutates: the registry of issued codes, the
/// synthesizer with its counters, and the suffix cursors for derived variant
/// codes.
///
/// Nothing here outlives the run. Uniqueness across runs only holds if the
/// caller seeds the registry with the earlier codes.
#[derive(Debug)]
pub struct GenerationContext<R: CodeRegistry = UniquenessRegistry> {
    registry: R,
    synthesizer: Synthesizer,
    max_attempts: u32,
    variant_codes: VariantCodes,
    next_suffix: HashMap<Gtin, u8>,
    collisions: u64,
}

impl GenerationContext<UniquenessRegistry> {
    pub fn new(synthesizer: impl Into<Synthesizer>) -> Self {
        Self::with_registry(synthesizer, UniquenessRegistry::new())
    }

    pub fn from_config(config: &GenerationConfig) -> GtinResult<Self> {
        Self::from_config_with_registry(config, UniquenessRegistry::new())
    }
}

impl<R: CodeRegistry> GenerationContext<R> {
    pub fn with_registry(synthesizer: impl Into<Synthesizer>, registry: R) -> Self {
        Self {
            registry,
            synthesizer: synthesizer.into(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            variant_codes: VariantCodes::default(),
            next_suffix: HashMap::new(),
            collisions: 0,
        }
    }

    pub fn from_config_with_registry(config: &GenerationConfig, registry: R) -> GtinResult<Self> {
        let synthesizer = config.build_synthesizer()?;
        Ok(Self::with_registry(synthesizer, registry)
            .max_attempts(config.max_attempts)
            .variant_codes(config.variant_codes))
    }

    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn variant_codes(mut self, variant_codes: VariantCodes) -> Self {
        self.variant_codes = variant_codes;
        self
    }

    /// Preload codes issued elsewhere so this run cannot hand them out again.
    pub fn seeded<I>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = Gtin>,
    {
        self.registry.seed(codes);
        self
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn into_registry(self) -> R {
        self.registry
    }

    pub fn synthesizer(&self) -> &Synthesizer {
        &self.synthesizer
    }

    /// Candidates rejected by the registry so far.
    pub fn collisions(&self) -> u64 {
        self.collisions
    }

    /// Claim a code that already exists on an entity.
    pub fn register_existing(&mut self, code: &Gtin) -> bool {
        self.registry.register(code)
    }

    /// Synthesize and register a fresh code for `entity_id`.
    ///
    /// The attempt counter starts at 0 and goes up by one per collision, so
    /// the hash strategy walks a fixed sequence of candidates and the others
    /// simply resample. Gives up with `ExhaustedKeyspace` after
    /// `max_attempts` rejected candidates.
    pub fn issue(&mut self, entity_id: &str) -> GtinResult<Gtin> {
        let seed = SynthesisSeed::new(entity_id);
        for attempt in 0..self.max_attempts {
            let code = self
                .synthesizer
                .synthesize(&seed.with_attempt(attempt))?
                .finish();
            if self.registry.register(&code) {
                return Ok(code);
            }
            self.collisions += 1;
            trace!("GenerationContext: {entity_id} attempt {attempt} collided on {code}");
        }
        Err(GtinError::ExhaustedKeyspace {
            entity: entity_id.to_string(),
            attempts: self.max_attempts,
        })
    }

    /// Issue a code for a variant of the product holding `parent`.
    ///
    /// With [`VariantCodes::DerivedFromParent`] the parent's first 10 digits
    /// are reused with suffixes 01..=99 in order; once those are used up, or
    /// in independent mode, this is [`issue`](Self::issue).
    pub fn issue_variant(&mut self, entity_id: &str, parent: &Gtin) -> GtinResult<Gtin> {
        if self.variant_codes == VariantCodes::DerivedFromParent {
            let parent_payload = parent.payload();
            let cursor = self.next_suffix.entry(parent.clone()).or_insert(1);
            while *cursor <= MAX_SUFFIX {
                let suffix = *cursor;
                *cursor += 1;
                let Some(payload) = derive_from_parent(&parent_payload, suffix) else {
                    continue;
                };
                let code = payload.finish();
                if self.registry.register(&code) {
                    return Ok(code);
                }
                self.collisions += 1;
                trace!("GenerationContext: {entity_id} suffix {suffix:02} collided on {code}");
            }
            debug!("GenerationContext: suffixes of {parent} used up, {entity_id} falls back");
        }
        self.issue(entity_id)
    }
}
