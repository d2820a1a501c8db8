//! The assignment pass.
//!
//! Walks a catalog parent-first and leaves every entity with exactly one code
//! that no other entity in the run holds.

use std::collections::HashMap;

use log::{debug, info, warn};

use crate::catalog::{CatalogEntity, EntityKind, has_malformed_code, processing_order};
use crate::code::Gtin;
use crate::config::GenerationConfig;
use crate::context::GenerationContext;
use crate::error::{GtinError, GtinResult};
use crate::registry::{CodeRegistry, UniquenessRegistry};

/// An entity the pass could not assign a code to.
#[derive(Debug)]
pub struct AssignmentFailure {
    /// Position in the input slice.
    pub index: usize,
    pub entity_id: String,
    pub error: GtinError,
}

#[derive(Debug, Default)]
pub struct AssignmentReport {
    /// Existing codes kept as they were.
    pub preserved: usize,
    /// Fresh codes written.
    pub issued: usize,
    /// Indices of entities without a usable identifier.
    pub skipped: Vec<usize>,
    /// Candidates rejected by the registry during this pass.
    pub collisions: u64,
    pub failures: Vec<AssignmentFailure>,
}

impl AssignmentReport {
    pub fn assigned(&self) -> usize {
        self.preserved + self.issued
    }

    /// No skips and no failures.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && self.failures.is_empty()
    }
}

enum Outcome {
    Preserved(Gtin),
    Issued(Gtin),
}

pub struct AssignmentPass<R: CodeRegistry = UniquenessRegistry> {
    context: GenerationContext<R>,
    preserve_valid_existing: bool,
    abort_on_failure: bool,
}

impl AssignmentPass<UniquenessRegistry> {
    /// Fresh context and registry built from `config`.
    pub fn from_config(config: &GenerationConfig) -> GtinResult<Self> {
        Ok(Self::new(GenerationContext::from_config(config)?)
            .preserve_valid_existing(config.preserve_valid_existing)
            .abort_on_failure(config.abort_on_failure))
    }
}

impl<R: CodeRegistry> AssignmentPass<R> {
    pub fn new(context: GenerationContext<R>) -> Self {
        Self {
            context,
            preserve_valid_existing: true,
            abort_on_failure: false,
        }
    }

    pub fn preserve_valid_existing(mut self, preserve: bool) -> Self {
        self.preserve_valid_existing = preserve;
        self
    }

    pub fn abort_on_failure(mut self, abort: bool) -> Self {
        self.abort_on_failure = abort;
        self
    }

    pub fn context(&self) -> &GenerationContext<R> {
        &self.context
    }

    pub fn into_context(self) -> GenerationContext<R> {
        self.context
    }

    /// Assign codes to `entities` in place.
    ///
    /// Entities keep their positions; only `code` fields change. With
    /// `preserve_valid_existing`, every valid existing code is claimed before
    /// any fresh code is issued, so a generated code can never displace one
    /// already in the catalog. Per-entity failures land in the report unless
    /// `abort_on_failure` is set, in which case the first one is returned as
    /// the error.
    pub fn run(&mut self, entities: &mut [CatalogEntity]) -> GtinResult<AssignmentReport> {
        let collisions_before = self.context.collisions();
        let mut report = AssignmentReport::default();
        let mut product_codes: HashMap<String, Gtin> = HashMap::new();
        let order = processing_order(entities);

        info!(
            "AssignmentPass: assigning {} entities with {}",
            entities.len(),
            self.context.synthesizer().strategy()
        );

        let mut claimed = self.claim_existing(entities, &order);

        for index in order {
            let entity = &mut entities[index];
            let Some(id) = entity.id().map(str::to_owned) else {
                warn!(
                    "AssignmentPass: entity #{index} (product {:?}) has no identifier, skipped",
                    entity.product_id
                );
                report.skipped.push(index);
                continue;
            };

            let outcome = match claimed.remove(&index) {
                Some(existing) => Ok(Outcome::Preserved(existing)),
                None => self.issue_for(entity, &id, &product_codes),
            };

            match outcome {
                Ok(outcome) => {
                    let code = match outcome {
                        Outcome::Preserved(code) => {
                            report.preserved += 1;
                            debug!("AssignmentPass: {id} keeps {code}");
                            if entity.code.as_deref() != Some(code.as_str()) {
                                entity.code = Some(code.to_string());
                            }
                            code
                        }
                        Outcome::Issued(code) => {
                            report.issued += 1;
                            debug!("AssignmentPass: {id} -> {code}");
                            entity.code = Some(code.to_string());
                            code
                        }
                    };
                    if entity.kind() == EntityKind::Product {
                        product_codes
                            .entry(entity.product_id.trim().to_string())
                            .or_insert(code);
                    }
                }
                Err(error) if error.is_entity_scoped() && !self.abort_on_failure => {
                    warn!("AssignmentPass: {id} left without a code: {error}");
                    report.failures.push(AssignmentFailure {
                        index,
                        entity_id: id,
                        error,
                    });
                }
                Err(error) => return Err(error),
            }
        }

        report.collisions = self.context.collisions() - collisions_before;
        info!(
            "AssignmentPass: {} issued, {} preserved, {} skipped, {} failed, {} collisions",
            report.issued,
            report.preserved,
            report.skipped.len(),
            report.failures.len(),
            report.collisions
        );
        Ok(report)
    }

    /// Register the valid existing codes of identified entities, first holder
    /// wins. Returns the claimed code per entity index.
    fn claim_existing(
        &mut self,
        entities: &[CatalogEntity],
        order: &[usize],
    ) -> HashMap<usize, Gtin> {
        let mut claimed = HashMap::new();
        if !self.preserve_valid_existing {
            return claimed;
        }
        for &index in order {
            let entity = &entities[index];
            let Some(id) = entity.id() else {
                continue;
            };
            if let Some(existing) = entity.valid_code() {
                if self.context.register_existing(&existing) {
                    claimed.insert(index, existing);
                } else {
                    warn!("AssignmentPass: {id} carries duplicate code {existing}, replacing");
                }
            } else if has_malformed_code(entity) {
                debug!(
                    "AssignmentPass: {id} carries malformed code {:?}, replacing",
                    entity.code
                );
            }
        }
        debug!("AssignmentPass: claimed {} existing codes", claimed.len());
        claimed
    }

    fn issue_for(
        &mut self,
        entity: &CatalogEntity,
        id: &str,
        product_codes: &HashMap<String, Gtin>,
    ) -> GtinResult<Outcome> {
        let code = match entity.kind() {
            EntityKind::Variant => match product_codes.get(entity.product_id.trim()) {
                Some(parent) => self.context.issue_variant(id, parent)?,
                None => self.context.issue(id)?,
            },
            EntityKind::Product => self.context.issue(id)?,
        };
        Ok(Outcome::Issued(code))
    }
}

/// One-shot helper: fresh context from `config`, one pass over `entities`.
pub fn assign_codes(
    entities: &mut [CatalogEntity],
    config: &GenerationConfig,
) -> GtinResult<AssignmentReport> {
    AssignmentPass::from_config(config)?.run(entities)
}
