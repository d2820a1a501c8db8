//! Post-pass catalog audit.
//!
//! Checks that every entity carries a code, that every code is a valid EAN-13
//! and that no code appears twice across products and variants.

use std::collections::BTreeMap;

use log::{info, warn};

use crate::catalog::{CatalogEntity, EntityKind};
use crate::code::Gtin;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateCode {
    pub code: Gtin,
    /// Input positions of every entity holding `code`.
    pub indices: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditReport {
    pub products: usize,
    pub variants: usize,
    pub distinct_codes: usize,
    /// Entities with no code or a blank one.
    pub missing: Vec<usize>,
    /// Entities whose code is not 13 digits with a matching check digit.
    pub malformed: Vec<(usize, String)>,
    pub duplicates: Vec<DuplicateCode>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.malformed.is_empty() && self.duplicates.is_empty()
    }

    pub fn problem_count(&self) -> usize {
        self.missing.len()
            + self.malformed.len()
            + self.duplicates.iter().map(|d| d.indices.len() - 1).sum::<usize>()
    }
}

pub fn audit_catalog(entities: &[CatalogEntity]) -> AuditReport {
    let mut report = AuditReport::default();
    let mut holders: BTreeMap<Gtin, Vec<usize>> = BTreeMap::new();

    for (index, entity) in entities.iter().enumerate() {
        match entity.kind() {
            EntityKind::Product => report.products += 1,
            EntityKind::Variant => report.variants += 1,
        }
        let code = entity.code.as_deref().map(str::trim).unwrap_or_default();
        if code.is_empty() {
            report.missing.push(index);
            continue;
        }
        match Gtin::parse(code) {
            Ok(gtin) => holders.entry(gtin).or_default().push(index),
            Err(_) => report.malformed.push((index, code.to_string())),
        }
    }

    report.distinct_codes = holders.len();
    report.duplicates = holders
        .into_iter()
        .filter(|(_, indices)| indices.len() > 1)
        .map(|(code, indices)| DuplicateCode { code, indices })
        .collect();

    if report.is_clean() {
        info!(
            "Audit: {} products, {} variants, {} codes, clean",
            report.products, report.variants, report.distinct_codes
        );
    } else {
        warn!(
            "Audit: {} missing, {} malformed, {} duplicated codes",
            report.missing.len(),
            report.malformed.len(),
            report.duplicates.len()
        );
    }
    report
}
