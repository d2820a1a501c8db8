//! Catalog entities handed over by the feed layer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::checksum::is_valid_ean13;
use crate::code::Gtin;

/// A product (`variant_id == None`) or one of its variants.
///
/// A variant points at its product through `product_id`; products never hold
/// references to their variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntity {
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Product,
    Variant,
}

impl CatalogEntity {
    pub fn product(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            variant_id: None,
            code: None,
        }
    }

    pub fn variant(product_id: impl Into<String>, variant_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            variant_id: Some(variant_id.into()),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn kind(&self) -> EntityKind {
        match self.variant_id {
            Some(_) => EntityKind::Variant,
            None => EntityKind::Product,
        }
    }

    /// The identifier codes are keyed on: variant id for variants, product id
    /// for products. `None` when that identifier is blank.
    pub fn id(&self) -> Option<&str> {
        let id = match &self.variant_id {
            Some(variant_id) => variant_id.trim(),
            None => self.product_id.trim(),
        };
        (!id.is_empty()).then_some(id)
    }

    /// Existing code, trimmed, if it is a structurally valid EAN-13.
    pub fn valid_code(&self) -> Option<Gtin> {
        let code = self.code.as_deref()?.trim();
        Gtin::parse(code).ok()
    }
}

/// Indices of `entities` in processing order: products grouped by first
/// appearance, each product before its own variants, input order otherwise
/// kept. The slice itself is not touched.
pub fn processing_order(entities: &[CatalogEntity]) -> Vec<usize> {
    let mut groups: Vec<(Option<usize>, Vec<usize>)> = Vec::new();
    let mut group_of: HashMap<&str, usize> = HashMap::new();

    for (index, entity) in entities.iter().enumerate() {
        let key = entity.product_id.trim();
        let group = *group_of.entry(key).or_insert_with(|| {
            groups.push((None, Vec::new()));
            groups.len() - 1
        });
        let (product, variants) = &mut groups[group];
        match entity.kind() {
            EntityKind::Product if product.is_none() => *product = Some(index),
            _ => variants.push(index),
        }
    }

    groups
        .into_iter()
        .flat_map(|(product, variants)| product.into_iter().chain(variants))
        .collect()
}

/// Every structurally valid code already present in `entities`.
///
/// Meant for seeding a registry from a previously published catalog so a new
/// run cannot reissue any of its codes.
pub fn existing_codes(entities: &[CatalogEntity]) -> impl Iterator<Item = Gtin> + '_ {
    entities.iter().filter_map(CatalogEntity::valid_code)
}

/// Whether the code field holds something that is not a valid EAN-13.
/// Missing and blank codes are not malformed.
pub fn has_malformed_code(entity: &CatalogEntity) -> bool {
    match entity.code.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() => !is_valid_ean13(code),
        _ => false,
    }
}
