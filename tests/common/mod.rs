// Common test utilities and helpers
#![allow(dead_code)]

use catalog_gtin::prelude::*;
use std::collections::HashSet;

/// `products` products, each followed by `variants_per_product` variants.
pub fn sample_catalog(products: usize, variants_per_product: usize) -> Vec<CatalogEntity> {
    let mut entities = Vec::with_capacity(products * (variants_per_product + 1));
    for p in 0..products {
        let product_id = format!("SD-{p:05}");
        entities.push(CatalogEntity::product(product_id.clone()));
        for v in 0..variants_per_product {
            entities.push(CatalogEntity::variant(
                product_id.clone(),
                format!("{product_id}-{v:02}"),
            ));
        }
    }
    entities
}

/// Panics unless every entity holds a valid code and no two hold the same one.
pub fn assert_all_unique_and_valid(entities: &[CatalogEntity]) {
    let mut seen = HashSet::new();
    for entity in entities {
        let code = entity
            .code
            .as_deref()
            .unwrap_or_else(|| panic!("{entity:?} has no code"));
        assert!(is_valid_ean13(code), "{code} is not a valid EAN-13");
        assert!(seen.insert(code.to_string()), "{code} assigned twice");
    }
}

pub fn codes(entities: &[CatalogEntity]) -> Vec<String> {
    entities.iter().filter_map(|e| e.code.clone()).collect()
}
