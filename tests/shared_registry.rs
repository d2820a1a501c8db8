//! Several workers assigning disjoint slices of one catalog against a single
//! shared registry.

mod common;

use catalog_gtin::prelude::*;
use catalog_gtin::strategy::PureRandom;
use common::{assert_all_unique_and_valid, sample_catalog};
use std::thread;

#[test_log::test]
fn workers_never_issue_the_same_code() {
    let registry = SharedRegistry::new();
    let mut catalog = sample_catalog(400, 2);

    thread::scope(|scope| {
        for (worker, chunk) in catalog.chunks_mut(150).enumerate() {
            let registry = registry.clone();
            scope.spawn(move || {
                // same RNG seed everywhere: workers propose identical candidates
                let context = GenerationContext::with_registry(PureRandom::seeded(1), registry);
                let report = AssignmentPass::new(context).run(chunk).unwrap();
                assert!(report.is_complete(), "worker {worker}");
            });
        }
    });

    assert_all_unique_and_valid(&catalog);
    assert_eq!(registry.len(), catalog.len());
}
