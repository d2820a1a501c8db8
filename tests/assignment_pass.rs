//! Assignment pass integration tests
//!
//! Runs whole passes through the public API and checks the catalog-wide
//! guarantees: one valid code per entity, no duplicates, reproducible hash
//! runs, and seeded registries forcing retries.

mod common;

use catalog_gtin::prelude::*;
use catalog_gtin::strategy::DeterministicHash;
use common::{assert_all_unique_and_valid, codes, sample_catalog};
use strum::IntoEnumIterator;

fn config_for(strategy: Strategy) -> GenerationConfig {
    GenerationConfig::builder()
        .strategy(strategy)
        .salt("feed-salt")
        .date_prefix("251025")
        .rng_seed(2025)
        .build()
}

#[test_log::test]
fn every_strategy_yields_distinct_valid_codes() {
    for strategy in Strategy::iter() {
        let mut catalog = sample_catalog(100, 3);
        let report = assign_codes(&mut catalog, &config_for(strategy)).unwrap();
        assert_eq!(report.issued, catalog.len(), "{strategy}");
        assert!(report.is_complete(), "{strategy}");
        assert_all_unique_and_valid(&catalog);
    }
}

#[test_log::test]
fn sequence_prefix_scenario() {
    let mut catalog = vec![
        CatalogEntity::product("P1"),
        CatalogEntity::variant("P1", "V1"),
        CatalogEntity::product("P2"),
    ];
    let config = GenerationConfig::builder()
        .strategy(Strategy::SequencePrefix)
        .store_prefix("25")
        .date_prefix("251025")
        .sequence_start(1)
        .build();
    assign_codes(&mut catalog, &config).unwrap();
    assert_eq!(
        codes(&catalog),
        vec!["2525102500015", "2525102500022", "2525102500039"]
    );
    assert_all_unique_and_valid(&catalog);
}

#[test_log::test]
fn deterministic_hash_is_idempotent_across_runs() {
    let config = config_for(Strategy::DeterministicHash);

    let mut first = sample_catalog(50, 2);
    assign_codes(&mut first, &config).unwrap();

    let mut second = sample_catalog(50, 2);
    let report = assign_codes(&mut second, &config).unwrap();

    assert_eq!(report.collisions, 0);
    assert_eq!(codes(&first), codes(&second));
}

#[test_log::test]
fn deterministic_hash_survives_reordering_without_collisions() {
    let config = config_for(Strategy::DeterministicHash);
    let mut forward = sample_catalog(20, 1);
    assign_codes(&mut forward, &config).unwrap();

    let mut reversed: Vec<_> = sample_catalog(20, 1).into_iter().rev().collect();
    assign_codes(&mut reversed, &config).unwrap();
    reversed.reverse();

    assert_eq!(codes(&forward), codes(&reversed));
}

#[test_log::test]
fn seeded_first_candidate_forces_retry() {
    let first_candidate = DeterministicHash::new("feed-salt")
        .unwrap()
        .synthesize(&SynthesisSeed::new("P1"))
        .unwrap()
        .finish();

    let context = GenerationContext::from_config(&config_for(Strategy::DeterministicHash))
        .unwrap()
        .seeded([first_candidate.clone()]);
    let mut pass = AssignmentPass::new(context);
    let mut catalog = vec![CatalogEntity::product("P1")];
    let report = pass.run(&mut catalog).unwrap();

    let assigned = catalog[0].code.as_deref().unwrap();
    assert_ne!(assigned, first_candidate.as_str());
    assert!(is_valid_ean13(assigned));
    assert!(report.collisions >= 1);
}

#[test_log::test]
fn preserved_code_blocks_later_entities() {
    // P2 would be issued 0001 if P1's existing code were not registered first
    let mut catalog = vec![
        CatalogEntity::product("P1").with_code("2525102500015"),
        CatalogEntity::product("P2"),
    ];
    let config = GenerationConfig::builder()
        .store_prefix("25")
        .date_prefix("251025")
        .preserve_valid_existing(true)
        .build();
    let report = assign_codes(&mut catalog, &config).unwrap();

    assert_eq!(catalog[0].code.as_deref(), Some("2525102500015"));
    assert_eq!(catalog[1].code.as_deref(), Some("2525102500022"));
    assert_eq!(report.preserved, 1);
    assert_all_unique_and_valid(&catalog);
}

#[test_log::test]
fn existing_code_survives_entities_issued_before_it() {
    // P0 is processed first and would be issued 0001, which P1 already holds
    let mut catalog = vec![
        CatalogEntity::product("P0"),
        CatalogEntity::product("P1").with_code("2525102500015"),
    ];
    let config = GenerationConfig::builder()
        .store_prefix("25")
        .date_prefix("251025")
        .preserve_valid_existing(true)
        .build();
    let report = assign_codes(&mut catalog, &config).unwrap();

    assert_eq!(catalog[1].code.as_deref(), Some("2525102500015"));
    assert_eq!(catalog[0].code.as_deref(), Some("2525102500022"));
    assert_eq!(report.preserved, 1);
    assert_all_unique_and_valid(&catalog);
}

#[test_log::test]
fn time_stamped_pass_larger_than_one_second_of_tails() {
    let mut catalog = sample_catalog(1500, 0);
    let report = assign_codes(&mut catalog, &config_for(Strategy::TimeStamped)).unwrap();
    assert!(report.is_complete());
    assert_eq!(report.issued, 1500);
    assert_all_unique_and_valid(&catalog);
}

#[test_log::test]
fn cross_run_uniqueness_through_seeding() {
    let config = config_for(Strategy::SequencePrefix);

    let mut published = sample_catalog(10, 1);
    assign_codes(&mut published, &config).unwrap();

    // same store/date/sequence start would reissue the published codes
    let context = GenerationContext::from_config(&config)
        .unwrap()
        .seeded(existing_codes(&published));
    let mut fresh = sample_catalog(10, 1);
    AssignmentPass::new(context).run(&mut fresh).unwrap();

    let mut combined = published.clone();
    combined.extend(fresh);
    assert!(audit_catalog(&combined).is_clean());
}

#[test_log::test]
fn malformed_and_duplicate_existing_codes_are_repaired() {
    let mut catalog = vec![
        CatalogEntity::product("P1").with_code("SD1234567890128"),
        CatalogEntity::variant("P1", "V1").with_code("1234567890128"),
        CatalogEntity::variant("P1", "V2").with_code("1234567890128"),
        CatalogEntity::product("P2").with_code("12345"),
    ];
    let before = audit_catalog(&catalog);
    assert_eq!(before.malformed.len(), 2);
    assert_eq!(before.duplicates.len(), 1);

    let report = assign_codes(&mut catalog, &config_for(Strategy::PureRandom)).unwrap();
    assert_eq!(report.preserved, 1);
    assert_eq!(report.issued, 3);
    assert_eq!(catalog[1].code.as_deref(), Some("1234567890128"));
    assert!(audit_catalog(&catalog).is_clean());
}

#[test_log::test]
fn derived_variant_codes_share_parent_digits() {
    let config = GenerationConfig::builder()
        .strategy(Strategy::SequencePrefix)
        .date_prefix("251025")
        .variant_codes(VariantCodes::DerivedFromParent)
        .build();
    let mut catalog = sample_catalog(5, 3);
    assign_codes(&mut catalog, &config).unwrap();
    assert_all_unique_and_valid(&catalog);

    let product = catalog[0].code.clone().unwrap();
    for variant in &catalog[1..4] {
        let code = variant.code.as_deref().unwrap();
        assert_eq!(&code[..10], &product[..10]);
    }
}
