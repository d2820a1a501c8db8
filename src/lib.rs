//! # Catalog GTIN
//!
//! Collision-free EAN-13 assignment for product catalogs.
//!
//! A catalog migration hands over products and their variants, some with
//! codes, some without, some with codes that are malformed or duplicated. An
//! [`AssignmentPass`](assign::AssignmentPass) walks them parent-first, keeps
//! the codes worth keeping, and issues fresh ones so that every entity ends up
//! with exactly one valid code and no two entities share one.
//!
//! ## Features
//!
//! - **Checksum**: standard EAN-13 check digit, strict input validation
//! - **Strategies**: deterministic hash, store/date/sequence, pure random,
//!   timestamped, and variant codes derived from the product's code
//! - **Uniqueness**: per-run registry, optionally seeded from earlier catalogs,
//!   with a lock-protected variant for shared use
//! - **Audit**: duplicate, malformed and missing code detection
//!
//! ## Quick Start
//!
//! ```
//! use catalog_gtin::prelude::*;
//!
//! let config = GenerationConfig::builder()
//!     .strategy(Strategy::SequencePrefix)
//!     .store_prefix("25")
//!     .date_prefix("251025")
//!     .build();
//!
//! let mut catalog = vec![
//!     CatalogEntity::product("P1"),
//!     CatalogEntity::variant("P1", "V1"),
//!     CatalogEntity::product("P2"),
//! ];
//!
//! let report = assign_codes(&mut catalog, &config)?;
//! assert_eq!(report.issued, 3);
//! assert_eq!(catalog[0].code.as_deref(), Some("2525102500015"));
//! assert!(audit_catalog(&catalog).is_clean());
//! # Ok::<(), GtinError>(())
//! ```

pub mod assign;
pub mod audit;
pub mod catalog;
pub mod checksum;
pub mod code;
pub mod config;
pub mod context;
pub mod error;
pub mod prelude;
pub mod registry;
pub mod strategy;

pub use error::{GtinError, GtinResult};
