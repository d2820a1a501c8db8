pub use crate::assign::{AssignmentFailure, AssignmentPass, AssignmentReport, assign_codes};
pub use crate::audit::{AuditReport, audit_catalog};
pub use crate::catalog::{CatalogEntity, EntityKind, existing_codes};
pub use crate::checksum::{ean13_check_digit, is_valid_ean13};
pub use crate::code::{Gtin, Payload};
pub use crate::config::GenerationConfig;
pub use crate::context::GenerationContext;
pub use crate::error::{GtinError, GtinResult};
pub use crate::registry::{CodeRegistry, SharedRegistry, UniquenessRegistry};
pub use crate::strategy::{CodeSynthesizer, Strategy, SynthesisSeed, Synthesizer, VariantCodes};
