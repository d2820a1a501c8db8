//! Variant payloads derived from their product's payload.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::code::Payload;

/// How variants get their codes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum VariantCodes {
    /// Variants go through the configured strategy like products.
    #[default]
    Independent,
    /// Variants reuse their product's first 10 digits plus a 2-digit suffix,
    /// falling back to the strategy once all suffixes collide.
    DerivedFromParent,
}

/// Number of leading parent digits a derived payload keeps.
pub const PARENT_DIGITS: usize = 10;

/// Highest suffix a derived payload can carry.
pub const MAX_SUFFIX: u8 = 99;

/// First 10 digits of `parent` followed by a 2-digit `suffix`.
///
/// Returns `None` for suffix 0 or above [`MAX_SUFFIX`].
pub fn derive_from_parent(parent: &Payload, suffix: u8) -> Option<Payload> {
    if suffix == 0 || suffix > MAX_SUFFIX {
        return None;
    }
    let digits = format!("{}{:02}", &parent.as_str()[..PARENT_DIGITS], suffix);
    Payload::new(digits).ok()
}
