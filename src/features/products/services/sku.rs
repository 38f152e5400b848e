//! SKU assignment for products created without one.

use uuid::Uuid;

use crate::shared::constants::{AUTO_SKU_NAME_CHARS, AUTO_SKU_PREFIX, AUTO_SKU_SUFFIX_LEN};

/// Synthesize `AUTO-<first 3 chars of name, upper>-<4 upper hex>`
///
/// The suffix is random, so two calls for the same name almost always differ.
/// Uniqueness is left to the store's constraint.
pub fn auto_sku(name: &str) -> String {
    let prefix: String = name
        .chars()
        .take(AUTO_SKU_NAME_CHARS)
        .collect::<String>()
        .to_uppercase();
    let suffix = Uuid::new_v4().simple().to_string()[..AUTO_SKU_SUFFIX_LEN].to_uppercase();

    format!("{}-{}-{}", AUTO_SKU_PREFIX, prefix, suffix)
}

/// A caller-supplied SKU wins verbatim unless it is blank
pub fn resolve_sku(name: &str, manual: Option<&str>) -> String {
    match manual {
        Some(sku) if !sku.trim().is_empty() => sku.to_string(),
        _ => auto_sku(name),
    }
}
