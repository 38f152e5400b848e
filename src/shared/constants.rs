// =============================================================================
// INTAKE POLICY
// =============================================================================

/// Classifier confidence a return must strictly exceed to be approved
pub const APPROVAL_THRESHOLD: f64 = 0.65;

/// Units recorded per intake; callers cannot override it
pub const RETURNED_QUANTITY: i32 = 1;

/// Prefix of system-assigned SKUs
pub const AUTO_SKU_PREFIX: &str = "AUTO";

/// Characters of the product name used in a synthesized SKU
pub const AUTO_SKU_NAME_CHARS: usize = 3;

/// Length of the random SKU suffix
pub const AUTO_SKU_SUFFIX_LEN: usize = 4;

// =============================================================================
// UPLOADS
// =============================================================================

/// Maximum photo size in bytes (10MB)
pub const MAX_PHOTO_SIZE: usize = 10 * 1024 * 1024;

/// Photo MIME types accepted by the intake endpoint
pub const ALLOWED_PHOTO_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];
