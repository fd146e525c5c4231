/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// FALLBACK LABELS
// =============================================================================

/// Shown when a maintenance log points at equipment that no longer exists
pub const UNKNOWN_EQUIPMENT: &str = "Unknown Equipment";

/// Shown when a return points at an order or product that no longer exists
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// Shown when a mission report's reporter or incident is gone
pub const UNKNOWN: &str = "Unknown";
