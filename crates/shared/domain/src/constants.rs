//! Wire-level string constants shared across the workspace.

/// Suite sub-dictionary holding feature flag overrides.
pub const FEATURE_FLAGS: &str = "feature-flags";
/// Suite sub-dictionary holding debugging flag overrides.
pub const DEBUG_FLAGS: &str = "debug-flags";

/// Launch-argument prefix that forces a flag on.
pub const ENABLE_PREFIX: &str = "--enable-";
/// Launch-argument prefix that forces a flag off.
pub const DISABLE_PREFIX: &str = "--disable-";
