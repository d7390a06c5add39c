use serde::{Deserialize, Serialize};

/// Build flavor the running binary was compiled as.
///
/// Debugging flags resolve to `false` whenever the mode is
/// [`Release`](Self::Release). The mode is an explicit value rather than a
/// buried `cfg!` so release behavior stays testable from debug test binaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    /// Mode of the running binary, from the `debug_assertions` marker.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(debug_assertions) { Self::Debug } else { Self::Release }
    }

    /// Whether debugging flags may resolve to `true` under this mode.
    #[must_use]
    pub const fn allows_debugging(self) -> bool {
        matches!(self, Self::Debug)
    }
}
