use crate::constants::{DISABLE_PREFIX, ENABLE_PREFIX};

/// Read-only capture of process launch arguments.
///
/// Queried for exact `--enable-<key>` / `--disable-<key>` token membership.
/// Tokens are matched verbatim: no prefix matching, no `=` forms.
#[derive(Debug, Clone, Default)]
pub struct LaunchArguments {
    tokens: Vec<String>,
}

impl LaunchArguments {
    /// Capture the live process arguments (program name excluded).
    #[must_use]
    pub fn from_env() -> Self {
        Self { tokens: std::env::args().skip(1).collect() }
    }

    /// An empty argument list.
    #[must_use]
    pub const fn empty() -> Self {
        Self { tokens: Vec::new() }
    }

    /// Whether `--enable-<key>` is present.
    #[must_use]
    pub fn enables(&self, key: &str) -> bool {
        self.contains_token(ENABLE_PREFIX, key)
    }

    /// Whether `--disable-<key>` is present.
    #[must_use]
    pub fn disables(&self, key: &str) -> bool {
        self.contains_token(DISABLE_PREFIX, key)
    }

    /// The captured tokens, in order.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    fn contains_token(&self, prefix: &str, key: &str) -> bool {
        self.tokens
            .iter()
            .any(|token| token.strip_prefix(prefix).is_some_and(|rest| rest == key))
    }
}

impl<T: Into<String>> FromIterator<T> for LaunchArguments {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { tokens: iter.into_iter().map(Into::into).collect() }
    }
}
