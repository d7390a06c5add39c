use crate::tag::DomainTag;
use std::borrow::Cow;
use std::fmt;

/// Default value of a flag when no higher-precedence source applies.
#[derive(Clone, Copy)]
pub enum FlagDefault {
    /// A fixed boolean.
    Fixed(bool),
    /// A supplier evaluated on every resolution; it may read process state
    /// such as the debug-build marker.
    Computed(fn() -> bool),
}

impl FlagDefault {
    /// Evaluate the default at this moment.
    #[must_use]
    pub fn evaluate(&self) -> bool {
        match self {
            Self::Fixed(value) => *value,
            Self::Computed(supplier) => supplier(),
        }
    }
}

impl fmt::Debug for FlagDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// An immutable value identifying a single boolean flag.
///
/// Declared once per flag and reused on every evaluation. The `const`
/// constructors let descriptors live in statics next to the code they gate:
///
/// ```
/// use swb_domain::{DomainTag, FlagDescriptor};
///
/// static DROP_SPAM: FlagDescriptor =
///     FlagDescriptor::fixed("drop-spam", DomainTag::Feature, true);
/// ```
///
/// Equality follows (key, tag, evaluated default): two descriptors compare
/// equal when their identities match and their defaults agree at this moment.
/// Since a computed default need not be stable, the type is deliberately not
/// `Eq` or `Hash`.
#[derive(Debug, Clone)]
pub struct FlagDescriptor {
    key: Cow<'static, str>,
    tag: DomainTag,
    default: FlagDefault,
}

impl FlagDescriptor {
    /// Declare a flag with a runtime-built key.
    #[must_use]
    pub fn new(key: impl Into<Cow<'static, str>>, tag: DomainTag, default: FlagDefault) -> Self {
        Self { key: key.into(), tag, default }
    }

    /// Declare a flag with a fixed default.
    #[must_use]
    pub const fn fixed(key: &'static str, tag: DomainTag, default: bool) -> Self {
        Self { key: Cow::Borrowed(key), tag, default: FlagDefault::Fixed(default) }
    }

    /// Declare a flag whose default is computed on every resolution.
    #[must_use]
    pub const fn computed(key: &'static str, tag: DomainTag, default: fn() -> bool) -> Self {
        Self { key: Cow::Borrowed(key), tag, default: FlagDefault::Computed(default) }
    }

    /// Flag key, unique within a domain tag.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn tag(&self) -> DomainTag {
        self.tag
    }

    /// The declared default source, unevaluated.
    #[must_use]
    pub const fn default_source(&self) -> &FlagDefault {
        &self.default
    }

    /// Evaluate the declared default at this moment.
    #[must_use]
    pub fn default_value(&self) -> bool {
        self.default.evaluate()
    }
}

impl PartialEq for FlagDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.tag == other.tag
            && self.default_value() == other.default_value()
    }
}
