use crate::registry::{Flags, FlagsInner};
use parking_lot::Mutex;
use private::Sealed;
use std::sync::Arc;
use swb_domain::{BuildMode, LaunchArguments};
use swb_store::SuiteStore;

#[derive(Debug, Clone, Default)]
struct FlagsConfig {
    arguments: Option<LaunchArguments>,
    build_mode: Option<BuildMode>,
}

#[derive(Debug, Default)]
pub struct NoStore;
#[derive(Debug)]
pub struct WithStore(SuiteStore);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoStore {}
impl Sealed for WithStore {}

#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct FlagsBuilder<S: Sealed = NoStore> {
    state: S,
    config: FlagsConfig,
}

#[allow(private_bounds)]
impl<S: Sealed> FlagsBuilder<S> {
    #[must_use = "Sets the launch arguments consulted for flag overrides"]
    pub fn arguments(mut self, arguments: LaunchArguments) -> Self {
        self.config.arguments = Some(arguments);
        self
    }

    #[must_use = "Sets the build mode gating debugging flags"]
    pub const fn build_mode(mut self, mode: BuildMode) -> Self {
        self.config.build_mode = Some(mode);
        self
    }

    fn transition<N: Sealed>(self, state: N) -> FlagsBuilder<N> {
        FlagsBuilder { state, config: self.config }
    }
}

impl FlagsBuilder<NoStore> {
    #[must_use = "Creates a new flags builder with default configuration"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Sets the store holding persisted flag overrides"]
    pub fn store(self, store: SuiteStore) -> FlagsBuilder<WithStore> {
        self.transition(WithStore(store))
    }
}

impl FlagsBuilder<WithStore> {
    /// Consumes the configuration and creates the evaluator.
    ///
    /// Launch arguments default to the live process arguments and the build
    /// mode to the compiled one when not set explicitly. Creation itself
    /// cannot fail: suites are opened lazily, when their first domain is.
    #[must_use]
    pub fn build(self) -> Flags {
        Flags {
            inner: Arc::new(FlagsInner {
                store: self.state.0,
                arguments: self.config.arguments.unwrap_or_else(LaunchArguments::from_env),
                build_mode: self.config.build_mode.unwrap_or(BuildMode::current()),
                domains: Mutex::default(),
            }),
        }
    }
}
