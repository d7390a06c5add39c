use swb_domain::{BuildMode, DomainTag, FlagDescriptor, LaunchArguments};

/// Resolves a flag to a boolean by strict source precedence.
///
/// Evaluated in order, first match wins:
/// 1. A debugging flag in a release build is `false`, unconditionally.
/// 2. `--disable-<key>` in the launch arguments forces `false`.
/// 3. `--enable-<key>` in the launch arguments forces `true`.
/// 4. A priority value (the currently persisted override) is returned as is.
/// 5. The descriptor's default, evaluated at this moment.
///
/// Launch arguments therefore outrank persisted overrides, and both are
/// outranked by the release-mode debugging restriction.
pub(crate) fn resolve(
    descriptor: &FlagDescriptor,
    arguments: &LaunchArguments,
    build_mode: BuildMode,
    priority: Option<bool>,
) -> bool {
    if descriptor.tag() == DomainTag::Debugging && !build_mode.allows_debugging() {
        return false;
    }

    let key = descriptor.key();
    if arguments.disables(key) {
        return false;
    }
    if arguments.enables(key) {
        return true;
    }

    if let Some(value) = priority {
        return value;
    }

    descriptor.default_value()
}
