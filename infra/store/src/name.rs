use crate::error::StoreError;

/// Validates a suite name.
///
/// Suites name files on disk, so the charset is restricted to ASCII
/// alphanumerics plus `.`, `-` and `_`. Case is preserved: `Main` and `main`
/// are distinct suites.
pub(crate) fn validate_suite(name: &str) -> Result<(), StoreError> {
    validate(name, "Suite")
}

/// Validates a domain key within a suite. Same charset as suite names.
pub(crate) fn validate_domain_key(name: &str) -> Result<(), StoreError> {
    validate(name, "Domain key")
}

fn validate(name: &str, kind: &str) -> Result<(), StoreError> {
    if name.is_empty() {
        return Err(StoreError::InvalidName {
            message: "EMPTY".into(),
            context: Some(format!("{kind} cannot be empty").into()),
        });
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')) {
        return Err(StoreError::InvalidName {
            message: name.to_owned().into(),
            context: Some(format!("{kind} contains illegal characters").into()),
        });
    }

    Ok(())
}
