#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the infrastructure.
//! This crate provides the attribute macro every workspace error enum is built
//! with, so error types stay uniform across crates: one `Debug + thiserror`
//! enum per crate, a `context` slot on every variant, and a generated
//! extension trait for attaching that context at the call site.
//!
//! ## Usage
//! Add the crate under `dependencies` inside the workspace:
//! ```toml
//! [dependencies]
//! swb-derive = { path = "../infra/derive" }
//! ```

mod error;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// A high-level attribute macro for defining domain-specific error enums.
///
/// Transforms a plain enum into a fully-featured error type wired for the
/// workspace conventions.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` unless
///   already present.
/// * **Context Support**: Generates a companion `...Ext` trait that adds
///   `.context(...)` to any `Result` carrying this error type (or one of its
///   source error types).
/// * **Standard Conversions**: Implements `From<T>` for variants containing a
///   `source` field, enabling the `?` operator for upstream errors.
/// * **Internal Fallback**: Provides `From<&'static str>` and `From<String>`
///   when an `Internal` variant is present.
/// * **Display Helper**: Emits a module-local `format_context` function for use
///   inside `#[error(...)]` display strings.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum**.
/// 2. Every variant must use named fields and carry a
///    `context: Option<Cow<'static, str>>` field.
/// 3. Variants wrapping upstream errors must include a `source: T` field or a
///    field marked with `#[source]`/`#[from]` (compatible with `thiserror`).
///
/// # Example
///
/// ```rust,ignore
/// use swb_derive::swb_error;
/// use std::borrow::Cow;
///
/// #[swb_error]
/// pub enum StoreError {
///     #[error("IO error{}: {source}", format_context(context))]
///     Io {
///         #[source]
///         source: std::io::Error,
///         context: Option<Cow<'static, str>>,
///     },
///
///     #[error("Internal fault{}: {message}", format_context(context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// // Usage:
/// fn load(path: &std::path::Path) -> Result<Vec<u8>, StoreError> {
///     std::fs::read(path).context("Loading suite file")
/// }
/// ```
#[proc_macro_attribute]
pub fn swb_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    error::expand(input).into()
}
