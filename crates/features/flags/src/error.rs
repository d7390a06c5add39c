use std::borrow::Cow;

/// A specialized [`FlagError`] enum of this crate.
#[swb_derive::swb_error]
pub enum FlagError {
    #[error("Flag store failure{}: {source}", format_context(context))]
    Store { source: swb_store::StoreError, context: Option<Cow<'static, str>> },

    #[error("Internal flags error{}: {message}", format_context(context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
