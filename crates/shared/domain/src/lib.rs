//! # Domain Models
//!
//! This crate contains the pure flag model with a single dependency (`serde`).
//! Keep it lean: no I/O, no locking, no heavy logic, just data and simple helpers.

pub mod args;
pub mod constants;
pub mod descriptor;
pub mod mode;
pub mod tag;

pub use args::LaunchArguments;
pub use descriptor::{FlagDefault, FlagDescriptor};
pub use mode::BuildMode;
pub use tag::DomainTag;
