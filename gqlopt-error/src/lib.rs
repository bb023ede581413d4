//! # gqlopt-error
//!
//! Unified error handling for gqlopt, following OpenDAL's error handling practices.
//!
//! ## Design Philosophy
//!
//! - **ErrorKind**: Know what error occurred (e.g., InvalidOption, DecodeFailed)
//! - **ErrorStatus**: Decide how to handle it (Permanent, Temporary)
//! - **Error Context**: Assist in locating the cause with rich context
//! - **Error Source**: Wrap underlying errors without leaking raw types
//!
//! ## Usage
//!
//! ```rust
//! use gqlopt_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::InvalidOption, "option carries no decoder")
//!         .with_operation("options::resolve")
//!         .with_context("option_type", "custom_error_decoder"))
//! }
//! ```
//!
//! ## Principles
//!
//! - All functions return `Result<T, gqlopt_error::Error>`
//! - External errors are wrapped with `set_source(err)`
//! - Same error handled once, subsequent ops only append context
//! - Don't abuse `From<OtherError>` to prevent raw error leakage

mod error;
mod kind;
mod status;

pub use error::Error;
pub use kind::ErrorKind;
pub use status::ErrorStatus;

/// Result type alias using gqlopt Error
pub type Result<T> = std::result::Result<T, Error>;
