//! Query error types
//!
//! Re-exports gqlopt-error; everything in this crate returns its `Result`.

pub use gqlopt_error::{Error, ErrorKind, ErrorStatus, Result};
