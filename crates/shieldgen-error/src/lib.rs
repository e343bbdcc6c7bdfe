//! # shieldgen-error
//!
//! Unified error handling for shieldgen.
//!
//! - **ErrorKind**: what went wrong (e.g. MalformedDescriptor, InvalidArgument)
//! - **Error Context**: the path, operation and key/value pairs needed to locate the cause
//! - **Error Source**: the underlying error, wrapped without leaking raw types
//!
//! ## Usage
//!
//! ```rust
//! use shieldgen_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::MalformedDescriptor, "unexpected end of stream")
//!         .with_operation("descriptor::load")
//!         .with_context("path", "/src/App/App.csproj"))
//! }
//! ```
//!
//! All operations are local file reads against a stable snapshot, so errors
//! carry no retry status: every failure is final for the current run.

mod error;
mod kind;

pub use error::Error;
pub use kind::ErrorKind;

/// Result type alias using shieldgen Error
pub type Result<T> = std::result::Result<T, Error>;
