//! Error kinds for shieldgen operations

use strum_macros::{Display, IntoStaticStr};

/// The kind of error that occurred.
///
/// Callers match on `ErrorKind` to decide whether a failure is reported to
/// the user, tolerated, or aborts the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // General errors
    // =========================================================================
    /// Invalid configuration file or configuration value
    ConfigInvalid,

    /// Invalid argument, including a missing or unusable entry project
    InvalidArgument,

    // =========================================================================
    // Descriptor / markup errors
    // =========================================================================
    /// A project descriptor could not be parsed as a document
    MalformedDescriptor,

    /// The code-behind file paired with a markup file does not exist
    MissingPairedFile,

    // =========================================================================
    // File/IO errors
    // =========================================================================
    /// File not found
    FileNotFound,

    /// Permission denied
    PermissionDenied,

    /// IO operation failed
    IoFailed,

    /// Directory traversal failed
    TraversalFailed,

    // =========================================================================
    // Output errors
    // =========================================================================
    /// Rendering the manifest failed
    SerializationFailed,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }
}
