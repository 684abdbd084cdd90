// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use derive_more::Display;
use thiserror::Error;

use crate::Status;

/// A specialized `Result` for file server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that ends a single file server request.
///
/// Rust callers can tell request errors, descriptor failures and filesystem
/// failures apart. The file protocol cannot: [`Error::status`] collapses the
/// error into the single status code that goes on the wire.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The requested path cannot be resolved. No filesystem access was attempted.
    #[error("invalid path: {0}")]
    InvalidPath(#[from] PathError),

    /// A request arrived before the backend was initialized.
    #[error("file server backend is not initialized")]
    NotInitialized,

    /// The backend was initialized more than once.
    #[error("file server backend is already initialized")]
    AlreadyInitialized,

    /// The firmware descriptor subsystem failed, either because the file is
    /// missing or because its descriptor is absent or corrupt.
    #[error("cannot describe firmware image: {0}")]
    Descriptor(#[source] firmware_image::Error),

    /// A filesystem call failed.
    #[error("{operation} failed: {source}")]
    Io {
        /// The call that failed.
        operation: Operation,
        /// The error reported by the operating system.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) const fn io(operation: Operation, source: std::io::Error) -> Self {
        Self::Io { operation, source }
    }

    /// The wire status for this error.
    ///
    /// Request errors and descriptor failures become
    /// [`Status::INVALID_VALUE`]; filesystem failures forward the operating
    /// system error number.
    #[must_use]
    pub fn status(&self) -> Status {
        match self {
            Self::InvalidPath(_) | Self::NotInitialized | Self::AlreadyInitialized | Self::Descriptor(_) => {
                Status::INVALID_VALUE
            }
            Self::Io { source, .. } => Status::from_io_error(source),
        }
    }
}

/// The filesystem call behind an [`Error::Io`].
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[non_exhaustive]
pub enum Operation {
    /// Opening a file for reading.
    #[display("open")]
    Open,
    /// Positioning within an open file.
    #[display("seek")]
    Seek,
    /// Reading from an open file.
    #[display("read")]
    Read,
    /// Creating the cache directories.
    #[display("create directories")]
    CreateDirectories,
}

/// Why a path was rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum PathError {
    /// The path is empty.
    #[error("path is empty")]
    Empty,

    /// The path, or the path combined with its root, exceeds a fixed capacity.
    #[error("path of {len} bytes exceeds the capacity of {capacity} bytes")]
    TooLong {
        /// Length the path would have.
        len: usize,
        /// Capacity it had to fit in.
        capacity: usize,
    },

    /// The path starts at the filesystem root.
    #[error("absolute paths are not permitted")]
    Absolute,

    /// The path contains a `..` component.
    #[error("path escapes the cache directory")]
    Traversal,
}
