// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use thiserror::Error;

/// A specialized `Result` for firmware image operations.
pub type Result<T> = std::result::Result<T, Error>;

/// An error raised while laying out the firmware cache or reading an image descriptor.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A path did not fit in its fixed-capacity buffer.
    #[error("path does not fit in {capacity} bytes")]
    PathTooLong {
        /// The capacity of the buffer that overflowed.
        capacity: usize,
    },

    /// The cache directory name is not a single plain directory name, so the
    /// cache would not sit directly under the base directory.
    #[error("invalid cache directory name {name:?}")]
    InvalidCacheDirName {
        /// The rejected name.
        name: String,
    },

    /// The image does not contain an application descriptor signature on any
    /// 8-byte aligned offset.
    #[error("application descriptor signature not found")]
    SignatureNotFound,

    /// The signature was found but the file ends before the descriptor does.
    #[error("application descriptor at offset {offset} is truncated")]
    Truncated {
        /// Byte offset of the signature within the image.
        offset: u64,
    },

    /// The descriptor claims the image is larger than the file holding it.
    #[error("declared image size {declared} exceeds file size {actual}")]
    ImageSizeMismatch {
        /// Image size recorded in the descriptor.
        declared: u32,
        /// Length of the file on disk.
        actual: u64,
    },

    /// We are forwarding an error received from the standard library's I/O APIs.
    #[error(transparent)]
    StdIo(#[from] std::io::Error),
}

impl Error {
    /// Returns the operating system error code carried by this error, if any.
    #[must_use]
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Self::StdIo(e) => e.raw_os_error(),
            _ => None,
        }
    }
}
