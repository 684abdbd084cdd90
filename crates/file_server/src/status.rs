// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

/// A status code as carried in a file protocol response.
///
/// Zero is success; anything else is a failure. Two code spaces share this type:
/// the protocol's own enumeration (the associated constants) and raw operating
/// system error numbers forwarded from failed filesystem calls. They overlap
/// (e.g. [`NOT_FOUND`](Self::NOT_FOUND) is also `ENOENT` on POSIX systems), so
/// callers must not read more into a non-zero value than "the request failed".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Status(i16);

impl Status {
    /// The request succeeded.
    pub const OK: Self = Self(0);
    /// Failure without a more specific code.
    pub const UNKNOWN_ERROR: Self = Self(32767);
    /// The file does not exist.
    pub const NOT_FOUND: Self = Self(2);
    /// The file could not be read or written.
    pub const IO_ERROR: Self = Self(5);
    /// The caller may not access the file.
    pub const ACCESS_DENIED: Self = Self(13);
    /// The path names a directory.
    pub const IS_DIRECTORY: Self = Self(21);
    /// The request carried an unacceptable value, or the file could not be described.
    pub const INVALID_VALUE: Self = Self(22);
    /// The file exceeds a size limit.
    pub const FILE_TOO_LARGE: Self = Self(27);
    /// The storage is full.
    pub const OUT_OF_SPACE: Self = Self(28);
    /// The operation is not supported.
    pub const NOT_IMPLEMENTED: Self = Self(38);

    /// Wraps a raw status value.
    #[must_use]
    pub const fn new(raw: i16) -> Self {
        Self(raw)
    }

    /// Forwards an operating system error number.
    ///
    /// Values that do not fit the 16-bit field become [`UNKNOWN_ERROR`](Self::UNKNOWN_ERROR).
    #[must_use]
    pub fn from_os_error(code: i32) -> Self {
        i16::try_from(code).map_or(Self::UNKNOWN_ERROR, Self)
    }

    /// Forwards the operating system error number carried by `error`, or
    /// [`IO_ERROR`](Self::IO_ERROR) if it carries none.
    #[must_use]
    pub fn from_io_error(error: &std::io::Error) -> Self {
        error.raw_os_error().map_or(Self::IO_ERROR, Self::from_os_error)
    }

    /// The raw value as it goes on the wire.
    #[must_use]
    pub const fn get(self) -> i16 {
        self.0
    }

    /// Returns `true` for [`OK`](Self::OK).
    #[must_use]
    pub const fn is_ok(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Self::OK => "ok",
            Self::UNKNOWN_ERROR => "unknown error",
            Self::NOT_FOUND => "not found",
            Self::IO_ERROR => "I/O error",
            Self::ACCESS_DENIED => "access denied",
            Self::IS_DIRECTORY => "is a directory",
            Self::INVALID_VALUE => "invalid value",
            Self::FILE_TOO_LARGE => "file too large",
            Self::OUT_OF_SPACE => "out of space",
            Self::NOT_IMPLEMENTED => "not implemented",
            _ => return write!(f, "status {}", self.0),
        };
        write!(f, "{name} ({})", self.0)
    }
}

impl From<Status> for i16 {
    fn from(status: Status) -> Self {
        status.0
    }
}

bitflags::bitflags! {
    /// The kind and access rights of a file system entry.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EntryType: u8 {
        /// A regular file.
        const FILE = 1;
        /// A directory.
        const DIRECTORY = 2;
        /// A symbolic link.
        const SYMLINK = 4;
        /// The entry may be read.
        const READABLE = 8;
        /// The entry may be written.
        const WRITEABLE = 16;
    }
}
