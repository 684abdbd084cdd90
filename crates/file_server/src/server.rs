// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::path::{FilePath, file_path};
use crate::{EntryType, FileServerBackend, PathError, Status};

/// Largest payload a single read response carries.
pub const MAX_READ_SIZE: usize = 256;

/// A decoded request for the metadata of a file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GetInfoRequest {
    /// Path of the file, relative to the served directory.
    pub path: FilePath,
}

impl GetInfoRequest {
    /// Creates a request for `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::TooLong`] if `path` does not fit in a [`FilePath`].
    pub fn new(path: &str) -> Result<Self, PathError> {
        Ok(Self { path: file_path(path)? })
    }
}

/// The answer to a [`GetInfoRequest`].
///
/// On failure only `error` is meaningful; the other fields are zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GetInfoResponse {
    /// Outcome of the request.
    pub error: Status,
    /// Image checksum.
    pub crc64: u64,
    /// Image size in bytes.
    pub size: u32,
    /// Kind and access rights of the entry.
    pub entry_type: EntryType,
}

/// A decoded request for a chunk of a file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadRequest {
    /// Path of the file, relative to the served directory.
    pub path: FilePath,
    /// Byte offset of the chunk.
    pub offset: u32,
}

impl ReadRequest {
    /// Creates a request for the chunk of `path` starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::TooLong`] if `path` does not fit in a [`FilePath`].
    pub fn new(path: &str, offset: u32) -> Result<Self, PathError> {
        Ok(Self {
            path: file_path(path)?,
            offset,
        })
    }
}

/// The answer to a [`ReadRequest`].
///
/// A successful response with less data than the server's read size marks the
/// end of the file. On failure `data` is empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReadResponse {
    /// Outcome of the request.
    pub error: Status,
    /// The chunk read.
    pub data: heapless::Vec<u8, MAX_READ_SIZE>,
}

/// Answers decoded file protocol requests from a [`FileServerBackend`].
///
/// This is the piece a transport calls once it has decoded a request; it fills
/// in the response exactly as it goes back on the wire.
///
/// # Examples
///
/// ```no_run
/// use file_server::{BasicFileServerBackend, FileServer, ReadRequest};
///
/// # fn example() -> anyhow::Result<()> {
/// let backend = BasicFileServerBackend::new();
/// backend.initialize("/var/lib/fw")?;
/// let server = FileServer::new(backend);
///
/// let mut offset = 0;
/// loop {
///     let response = server.handle_read(&ReadRequest::new("node.bin", offset)?);
///     if !response.error.is_ok() {
///         break;
///     }
///     offset += response.data.len() as u32;
///     if response.data.len() < server.max_read_size() {
///         break; // end of file
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FileServer<B> {
    backend: B,
    max_read_size: usize,
}

impl<B: FileServerBackend> FileServer<B> {
    /// Creates a server that reads [`MAX_READ_SIZE`] bytes per request.
    #[must_use]
    pub const fn new(backend: B) -> Self {
        Self {
            backend,
            max_read_size: MAX_READ_SIZE,
        }
    }

    /// Sets how many bytes each read request asks the backend for.
    ///
    /// The value is clamped to `1..=MAX_READ_SIZE`.
    #[must_use]
    pub fn with_max_read_size(mut self, max_read_size: usize) -> Self {
        self.max_read_size = max_read_size.clamp(1, MAX_READ_SIZE);
        self
    }

    /// How many bytes each read request asks the backend for.
    #[must_use]
    pub const fn max_read_size(&self) -> usize {
        self.max_read_size
    }

    /// The backend requests are forwarded to.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Answers a metadata request.
    #[must_use]
    pub fn handle_get_info(&self, request: &GetInfoRequest) -> GetInfoResponse {
        match self.backend.get_info(&request.path) {
            Ok(info) => GetInfoResponse {
                error: Status::OK,
                crc64: info.crc64,
                size: info.size,
                entry_type: info.entry_type,
            },
            Err(e) => GetInfoResponse {
                error: e.status(),
                ..GetInfoResponse::default()
            },
        }
    }

    /// Answers a read request.
    #[must_use]
    pub fn handle_read(&self, request: &ReadRequest) -> ReadResponse {
        let mut response = ReadResponse::default();
        // max_read_size never exceeds the capacity, so this cannot fail.
        let _ = response.data.resize(self.max_read_size, 0);

        match self.backend.read(&request.path, request.offset, &mut response.data) {
            Ok(delivered) if delivered <= self.max_read_size => response.data.truncate(delivered),
            Ok(_) => {
                response.data.clear();
                response.error = Status::UNKNOWN_ERROR;
            }
            Err(e) => {
                response.data.clear();
                response.error = e.status();
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, FileInfo, Result};

    /// Serves a fixed in-memory file named `data.bin`.
    struct Fixed(Vec<u8>);

    impl FileServerBackend for Fixed {
        fn get_info(&self, path: &str) -> Result<FileInfo> {
            if path != "data.bin" {
                return Err(Error::NotInitialized);
            }
            Ok(FileInfo {
                crc64: 7,
                size: u32::try_from(self.0.len()).expect("small"),
                entry_type: EntryType::FILE | EntryType::READABLE,
            })
        }

        fn read(&self, _path: &str, offset: u32, buf: &mut [u8]) -> Result<usize> {
            let start = (offset as usize).min(self.0.len());
            let end = (start + buf.len()).min(self.0.len());
            buf[..end - start].copy_from_slice(&self.0[start..end]);
            Ok(end - start)
        }
    }

    /// Claims to have delivered more than it was asked for.
    struct Overreporting;

    impl FileServerBackend for Overreporting {
        fn get_info(&self, _path: &str) -> Result<FileInfo> {
            Ok(FileInfo::default())
        }

        fn read(&self, _path: &str, _offset: u32, buf: &mut [u8]) -> Result<usize> {
            Ok(buf.len() + 1)
        }
    }

    #[test]
    fn get_info_success_fills_fields() {
        let server = FileServer::new(Fixed(vec![1; 10]));
        let response = server.handle_get_info(&GetInfoRequest::new("data.bin").expect("fits"));
        assert_eq!(response.error, Status::OK);
        assert_eq!(response.crc64, 7);
        assert_eq!(response.size, 10);
    }

    #[test]
    fn get_info_failure_leaves_fields_zero() {
        let server = FileServer::new(Fixed(vec![1; 10]));
        let response = server.handle_get_info(&GetInfoRequest::new("other.bin").expect("fits"));
        assert_eq!(response.error, Status::INVALID_VALUE);
        assert_eq!(response.crc64, 0);
        assert_eq!(response.size, 0);
        assert_eq!(response.entry_type, EntryType::empty());
    }

    #[test]
    fn read_requests_full_chunk() {
        let server = FileServer::new(Fixed(vec![3; 1000]));
        let response = server.handle_read(&ReadRequest::new("data.bin", 0).expect("fits"));
        assert_eq!(response.error, Status::OK);
        assert_eq!(response.data.len(), MAX_READ_SIZE);
    }

    #[test]
    fn short_response_marks_end_of_file() {
        let server = FileServer::new(Fixed((0..=99).collect()));
        let response = server.handle_read(&ReadRequest::new("data.bin", 90).expect("fits"));
        assert_eq!(response.error, Status::OK);
        assert_eq!(response.data.as_slice(), &[90, 91, 92, 93, 94, 95, 96, 97, 98, 99]);
    }

    #[test]
    fn custom_read_size_is_clamped() {
        let server = FileServer::new(Fixed(vec![0; 10])).with_max_read_size(4);
        assert_eq!(server.max_read_size(), 4);
        let response = server.handle_read(&ReadRequest::new("data.bin", 0).expect("fits"));
        assert_eq!(response.data.len(), 4);

        assert_eq!(
            FileServer::new(Fixed(Vec::new())).with_max_read_size(0).max_read_size(),
            1
        );
        assert_eq!(
            FileServer::new(Fixed(Vec::new())).with_max_read_size(10_000).max_read_size(),
            MAX_READ_SIZE
        );
    }

    #[test]
    fn overreported_size_is_unknown_error() {
        let server = FileServer::new(Overreporting);
        let response = server.handle_read(&ReadRequest::new("data.bin", 0).expect("fits"));
        assert_eq!(response.error, Status::UNKNOWN_ERROR);
        assert!(response.data.is_empty());
    }

    #[test]
    fn request_paths_are_bounded() {
        assert!(GetInfoRequest::new(&"p".repeat(201)).is_err());
        assert!(ReadRequest::new(&"p".repeat(200), 0).is_ok());
    }
}
