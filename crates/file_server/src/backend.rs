// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::{Arc, OnceLock};

use firmware_image::{AppDescriptorImages, BasePathString, FirmwareImages, MAX_BASE_PATH_LEN, PathString};
use tracing::{Level, event};

use crate::metadata::file_info;
use crate::reader::read_at;
use crate::{BackendOptions, Error, FileInfo, Operation, PathError, Result};

/// The calls a file protocol layer makes to serve remote file requests.
///
/// Calls are synchronous and run to completion. Implementations must not keep
/// per-request state between calls, so that a transport may issue them from
/// several threads at once.
pub trait FileServerBackend {
    /// Describes the file at `path`, relative to the served directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is invalid or the file cannot be described.
    fn get_info(&self, path: &str) -> Result<FileInfo>;

    /// Reads up to `buf.len()` bytes of the file at `path`, starting at `offset`.
    ///
    /// Returns the number of bytes placed at the front of `buf`. This equals
    /// `buf.len()` unless the end of the file falls inside the requested
    /// window, so a short count signals end of file.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is invalid or the file cannot be opened,
    /// positioned or read.
    fn read(&self, path: &str, offset: u32, buf: &mut [u8]) -> Result<usize>;
}

impl<T: FileServerBackend + ?Sized> FileServerBackend for &T {
    fn get_info(&self, path: &str) -> Result<FileInfo> {
        (**self).get_info(path)
    }

    fn read(&self, path: &str, offset: u32, buf: &mut [u8]) -> Result<usize> {
        (**self).read(path, offset, buf)
    }
}

impl<T: FileServerBackend + ?Sized> FileServerBackend for Arc<T> {
    fn get_info(&self, path: &str) -> Result<FileInfo> {
        (**self).get_info(path)
    }

    fn read(&self, path: &str, offset: u32, buf: &mut [u8]) -> Result<usize> {
        (**self).read(path, offset, buf)
    }
}

#[derive(Debug)]
struct Configured {
    base: BasePathString,
    cache_root: PathString,
}

/// Serves firmware images from a cache directory on the local filesystem.
///
/// The backend is configured once through [`initialize`](Self::initialize) and is
/// immutable from then on. Every request resolves its own path and opens its own
/// file handle, so a backend may be shared between threads without locking.
///
/// # Examples
///
/// ```no_run
/// use file_server::{BasicFileServerBackend, FileServerBackend};
///
/// # fn example() -> file_server::Result<()> {
/// let backend = BasicFileServerBackend::new();
/// backend.initialize("/var/lib/fw")?;
///
/// let info = backend.get_info("node.bin")?;
/// let mut chunk = [0_u8; 256];
/// let delivered = backend.read("node.bin", 0, &mut chunk)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BasicFileServerBackend<I = AppDescriptorImages> {
    images: I,
    configured: OnceLock<Configured>,
}

impl BasicFileServerBackend {
    /// Creates an uninitialized backend with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(&BackendOptions::default())
    }

    /// Creates an uninitialized backend with the given options.
    #[must_use]
    pub fn with_options(options: &BackendOptions) -> Self {
        Self::with_images(AppDescriptorImages::new(options.cache_dir_name()))
    }
}

impl Default for BasicFileServerBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: FirmwareImages> BasicFileServerBackend<I> {
    /// Creates an uninitialized backend that locates and describes images through `images`.
    #[must_use]
    pub const fn with_images(images: I) -> Self {
        Self {
            images,
            configured: OnceLock::new(),
        }
    }

    /// Roots the backend at `base_directory` and creates the cache directories
    /// beneath it.
    ///
    /// The base directory is recorded even if the directories cannot be
    /// created; it can be set only once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if `base_directory` is empty or longer than
    /// [`MAX_BASE_PATH_LEN`], [`Error::Descriptor`] if no cache root can be
    /// derived from it, [`Error::AlreadyInitialized`] on a second call, and
    /// [`Error::Io`] if the directories cannot be created.
    pub fn initialize(&self, base_directory: &str) -> Result<()> {
        if base_directory.is_empty() {
            return Err(PathError::Empty.into());
        }

        let mut base = BasePathString::new();
        base.push_str(base_directory).map_err(|()| PathError::TooLong {
            len: base_directory.len(),
            capacity: MAX_BASE_PATH_LEN,
        })?;

        let cache_root = self.images.cache_root(&base).map_err(Error::Descriptor)?;

        if self.configured.set(Configured { base, cache_root }).is_err() {
            event!(Level::WARN, base_directory, "file server backend is already initialized");
            return Err(Error::AlreadyInitialized);
        }

        self.images.ensure_paths(base_directory).map_err(|e| match e {
            firmware_image::Error::StdIo(source) => Error::io(Operation::CreateDirectories, source),
            other => Error::Descriptor(other),
        })?;

        event!(
            Level::INFO,
            base_directory,
            cache_root = self.cache_root().unwrap_or_default(),
            "file server backend initialized"
        );
        Ok(())
    }

    /// The configured base directory, once initialized.
    #[must_use]
    pub fn base_directory(&self) -> Option<&str> {
        self.configured.get().map(|c| c.base.as_str())
    }

    /// The directory files are served from, once initialized.
    #[must_use]
    pub fn cache_root(&self) -> Option<&str> {
        self.configured.get().map(|c| c.cache_root.as_str())
    }

    fn resolve(&self, path: &str) -> Result<PathString> {
        self.configured
            .get()
            .ok_or(Error::NotInitialized)
            .and_then(|configured| crate::path::resolve(&configured.cache_root, path).map_err(Error::from))
            .inspect_err(|e| {
                event!(Level::WARN, path, error = %e, "rejected file request");
            })
    }
}

impl<I: FirmwareImages> FileServerBackend for BasicFileServerBackend<I> {
    fn get_info(&self, path: &str) -> Result<FileInfo> {
        let resolved = self.resolve(path)?;
        file_info(&self.images, &resolved)
            .inspect(|info| {
                event!(
                    Level::DEBUG,
                    path,
                    crc64 = info.crc64,
                    size = info.size,
                    "described firmware image"
                );
            })
            .inspect_err(|e| {
                event!(Level::WARN, path, status = e.status().get(), error = %e, "get info failed");
            })
    }

    fn read(&self, path: &str, offset: u32, buf: &mut [u8]) -> Result<usize> {
        let resolved = self.resolve(path)?;
        let requested = buf.len();
        read_at(&resolved, offset, buf)
            .inspect(|&delivered| {
                event!(Level::DEBUG, path, offset, requested, delivered, "read chunk");
            })
            .inspect_err(|e| {
                event!(Level::WARN, path, offset, status = e.status().get(), error = %e, "read failed");
            })
    }
}
