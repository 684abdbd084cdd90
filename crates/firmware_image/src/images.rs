// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fs::File;
use std::path::Path;

use tracing::{Level, event};

use crate::paths::{DEFAULT_CACHE_DIR_NAME, PathString};
use crate::{AppDescriptor, Error, Result};

/// Reads the application descriptor of the image stored at `path`.
///
/// The declared image size is checked against the file length; the checksum is
/// returned as recorded and is not recomputed.
///
/// # Errors
///
/// Returns [`Error::StdIo`] if the file cannot be opened or read, any error of
/// [`AppDescriptor::scan`], or [`Error::ImageSizeMismatch`] if the descriptor
/// claims more bytes than the file holds.
pub fn describe(path: &Path) -> Result<AppDescriptor> {
    let file = File::open(path)?;
    let actual = file.metadata()?.len();
    let descriptor = AppDescriptor::scan(file)?;

    if u64::from(descriptor.image_size) > actual {
        return Err(Error::ImageSizeMismatch {
            declared: descriptor.image_size,
            actual,
        });
    }

    Ok(descriptor)
}

/// Everything a file server needs to know about where firmware images live and
/// how to describe them.
///
/// [`AppDescriptorImages`] is the on-disk implementation. Implementations must
/// be safe to call from several threads at once.
pub trait FirmwareImages: Send + Sync {
    /// Derives the cache root for `base`. Must be pure and deterministic.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache root does not fit in a [`PathString`].
    fn cache_root(&self, base: &str) -> Result<PathString>;

    /// Describes the image stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or unreadable, or if it does not
    /// carry a valid descriptor.
    fn describe(&self, path: &Path) -> Result<AppDescriptor>;

    /// Creates the directories needed to hold cached images under `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created.
    fn ensure_paths(&self, base: &str) -> Result<()>;
}

/// Firmware images cached on the local filesystem, described by their embedded
/// [`AppDescriptor`].
#[derive(Clone, Debug)]
pub struct AppDescriptorImages {
    cache_dir_name: String,
}

impl AppDescriptorImages {
    /// Creates an instance that keeps images in the `cache_dir_name` subdirectory
    /// of the base directory.
    #[must_use]
    pub fn new(cache_dir_name: impl Into<String>) -> Self {
        Self {
            cache_dir_name: cache_dir_name.into(),
        }
    }

    /// The name of the cache subdirectory.
    #[must_use]
    pub fn cache_dir_name(&self) -> &str {
        &self.cache_dir_name
    }
}

impl Default for AppDescriptorImages {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_DIR_NAME)
    }
}

impl FirmwareImages for AppDescriptorImages {
    fn cache_root(&self, base: &str) -> Result<PathString> {
        crate::paths::cache_root(base, &self.cache_dir_name)
    }

    fn describe(&self, path: &Path) -> Result<AppDescriptor> {
        let result = describe(path);
        if let Err(e) = &result {
            event!(Level::DEBUG, path = %path.display(), error = %e, "cannot describe firmware image");
        }
        result
    }

    fn ensure_paths(&self, base: &str) -> Result<()> {
        crate::paths::ensure_paths(base, &self.cache_dir_name)
    }
}
