// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use firmware_image::DEFAULT_CACHE_DIR_NAME;

/// Configuration for a [`BasicFileServerBackend`](crate::BasicFileServerBackend).
///
/// The base directory is not part of the options; it is supplied once to
/// [`initialize`](crate::BasicFileServerBackend::initialize).
///
/// # Examples
///
/// ```
/// use file_server::{BackendOptions, BasicFileServerBackend};
///
/// let options = BackendOptions::default().with_cache_dir_name("fwcache");
/// let backend = BasicFileServerBackend::with_options(&options);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BackendOptions {
    cache_dir_name: String,
}

impl BackendOptions {
    /// Sets the name of the cache subdirectory created under the base directory.
    ///
    /// The name must be a single plain directory name; anything else makes
    /// [`initialize`](crate::BasicFileServerBackend::initialize) fail.
    #[must_use]
    pub fn with_cache_dir_name(mut self, name: impl Into<String>) -> Self {
        self.cache_dir_name = name.into();
        self
    }

    /// The name of the cache subdirectory.
    #[must_use]
    pub fn cache_dir_name(&self) -> &str {
        &self.cache_dir_name
    }
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            cache_dir_name: DEFAULT_CACHE_DIR_NAME.to_owned(),
        }
    }
}
