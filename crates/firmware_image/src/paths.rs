// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::path::{Component, Path};

use tracing::{Level, event};

use crate::{Error, Result};

/// Maximum length in bytes of a configured base directory.
pub const MAX_BASE_PATH_LEN: usize = 128;

/// Maximum length in bytes of a file path named by a remote peer.
pub const MAX_FILE_PATH_LEN: usize = 200;

/// Maximum length in bytes of a cache root with a file path appended.
pub const MAX_PATH_LEN: usize = MAX_BASE_PATH_LEN + MAX_FILE_PATH_LEN;

/// Name of the cache subdirectory created under the base directory by default.
pub const DEFAULT_CACHE_DIR_NAME: &str = "c";

/// A base directory in a fixed-capacity buffer.
pub type BasePathString = heapless::String<MAX_BASE_PATH_LEN>;

/// A cache root or resolved file path in a fixed-capacity buffer.
pub type PathString = heapless::String<MAX_PATH_LEN>;

/// Derives the firmware cache root from a base directory.
///
/// The result is `base`, a `/` separator unless `base` already ends in one,
/// `cache_dir_name` and a trailing `/`, so a relative file path can be
/// appended to it directly.
///
/// # Errors
///
/// Returns [`Error::InvalidCacheDirName`] unless `cache_dir_name` is a single
/// plain directory name, or [`Error::PathTooLong`] if the result exceeds
/// [`MAX_PATH_LEN`].
pub fn cache_root(base: &str, cache_dir_name: &str) -> Result<PathString> {
    if !is_plain_dir_name(cache_dir_name) {
        return Err(Error::InvalidCacheDirName {
            name: cache_dir_name.to_owned(),
        });
    }

    let mut root = PathString::new();
    push(&mut root, base)?;
    if !root.ends_with('/') {
        push(&mut root, "/")?;
    }
    push(&mut root, cache_dir_name)?;
    push(&mut root, "/")?;
    Ok(root)
}

/// Creates the base directory and the cache root beneath it.
///
/// Succeeds if both already exist.
///
/// # Errors
///
/// Returns any error of [`cache_root`] before touching the filesystem, or
/// [`Error::StdIo`] if a directory cannot be created.
pub fn ensure_paths(base: &str, cache_dir_name: &str) -> Result<()> {
    let root = cache_root(base, cache_dir_name)?;

    std::fs::create_dir_all(base)?;
    std::fs::create_dir_all(Path::new(root.as_str()))?;

    event!(Level::DEBUG, base, cache_root = root.as_str(), "firmware cache paths ready");
    Ok(())
}

fn is_plain_dir_name(name: &str) -> bool {
    if name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!((components.next(), components.next()), (Some(Component::Normal(_)), None))
}

fn push(buf: &mut PathString, s: &str) -> Result<()> {
    buf.push_str(s).map_err(|()| Error::PathTooLong { capacity: MAX_PATH_LEN })
}
