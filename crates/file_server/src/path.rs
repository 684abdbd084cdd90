// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::path::{Component, Path};

use firmware_image::{MAX_FILE_PATH_LEN, MAX_PATH_LEN, PathString};

use crate::PathError;

/// A file path as named by a remote peer, relative to the cache root.
pub type FilePath = heapless::String<MAX_FILE_PATH_LEN>;

/// Copies `path` into a [`FilePath`].
///
/// # Errors
///
/// Returns [`PathError::TooLong`] if `path` exceeds [`MAX_FILE_PATH_LEN`] bytes.
pub fn file_path(path: &str) -> Result<FilePath, PathError> {
    let mut out = FilePath::new();
    out.push_str(path).map_err(|()| PathError::TooLong {
        len: path.len(),
        capacity: MAX_FILE_PATH_LEN,
    })?;
    Ok(out)
}

/// Appends the request path `relative` to `cache_root`.
///
/// The check is purely lexical; whether the file exists is discovered by
/// whoever opens the result. Both `/` and `\` separate components regardless
/// of the host platform.
///
/// # Errors
///
/// Returns a [`PathError`] if `relative` is empty, absolute (including drive
/// and UNC prefixes), contains a `..` component, is longer than
/// [`MAX_FILE_PATH_LEN`], or does not fit after `cache_root` within
/// [`MAX_PATH_LEN`].
pub fn resolve(cache_root: &str, relative: &str) -> Result<PathString, PathError> {
    if relative.is_empty() {
        return Err(PathError::Empty);
    }

    if relative.len() > MAX_FILE_PATH_LEN {
        return Err(PathError::TooLong {
            len: relative.len(),
            capacity: MAX_FILE_PATH_LEN,
        });
    }

    let len = cache_root.len() + relative.len();
    if len > MAX_PATH_LEN {
        return Err(PathError::TooLong {
            len,
            capacity: MAX_PATH_LEN,
        });
    }

    check_confined(relative)?;

    let overflow = |()| PathError::TooLong {
        len,
        capacity: MAX_PATH_LEN,
    };
    let mut resolved = PathString::new();
    resolved.push_str(cache_root).map_err(overflow)?;
    resolved.push_str(relative).map_err(overflow)?;
    Ok(resolved)
}

fn check_confined(relative: &str) -> Result<(), PathError> {
    if relative.starts_with(['/', '\\']) || has_drive_prefix(relative) {
        return Err(PathError::Absolute);
    }

    for component in Path::new(relative).components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => return Err(PathError::Traversal),
            Component::RootDir | Component::Prefix(_) => return Err(PathError::Absolute),
        }
    }

    // The host only splits on its own separators.
    if relative.split(['/', '\\']).any(|component| component == "..") {
        return Err(PathError::Traversal);
    }

    Ok(())
}

fn has_drive_prefix(path: &str) -> bool {
    matches!(path.as_bytes(), [drive, b':', ..] if drive.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "/fw/c/";

    #[test]
    fn appends_to_cache_root() {
        assert_eq!(
            resolve(ROOT, "node/app.bin").expect("valid").as_str(),
            "/fw/c/node/app.bin"
        );
    }

    #[test]
    fn dot_segments_are_kept() {
        assert_eq!(resolve(ROOT, "./app.bin").expect("valid").as_str(), "/fw/c/./app.bin");
    }

    #[test]
    fn names_containing_dots_are_not_traversal() {
        assert_eq!(resolve(ROOT, "a..b/..c").expect("valid").as_str(), "/fw/c/a..b/..c");
    }

    #[test]
    fn empty_rejected() {
        assert_eq!(resolve(ROOT, ""), Err(PathError::Empty));
    }

    #[test]
    fn absolute_rejected() {
        assert_eq!(resolve(ROOT, "/etc/passwd"), Err(PathError::Absolute));
    }

    #[test]
    fn traversal_rejected() {
        assert_eq!(resolve(ROOT, "../secret"), Err(PathError::Traversal));
        assert_eq!(resolve(ROOT, "a/../../secret"), Err(PathError::Traversal));
        assert_eq!(resolve(ROOT, "a/.."), Err(PathError::Traversal));
    }

    #[test]
    fn backslash_traversal_rejected() {
        assert_eq!(resolve(ROOT, "..\\..\\secret"), Err(PathError::Traversal));
        assert_eq!(resolve(ROOT, "a\\..\\..\\secret"), Err(PathError::Traversal));
        assert_eq!(resolve(ROOT, "a/..\\b"), Err(PathError::Traversal));
    }

    #[test]
    fn windows_absolute_forms_rejected() {
        assert_eq!(resolve(ROOT, "C:\\Windows\\x"), Err(PathError::Absolute));
        assert_eq!(resolve(ROOT, "c:relative.bin"), Err(PathError::Absolute));
        assert_eq!(resolve(ROOT, "\\Windows\\x"), Err(PathError::Absolute));
        assert_eq!(resolve(ROOT, "\\\\server\\share\\x"), Err(PathError::Absolute));
    }

    #[test]
    fn colon_later_in_name_is_allowed() {
        assert_eq!(resolve(ROOT, "ab:c.bin").expect("valid").as_str(), "/fw/c/ab:c.bin");
    }

    #[cfg(windows)]
    #[test]
    fn verbatim_prefix_rejected() {
        assert_eq!(resolve(ROOT, r"\\?\C:\x"), Err(PathError::Absolute));
    }

    #[test]
    fn combined_length_at_capacity_fits() {
        let root = "r".repeat(MAX_PATH_LEN - MAX_FILE_PATH_LEN);
        let relative = "f".repeat(MAX_FILE_PATH_LEN);
        assert_eq!(resolve(&root, &relative).expect("fits").len(), MAX_PATH_LEN);
    }

    #[test]
    fn combined_length_over_capacity_rejected() {
        let root = "r".repeat(MAX_PATH_LEN - 10);
        assert_eq!(
            resolve(&root, "elevenbytes"),
            Err(PathError::TooLong {
                len: MAX_PATH_LEN + 1,
                capacity: MAX_PATH_LEN
            })
        );
    }

    #[test]
    fn overlong_request_path_rejected() {
        let relative = "f".repeat(MAX_FILE_PATH_LEN + 1);
        assert_eq!(
            resolve(ROOT, &relative),
            Err(PathError::TooLong {
                len: MAX_FILE_PATH_LEN + 1,
                capacity: MAX_FILE_PATH_LEN
            })
        );
    }

    #[test]
    fn file_path_is_bounded() {
        assert_eq!(file_path("app.bin").expect("fits").as_str(), "app.bin");
        assert!(matches!(
            file_path(&"x".repeat(MAX_FILE_PATH_LEN + 1)),
            Err(PathError::TooLong { .. })
        ));
    }
}
