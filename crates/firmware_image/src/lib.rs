// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(docsrs, feature(doc_cfg))]

//! Firmware image cache layout and embedded application descriptor scanning.
//!
//! Firmware images served to remote nodes live in a cache directory derived from a
//! configured base directory. Each image carries a 32-byte *application descriptor*
//! somewhere in its body, aligned to 8 bytes and introduced by the `APDesc00`
//! signature. The descriptor records the image checksum and size, which is all a
//! file server needs to answer metadata requests without hashing the image itself.
//!
//! This crate provides three things:
//!
//! 1. **Cache layout.** [`cache_root`] derives the cache directory from a base
//!    directory and [`ensure_paths`] creates both on disk.
//! 2. **Descriptor scanning.** [`AppDescriptor::scan`] streams through any reader
//!    looking for the descriptor; [`describe`] does the same for a file on disk and
//!    checks the declared size against the file length.
//! 3. **A seam for consumers.** The [`FirmwareImages`] trait bundles the above so
//!    that a file server can be exercised against a different descriptor source.
//!
//! # Bounded paths
//!
//! Paths are carried in fixed-capacity [`heapless::String`] buffers. Capacities
//! are compile-time constants: [`MAX_BASE_PATH_LEN`] for the base directory and
//! [`MAX_PATH_LEN`] for a cache root with a request path appended. Appending past
//! capacity fails with [`Error::PathTooLong`]; nothing is silently truncated.
//!
//! # Example
//!
//! ```no_run
//! # fn example() -> firmware_image::Result<()> {
//! use firmware_image::{AppDescriptorImages, FirmwareImages};
//!
//! let images = AppDescriptorImages::default();
//! images.ensure_paths("/var/lib/fw")?;
//!
//! let root = images.cache_root("/var/lib/fw")?;
//! assert_eq!(root.as_str(), "/var/lib/fw/c/");
//!
//! let descriptor = images.describe("/var/lib/fw/c/node.bin".as_ref())?;
//! println!("crc64 {:#018x}, {} bytes", descriptor.image_crc, descriptor.image_size);
//! # Ok(())
//! # }
//! ```

pub use crate::descriptor::{AppDescriptor, DESCRIPTOR_LEN, SIGNATURE};
pub use crate::error::{Error, Result};
pub use crate::images::{AppDescriptorImages, FirmwareImages, describe};
pub use crate::paths::{
    BasePathString, DEFAULT_CACHE_DIR_NAME, MAX_BASE_PATH_LEN, MAX_FILE_PATH_LEN, MAX_PATH_LEN, PathString, cache_root,
    ensure_paths,
};

mod descriptor;
mod error;
mod images;
mod paths;
