// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(docsrs, feature(doc_cfg))]

//! Serves firmware images from a local cache to remote file-read requests.
//!
//! A bus-level file protocol lets remote nodes ask two questions about a file
//! named by a short relative path: *what is it* (checksum, size, kind) and *give
//! me the bytes at this offset*. This crate answers both against a directory on
//! the local filesystem.
//!
//! # Overview
//!
//! [`BasicFileServerBackend`] is the object a transport talks to. It is rooted
//! once, with [`initialize`](BasicFileServerBackend::initialize), at a base
//! directory; files are served from a cache directory beneath it (`<base>/c/`
//! unless [`BackendOptions`] say otherwise). Requests then go through the
//! [`FileServerBackend`] trait:
//!
//! - [`get_info`](FileServerBackend::get_info) reads the application descriptor
//!   embedded in the image (see [`firmware_image`]) and reports its checksum and
//!   size. Every describable image is a readable regular file.
//! - [`read`](FileServerBackend::read) opens the file, seeks to the offset and
//!   performs a single read into the caller's buffer. The byte count equals the
//!   buffer length unless the end of the file was reached, which is how the
//!   caller learns that a transfer is complete.
//!
//! ```no_run
//! use file_server::{BasicFileServerBackend, FileServerBackend};
//!
//! # fn example() -> file_server::Result<()> {
//! let backend = BasicFileServerBackend::new();
//! backend.initialize("/var/lib/fw")?;
//!
//! let mut image = Vec::new();
//! let mut chunk = [0_u8; 256];
//! loop {
//!     let offset = u32::try_from(image.len()).expect("firmware images are small");
//!     let delivered = backend.read("node.bin", offset, &mut chunk)?;
//!     image.extend_from_slice(&chunk[..delivered]);
//!     if delivered < chunk.len() {
//!         break;
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Paths
//!
//! Request paths are appended to the cache root as strings. A path is rejected
//! before any filesystem access if it is empty, absolute, contains a `..`
//! component, or would not fit in the fixed-capacity [`PathString`]. Paths
//! never allocate.
//!
//! # Errors and status codes
//!
//! Operations return a typed [`Error`]. The file protocol carries a single
//! 16-bit [`Status`] instead, obtained with [`Error::status`]:
//!
//! | Failure | Status |
//! |---------|--------|
//! | Invalid path, uninitialized backend | [`Status::INVALID_VALUE`] |
//! | Image missing or without a valid descriptor (`get_info`) | [`Status::INVALID_VALUE`] |
//! | Open, seek or read failure (`read`) | the operating system error number |
//!
//! The protocol's own codes and operating system error numbers share one space,
//! so the only reliable reading of a status is zero versus non-zero.
//!
//! # Serving requests
//!
//! [`FileServer`] turns decoded [`GetInfoRequest`] and [`ReadRequest`] values
//! into the responses a transport encodes, asking the backend for
//! [`MAX_READ_SIZE`] bytes per read.
//!
//! # Concurrency
//!
//! All calls are synchronous and block for the duration of their filesystem
//! access. The only shared state is the base directory, written once and read
//! afterwards, so a backend may serve several threads at once.

pub use firmware_image::{MAX_BASE_PATH_LEN, MAX_FILE_PATH_LEN, MAX_PATH_LEN, PathString};

pub use crate::backend::{BasicFileServerBackend, FileServerBackend};
pub use crate::error::{Error, Operation, PathError, Result};
pub use crate::metadata::FileInfo;
pub use crate::options::BackendOptions;
pub use crate::path::{FilePath, file_path, resolve};
pub use crate::server::{FileServer, GetInfoRequest, GetInfoResponse, MAX_READ_SIZE, ReadRequest, ReadResponse};
pub use crate::status::{EntryType, Status};

mod backend;
mod error;
mod metadata;
mod options;
mod path;
mod reader;
mod server;
mod status;
