// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::path::Path;

use firmware_image::FirmwareImages;

use crate::{EntryType, Error, Result};

/// What a file server reports about a firmware image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FileInfo {
    /// Image checksum as recorded in the image's descriptor.
    pub crc64: u64,
    /// Image size in bytes as recorded in the image's descriptor.
    pub size: u32,
    /// Kind and access rights of the entry.
    pub entry_type: EntryType,
}

/// Describes the image at `resolved` through `images`.
///
/// Permissions are not inspected: every describable image is reported as a
/// readable regular file.
pub(crate) fn file_info(images: &impl FirmwareImages, resolved: &str) -> Result<FileInfo> {
    let descriptor = images.describe(Path::new(resolved)).map_err(Error::Descriptor)?;
    Ok(FileInfo {
        crc64: descriptor.image_crc,
        size: descriptor.image_size,
        entry_type: EntryType::FILE | EntryType::READABLE,
    })
}
