// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io::{BufReader, ErrorKind, Read};

use crate::{Error, Result};

/// Magic bytes that open an application descriptor.
pub const SIGNATURE: [u8; 8] = *b"APDesc00";

/// Encoded size of an application descriptor, signature included.
pub const DESCRIPTOR_LEN: usize = 32;

/// Descriptors are only searched for on offsets that are a multiple of this.
const ALIGNMENT: usize = SIGNATURE.len();

/// Images are streamed through a buffer of this size while scanning.
const SCAN_CHUNK_SIZE: usize = 512;

/// The metadata block a firmware build embeds in its image.
///
/// Encoded little-endian as:
///
/// | Offset | Size | Field |
/// |--------|------|-------|
/// | 0      | 8    | [`SIGNATURE`] |
/// | 8      | 8    | `image_crc` |
/// | 16     | 4    | `image_size` |
/// | 20     | 4    | `vcs_commit` |
/// | 24     | 1    | `major_version` |
/// | 25     | 1    | `minor_version` |
/// | 26     | 6    | reserved, zero |
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AppDescriptor {
    /// 64-bit checksum of the image, computed by the build tooling.
    pub image_crc: u64,
    /// Size of the image in bytes.
    pub image_size: u32,
    /// Version control commit the image was built from.
    pub vcs_commit: u32,
    /// Major version of the software.
    pub major_version: u8,
    /// Minor version of the software.
    pub minor_version: u8,
}

impl AppDescriptor {
    /// Decodes a descriptor from its wire form.
    ///
    /// Returns `None` if `bytes` does not start with [`SIGNATURE`].
    #[must_use]
    pub fn from_bytes(bytes: &[u8; DESCRIPTOR_LEN]) -> Option<Self> {
        let (signature, body) = bytes.split_at(SIGNATURE.len());
        if signature != SIGNATURE {
            return None;
        }
        Some(Self::from_body(body))
    }

    /// Encodes the descriptor, signature included.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; DESCRIPTOR_LEN] {
        let mut out = [0_u8; DESCRIPTOR_LEN];
        out[..8].copy_from_slice(&SIGNATURE);
        out[8..16].copy_from_slice(&self.image_crc.to_le_bytes());
        out[16..20].copy_from_slice(&self.image_size.to_le_bytes());
        out[20..24].copy_from_slice(&self.vcs_commit.to_le_bytes());
        out[24] = self.major_version;
        out[25] = self.minor_version;
        out
    }

    /// Streams `reader` looking for the first descriptor on an aligned offset.
    ///
    /// The reader is consumed through a bounded buffer; the image is never held
    /// in memory as a whole.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SignatureNotFound`] if the reader ends without a match,
    /// [`Error::Truncated`] if it ends inside the descriptor, or
    /// [`Error::StdIo`] if reading fails.
    pub fn scan(reader: impl Read) -> Result<Self> {
        let mut reader = BufReader::with_capacity(SCAN_CHUNK_SIZE, reader);
        let mut word = [0_u8; ALIGNMENT];
        let mut offset: u64 = 0;

        loop {
            match reader.read_exact(&mut word) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Err(Error::SignatureNotFound),
                Err(e) => return Err(e.into()),
            }

            if word == SIGNATURE {
                let mut body = [0_u8; DESCRIPTOR_LEN - ALIGNMENT];
                return match reader.read_exact(&mut body) {
                    Ok(()) => Ok(Self::from_body(&body)),
                    Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(Error::Truncated { offset }),
                    Err(e) => Err(e.into()),
                };
            }

            offset += ALIGNMENT as u64;
        }
    }

    /// Decodes everything after the signature. `body` is at least 24 bytes.
    fn from_body(body: &[u8]) -> Self {
        let u64_at = |at: usize| {
            let mut raw = [0_u8; 8];
            raw.copy_from_slice(&body[at..at + 8]);
            u64::from_le_bytes(raw)
        };
        let u32_at = |at: usize| {
            let mut raw = [0_u8; 4];
            raw.copy_from_slice(&body[at..at + 4]);
            u32::from_le_bytes(raw)
        };

        Self {
            image_crc: u64_at(0),
            image_size: u32_at(8),
            vcs_commit: u32_at(12),
            major_version: body[16],
            minor_version: body[17],
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn sample() -> AppDescriptor {
        AppDescriptor {
            image_crc: 0x0123_4567_89AB_CDEF,
            image_size: 4096,
            vcs_commit: 0xDEAD_BEEF,
            major_version: 1,
            minor_version: 7,
        }
    }

    fn image_with_descriptor_at(offset: usize, total: usize) -> Vec<u8> {
        let mut image = vec![0xA5_u8; total];
        image[offset..offset + DESCRIPTOR_LEN].copy_from_slice(&sample().to_bytes());
        image
    }

    #[test]
    fn encoded_layout_is_little_endian() {
        let bytes = sample().to_bytes();
        assert_eq!(&bytes[..8], b"APDesc00");
        assert_eq!(&bytes[8..16], &[0xEF, 0xCD, 0xAB, 0x89, 0x67, 0x45, 0x23, 0x01]);
        assert_eq!(&bytes[16..20], &[0x00, 0x10, 0x00, 0x00]);
        assert_eq!(&bytes[26..], &[0; 6]);
    }

    #[test]
    fn from_bytes_rejects_foreign_signature() {
        let mut bytes = sample().to_bytes();
        bytes[7] = b'1';
        assert_eq!(AppDescriptor::from_bytes(&bytes), None);
    }

    #[test]
    fn scan_finds_descriptor_at_start() {
        let image = image_with_descriptor_at(0, 64);
        assert_eq!(AppDescriptor::scan(Cursor::new(image)).expect("found"), sample());
    }

    #[test]
    fn scan_finds_descriptor_past_first_chunk() {
        // Lands across the boundary of the internal read buffer.
        let image = image_with_descriptor_at(SCAN_CHUNK_SIZE - 8, 2048);
        assert_eq!(AppDescriptor::scan(Cursor::new(image)).expect("found"), sample());
    }

    #[test]
    fn scan_ignores_unaligned_signature() {
        let image = image_with_descriptor_at(12, 128);
        let err = AppDescriptor::scan(Cursor::new(image)).expect_err("unaligned must not match");
        assert!(matches!(err, Error::SignatureNotFound), "{err:?}");
    }

    #[test]
    fn scan_reports_truncated_descriptor() {
        let mut image = image_with_descriptor_at(16, 64);
        image.truncate(16 + 20);
        let err = AppDescriptor::scan(Cursor::new(image)).expect_err("truncated");
        assert!(matches!(err, Error::Truncated { offset: 16 }), "{err:?}");
    }

    #[test]
    fn scan_of_empty_input_finds_nothing() {
        let err = AppDescriptor::scan(Cursor::new(Vec::new())).expect_err("empty");
        assert!(matches!(err, Error::SignatureNotFound), "{err:?}");
    }

    #[test]
    fn first_descriptor_wins() {
        let mut image = image_with_descriptor_at(8, 128);
        let other = AppDescriptor {
            image_crc: 1,
            ..sample()
        };
        image[64..64 + DESCRIPTOR_LEN].copy_from_slice(&other.to_bytes());
        assert_eq!(AppDescriptor::scan(Cursor::new(image)).expect("found"), sample());
    }
}
