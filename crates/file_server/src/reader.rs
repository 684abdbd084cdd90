// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fs::File;
use std::io::{Read as _, Seek as _, SeekFrom};

use crate::{Error, Operation, Result};

/// Reads at most `buf.len()` bytes of the file at `resolved`, starting at `offset`.
///
/// The file is opened, positioned and read exactly once; a short count from that
/// single read is final. Fewer bytes than requested therefore means the end of
/// the file fell inside the window, and zero means `offset` is at or past it.
/// The handle is closed before returning on every path.
pub(crate) fn read_at(resolved: &str, offset: u32, buf: &mut [u8]) -> Result<usize> {
    let mut file = File::open(resolved).map_err(|e| Error::io(Operation::Open, e))?;
    let _ = file
        .seek(SeekFrom::Start(u64::from(offset)))
        .map_err(|e| Error::io(Operation::Seek, e))?;
    file.read(buf).map_err(|e| Error::io(Operation::Read, e))
}
