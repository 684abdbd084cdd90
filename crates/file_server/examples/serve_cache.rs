// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Initializes a backend in a scratch directory, stores a firmware image in its
//! cache and transfers it back the way a remote node would.
//!
//! Pass a directory as the first argument to serve from it instead.

use file_server::{BasicFileServerBackend, FileServer, GetInfoRequest, MAX_READ_SIZE, ReadRequest};
use firmware_image::{AppDescriptor, DESCRIPTOR_LEN};
use tracing::Level;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    let scratch = tempfile::tempdir()?;
    let base = std::env::args()
        .nth(1)
        .unwrap_or_else(|| scratch.path().join("fw").to_string_lossy().into_owned());

    let backend = BasicFileServerBackend::new();
    backend.initialize(&base)?;
    let cache_root = backend.cache_root().unwrap_or_default().to_owned();

    let mut image = vec![0xFF_u8; 1000];
    let descriptor = AppDescriptor {
        image_crc: 0x0102_0304_0506_0708,
        image_size: u32::try_from(image.len())?,
        major_version: 1,
        minor_version: 2,
        ..AppDescriptor::default()
    };
    image[..DESCRIPTOR_LEN].copy_from_slice(&descriptor.to_bytes());
    std::fs::write(format!("{cache_root}demo.bin"), &image)?;

    let server = FileServer::new(backend);

    let info = server.handle_get_info(&GetInfoRequest::new("demo.bin")?);
    println!(
        "get info: {} crc64={:#018x} size={} type={:?}",
        info.error, info.crc64, info.size, info.entry_type
    );

    let mut received = Vec::new();
    loop {
        let offset = u32::try_from(received.len())?;
        let response = server.handle_read(&ReadRequest::new("demo.bin", offset)?);
        if !response.error.is_ok() {
            anyhow::bail!("read at {offset} failed: {}", response.error);
        }
        received.extend_from_slice(&response.data);
        if response.data.len() < MAX_READ_SIZE {
            break;
        }
    }
    println!("read {} bytes, intact: {}", received.len(), received == image);

    Ok(())
}
