// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(missing_docs, reason = "Benchmark harness")]
#![allow(unused_results, reason = "Criterion builder returns are intentionally unused")]
#![allow(clippy::cast_possible_truncation, reason = "Intentional modular byte pattern")]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use file_server::{BasicFileServerBackend, FileServer, FileServerBackend, MAX_READ_SIZE, ReadRequest};

fn make_data(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 251) as u8).collect()
}

fn bench_whole_image(c: &mut Criterion) {
    let sizes: &[(usize, &str)] = &[(16 * 1024, "16KB"), (256 * 1024, "256KB")];

    let mut group = c.benchmark_group("whole_image");

    for &(size, label) in sizes {
        let tmp = tempfile::tempdir().expect("tempdir");
        let backend = BasicFileServerBackend::new();
        backend.initialize(tmp.path().to_str().expect("utf-8")).expect("initialize");
        std::fs::write(tmp.path().join("c/image.bin"), make_data(size)).expect("write");

        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("backend", label), &size, |b, _| {
            let mut buf = [0_u8; MAX_READ_SIZE];
            b.iter(|| {
                let mut offset = 0_u32;
                loop {
                    let n = backend.read("image.bin", offset, &mut buf).expect("read");
                    offset += n as u32;
                    if n < buf.len() {
                        break;
                    }
                }
                offset
            });
        });

        let server = FileServer::new(&backend);
        group.bench_with_input(BenchmarkId::new("server", label), &size, |b, _| {
            b.iter(|| {
                let mut offset = 0_u32;
                loop {
                    let response = server.handle_read(&ReadRequest::new("image.bin", offset).expect("path"));
                    offset += response.data.len() as u32;
                    if response.data.len() < MAX_READ_SIZE {
                        break;
                    }
                }
                offset
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_whole_image);
criterion_main!(benches);
