#![no_main]

use libfuzzer_sys::fuzz_target;
use mzip::{decompress, Compressor, Container};

fuzz_target!(|data: &[u8]| {
    let (container, _) = Compressor::default()
        .compress_bytes("fuzz", ".bin", data)
        .expect("compressing in-memory bytes cannot fail");

    let parsed = Container::parse(&container.to_bytes()).expect("written container must parse");
    let decoded = decompress(&parsed).expect("written container must decode");

    assert_eq!(decoded, data);
});
