#![no_main]

use libfuzzer_sys::fuzz_target;
use mzip::{decompress, is_container, Container};
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Malformed containers must be rejected with an error, never a panic
    let _ = is_container(&mut Cursor::new(data));

    if let Ok(container) = Container::parse(data) {
        if let Ok(decoded) = decompress(&container) {
            // Anything that decodes must survive a second trip
            let (again, _) = mzip::Compressor::default()
                .compress_bytes(container.name(), container.extension(), &decoded)
                .expect("compressing decoded bytes cannot fail");
            assert_eq!(decompress(&again).expect("re-encoded container must decode"), decoded);
        }
    }
});
