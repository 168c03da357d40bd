#![no_main]
use jsonflume::{DecodeState, Decoder, decode_str};
use libfuzzer_sys::fuzz_target;

const HEADER: usize = 5; // 1 flag byte + 4-byte split seed

/// Split a UTF-8 `&str` into boundary-safe chunks using a deterministic
/// seed. Every chunk is at least one byte and ends on a char boundary.
fn split_into_safe_chunks(serialized: &str, split_seed: u64) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let len = serialized.len();

    while start < len {
        let remaining = len - start;
        let mut size = (split_seed as usize % remaining) + 1;
        while start + size < len && !serialized.is_char_boundary(start + size) {
            size += 1;
        }
        chunks.push(&serialized[start..start + size]);
        start += size;
    }

    chunks
}

/// Split bytes with no boundary care at all — the decoder's transcoding
/// carry must make any split safe.
fn split_into_byte_chunks(data: &[u8], split_seed: u64) -> Vec<&[u8]> {
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < data.len() {
        let remaining = data.len() - start;
        let size = (split_seed as usize % remaining) + 1;
        chunks.push(&data[start..start + size]);
        start += size;
    }

    chunks
}

fn run(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let flags = data[0];
    let split_seed = u64::from(u32::from_le_bytes(data[1..5].try_into().unwrap()));
    let data = &data[HEADER..];
    if data.is_empty() {
        return;
    }

    let text = String::from_utf8_lossy(data).into_owned();

    // Reference result: the whole document in one call.
    let whole = decode_str(&text);

    // Chunked result must agree with the whole-document result.
    let mut decoder = Decoder::new();
    let mut failed = false;
    if flags & 1 == 0 {
        for chunk in split_into_safe_chunks(&text, split_seed) {
            if decoder.feed(chunk).is_err() {
                failed = true;
                break;
            }
        }
    } else {
        for chunk in split_into_byte_chunks(text.as_bytes(), split_seed) {
            if decoder.feed_bytes(chunk).is_err() {
                failed = true;
                break;
            }
        }
    }

    if failed {
        assert!(whole.is_err(), "chunked decode failed where whole decode succeeded");
        return;
    }
    match decoder.finish() {
        Err(_) => {
            assert!(whole.is_err(), "chunked finish failed where whole decode succeeded");
        }
        Ok(DecodeState::Ok) => {
            if !decoder.has_trailing_input() {
                let value = decoder.get().unwrap();
                let reference = whole.expect("whole decode failed where chunked succeeded");
                assert_eq!(value, reference);
            }
        }
        Ok(_) => {
            assert!(whole.is_err(), "chunked decode incomplete where whole decode succeeded");
        }
    }
}

fuzz_target!(|data: &[u8]| run(data));
