//! Turning recovered slack into something a person can read.

use crate::config::TextDecoding;
use crate::error::{Error, Result};
use std::borrow::Cow;
use std::fmt::Write;

/// Bytes shown per hex dump line.
const HEX_DUMP_WIDTH: usize = 16;

/// Decode slack bytes found at `offset` as text.
pub fn decode_text(bytes: &[u8], offset: u64, decoding: TextDecoding) -> Result<Cow<'_, str>> {
    match decoding {
        TextDecoding::Strict => std::str::from_utf8(bytes)
            .map(Cow::Borrowed)
            .map_err(|e| Error::NonTextSlack { offset, source: e }),
        TextDecoding::Lossy | TextDecoding::Raw => Ok(String::from_utf8_lossy(bytes)),
    }
}

/// Render bytes as `offset  hex  |ascii|` lines, labelled from `base_offset`.
pub fn hex_dump(bytes: &[u8], base_offset: u64) -> String {
    let mut out = String::new();

    for (line, chunk) in bytes.chunks(HEX_DUMP_WIDTH).enumerate() {
        let offset = base_offset + (line * HEX_DUMP_WIDTH) as u64;
        let encoded = hex::encode(chunk);

        let mut columns = String::with_capacity(HEX_DUMP_WIDTH * 3);
        for i in 0..HEX_DUMP_WIDTH {
            match encoded.get(i * 2..i * 2 + 2) {
                Some(pair) => columns.push_str(pair),
                None => columns.push_str("  "),
            }
            columns.push(' ');
        }

        let ascii: String = chunk
            .iter()
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
            .collect();

        let _ = writeln!(out, "{offset:08x}  {columns} |{ascii}|");
    }

    out
}
