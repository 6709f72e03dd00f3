//! Base-128 varints (unsigned LEB128) as stored in the container.
//!
//! Each byte carries seven value bits, least-significant group first. A set
//! high bit means another byte follows.

use crate::config::{MAX_VARINT_BYTES, VARINT_CONTINUATION_BIT, VARINT_DATA_MASK};
use crate::error::{Error, Result};
use std::io::{ErrorKind, Read, Seek, SeekFrom};

/// A decoded varint and the number of bytes it occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Varint {
    /// Decoded value.
    pub value: u64,
    /// Bytes consumed in the source, always at least 1.
    pub byte_length: usize,
}

/// Decode the varint starting at `offset`.
///
/// The source is first scanned byte by byte to find the terminating byte,
/// then the resolved range is read again and decoded. Reaching end of file
/// before a byte with a clear high bit is fatal.
///
/// # Arguments
///
/// * `source` - Seekable container data; the cursor is repositioned
/// * `offset` - Absolute file offset of the first varint byte
pub fn decode_varint<R: Read + Seek>(source: &mut R, offset: u64) -> Result<Varint> {
    let byte_length = scan_length(source, offset)?;
    if byte_length > MAX_VARINT_BYTES {
        return Err(Error::VarintOverflow { offset });
    }

    source.seek(SeekFrom::Start(offset))?;
    let mut buffer = [0u8; MAX_VARINT_BYTES];
    source
        .read_exact(&mut buffer[..byte_length])
        .map_err(|e| Error::UnreadableRegion {
            offset,
            len: byte_length as u64,
            source: e,
        })?;

    // The scan guarantees a terminating byte, so only overflow remains.
    decode_varint_bytes(&buffer[..byte_length]).map_err(|_| Error::VarintOverflow { offset })
}

/// Count the bytes of the varint at `offset` without decoding it.
fn scan_length<R: Read + Seek>(source: &mut R, offset: u64) -> Result<usize> {
    source.seek(SeekFrom::Start(offset))?;

    let mut byte = [0u8; 1];
    let mut length = 0usize;
    loop {
        match source.read_exact(&mut byte) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                return Err(Error::MalformedVarint { offset });
            }
            Err(e) => return Err(Error::Io(e)),
        }
        length += 1;

        if byte[0] & VARINT_CONTINUATION_BIT == 0 {
            return Ok(length);
        }
    }
}

/// Decode a varint from the start of `bytes`.
///
/// Error offsets are relative to the start of the slice.
pub fn decode_varint_bytes(bytes: &[u8]) -> Result<Varint> {
    let mut value: u64 = 0;

    for (index, &byte) in bytes.iter().enumerate() {
        let group = (byte & VARINT_DATA_MASK) as u64;
        let shift = 7 * index as u32;

        if group != 0 && (shift >= u64::BITS || (group << shift) >> shift != group) {
            return Err(Error::VarintOverflow { offset: 0 });
        }
        if shift < u64::BITS {
            value |= group << shift;
        }

        if byte & VARINT_CONTINUATION_BIT == 0 {
            return Ok(Varint {
                value,
                byte_length: index + 1,
            });
        }
    }

    Err(Error::MalformedVarint { offset: 0 })
}

/// Append the varint encoding of `value` to `buf`.
pub fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let byte = (value & VARINT_DATA_MASK as u64) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            break;
        }
        buf.push(byte | VARINT_CONTINUATION_BIT);
    }
}

/// Number of bytes `encode_varint` emits for `value`.
pub fn encoded_len(value: u64) -> usize {
    let bits = (u64::BITS - value.leading_zeros()).max(1);
    bits.div_ceil(7) as usize
}
