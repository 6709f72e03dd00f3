//! Block header and pointer list parsing.

use crate::config::POINTER_SENTINEL;
use crate::container::varint::decode_varint;
use crate::error::Result;
use std::io::{Read, Seek};

/// A block as found on disk: its extent and the blocks it points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDescriptor {
    /// Absolute offset of the block's size field.
    pub offset: u64,
    /// Declared size, including the size field and the pointer region.
    pub size: u64,
    /// Width of the size field in bytes.
    pub header_len: usize,
    /// Child block offsets, in scan order. Never contains the sentinel.
    pub pointers: Vec<u64>,
}

impl BlockDescriptor {
    /// Offset of the first byte after the block.
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.size)
    }
}

/// Read the block starting at `offset`.
///
/// The size field is followed by varint pointers. Scanning stops at the
/// first zero pointer (start of payload) or once the cursor, measured from
/// the block start, reaches `size - 1`. Any varint failure inside the block
/// aborts the read.
pub fn read_block<R: Read + Seek>(source: &mut R, offset: u64) -> Result<BlockDescriptor> {
    let header = decode_varint(source, offset)?;
    let size = header.value;
    let scan_limit = size.saturating_sub(1);

    let mut cursor = header.byte_length as u64;
    let mut pointers = Vec::new();

    while cursor < scan_limit {
        let pointer = decode_varint(source, offset + cursor)?;
        if pointer.value == POINTER_SENTINEL {
            break;
        }
        pointers.push(pointer.value);
        cursor += pointer.byte_length as u64;
    }

    Ok(BlockDescriptor {
        offset,
        size,
        header_len: header.byte_length,
        pointers,
    })
}
