//! The block container format.
//!
//! This module handles:
//! - Decoding base-128 varints
//! - Parsing block headers and pointer lists
//! - Walking the pointer graph from the root block

mod block;
mod traverse;
pub mod varint;

pub use block::{read_block, BlockDescriptor};
pub use traverse::{discover_blocks, walk_blocks, BlockTable};
pub use varint::{decode_varint, encode_varint, Varint};

use crate::error::Result;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// An open container file.
///
/// Reads go through a buffer; every consumer seeks before reading, so no
/// cursor position is assumed between calls.
pub struct Container {
    path: PathBuf,
    reader: BufReader<File>,
    len: u64,
}

impl Container {
    /// Open a container for reading.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();

        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
            len,
        })
    }

    /// Path the container was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Length of the container in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the container is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Read for Container {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl Seek for Container {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.reader.seek(pos)
    }
}
