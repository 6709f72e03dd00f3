//! Discovery of every block reachable from the root.

use crate::container::block::{read_block, BlockDescriptor};
use crate::error::Result;
use std::collections::btree_map::{self, BTreeMap};
use std::io::{Read, Seek};
use tracing::debug;

/// Live blocks keyed by offset, kept in ascending offset order.
///
/// The first size recorded for an offset is final; later inserts are no-ops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockTable {
    blocks: BTreeMap<u64, u64>,
}

impl BlockTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a block. Returns `false` if the offset was already present.
    pub fn insert(&mut self, offset: u64, size: u64) -> bool {
        match self.blocks.entry(offset) {
            btree_map::Entry::Vacant(entry) => {
                entry.insert(size);
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    /// Whether a block at `offset` has been visited.
    pub fn contains(&self, offset: u64) -> bool {
        self.blocks.contains_key(&offset)
    }

    /// Size of the block at `offset`.
    pub fn size_of(&self, offset: u64) -> Option<u64> {
        self.blocks.get(&offset).copied()
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// `(offset, size)` pairs in ascending offset order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.blocks.iter().map(|(&offset, &size)| (offset, size))
    }

    /// Sum of all declared block sizes.
    pub fn total_size(&self) -> u64 {
        self.blocks.values().fold(0u64, |acc, &size| acc.saturating_add(size))
    }
}

impl FromIterator<(u64, u64)> for BlockTable {
    fn from_iter<I: IntoIterator<Item = (u64, u64)>>(iter: I) -> Self {
        let mut table = BlockTable::new();
        for (offset, size) in iter {
            table.insert(offset, size);
        }
        table
    }
}

/// Discover every block reachable from `root_offset`.
pub fn discover_blocks<R: Read + Seek>(source: &mut R, root_offset: u64) -> Result<BlockTable> {
    walk_blocks(source, root_offset, |_| {})
}

/// Discover every block reachable from `root_offset`, handing each block
/// to `on_block` once, in the order it is read.
///
/// Traversal is depth-first over an explicit stack. Children are pushed
/// unconditionally; whether an offset was already visited is only checked
/// when it is popped, so each block is read exactly once however many
/// paths lead to it.
pub fn walk_blocks<R, F>(source: &mut R, root_offset: u64, mut on_block: F) -> Result<BlockTable>
where
    R: Read + Seek,
    F: FnMut(&BlockDescriptor),
{
    let root = read_block(source, root_offset)?;
    debug!(offset = root.offset, size = root.size, pointers = root.pointers.len(), "root block");

    let mut table = BlockTable::new();
    table.insert(root.offset, root.size);
    let mut stack = root.pointers.clone();
    on_block(&root);

    while let Some(offset) = stack.pop() {
        if table.contains(offset) {
            continue;
        }

        let block = read_block(source, offset)?;
        debug!(offset = block.offset, size = block.size, pointers = block.pointers.len(), "block");

        table.insert(block.offset, block.size);
        stack.extend_from_slice(&block.pointers);
        on_block(&block);
    }

    Ok(table)
}
