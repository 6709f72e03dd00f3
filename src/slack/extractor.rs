//! Carving the byte ranges no live block owns.

use crate::config::TextDecoding;
use crate::container::BlockTable;
use crate::error::{Error, Result};
use crate::slack::render::decode_text;
use serde::Serialize;
use std::io::{Read, Seek, SeekFrom};
use tracing::{debug, warn};

/// Where a slack range sits relative to the live blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegionKind {
    /// Between the end of one block and the start of the next.
    Gap {
        /// Offset of the block the gap follows.
        after_block: u64,
    },
    /// From the end of the last block to end of file.
    Trailing,
}

/// A half-open byte range `[start, end)` outside every live block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlackSpan {
    pub start: u64,
    pub end: u64,
    #[serde(flatten)]
    pub kind: RegionKind,
}

impl SlackSpan {
    /// Length of the range in bytes.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Whether the range is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A slack range together with its raw contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackRegion {
    pub span: SlackSpan,
    pub bytes: Vec<u8>,
}

/// Compute the slack ranges left by `table` in a file of `file_len` bytes.
///
/// Gaps between neighbouring blocks are only reported when strictly
/// positive. The trailing range after the last block is always reported,
/// empty if the last block reaches (or runs past) end of file.
pub fn locate_regions(table: &BlockTable, file_len: u64) -> Vec<SlackSpan> {
    let blocks: Vec<(u64, u64)> = table.iter().collect();
    let mut spans = Vec::with_capacity(blocks.len());

    for pair in blocks.windows(2) {
        let (offset, size) = pair[0];
        let (next_offset, _) = pair[1];
        let end = offset.saturating_add(size);

        if next_offset > end {
            spans.push(SlackSpan {
                start: end,
                end: next_offset,
                kind: RegionKind::Gap {
                    after_block: offset,
                },
            });
        } else if next_offset < end {
            warn!(offset, end, next_offset, "block overlaps its successor");
        }
    }

    if let Some(&(offset, size)) = blocks.last() {
        let end = offset.saturating_add(size);
        if end > file_len {
            warn!(offset, end, file_len, "last block runs past end of file");
        }
        spans.push(SlackSpan {
            start: end,
            end: end.max(file_len),
            kind: RegionKind::Trailing,
        });
    }

    spans
}

/// Read the contents of every slack range, in ascending offset order.
pub fn read_regions<R: Read + Seek>(source: &mut R, table: &BlockTable) -> Result<Vec<SlackRegion>> {
    let file_len = source.seek(SeekFrom::End(0))?;
    let spans = locate_regions(table, file_len);

    let mut regions = Vec::with_capacity(spans.len());
    for span in spans {
        let bytes = read_span(source, &span)?;
        debug!(start = span.start, end = span.end, "slack region");
        regions.push(SlackRegion { span, bytes });
    }

    Ok(regions)
}

fn read_span<R: Read + Seek>(source: &mut R, span: &SlackSpan) -> Result<Vec<u8>> {
    let unreadable = |e| Error::UnreadableRegion {
        offset: span.start,
        len: span.len(),
        source: e,
    };

    source.seek(SeekFrom::Start(span.start)).map_err(unreadable)?;
    let mut buffer = vec![0u8; span.len() as usize];
    source.read_exact(&mut buffer).map_err(unreadable)?;
    Ok(buffer)
}

/// Concatenate the raw bytes of every slack range.
pub fn extract_unused_bytes<R: Read + Seek>(source: &mut R, table: &BlockTable) -> Result<Vec<u8>> {
    let regions = read_regions(source, table)?;
    Ok(join_regions(&regions))
}

/// Concatenate every slack range as text.
///
/// Each region is decoded on its own; with [`TextDecoding::Strict`] the
/// first region that is not valid UTF-8 aborts the extraction.
pub fn extract_unused_regions<R: Read + Seek>(
    source: &mut R,
    table: &BlockTable,
    decoding: TextDecoding,
) -> Result<String> {
    let regions = read_regions(source, table)?;
    regions_to_text(&regions, decoding)
}

pub(crate) fn join_regions(regions: &[SlackRegion]) -> Vec<u8> {
    let total = regions.iter().map(|r| r.bytes.len()).sum();
    let mut output = Vec::with_capacity(total);
    for region in regions {
        output.extend_from_slice(&region.bytes);
    }
    output
}

pub(crate) fn regions_to_text(regions: &[SlackRegion], decoding: TextDecoding) -> Result<String> {
    let mut output = String::new();
    for region in regions {
        output.push_str(&decode_text(&region.bytes, region.span.start, decoding)?);
    }
    Ok(output)
}
