//! Slack space extraction.
//!
//! Slack is every byte of the container outside the live block set: the
//! gaps between consecutive blocks and the tail after the last one.

mod extractor;
pub mod render;

pub use extractor::{
    extract_unused_bytes, extract_unused_regions, locate_regions, read_regions, RegionKind,
    SlackRegion, SlackSpan,
};
pub(crate) use extractor::{join_regions, regions_to_text};
pub use render::{decode_text, hex_dump};
