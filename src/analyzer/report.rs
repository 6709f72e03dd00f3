//! Serializable analysis reports.

use crate::container::BlockDescriptor;
use crate::error::Result;
use crate::slack::{SlackRegion, SlackSpan};
use serde::Serialize;
use std::path::PathBuf;

/// Characters of each region kept in the report preview.
pub const PREVIEW_CHARS: usize = 64;

/// A live block as listed in a report.
#[derive(Debug, Clone, Serialize)]
pub struct BlockEntry {
    pub offset: u64,
    pub size: u64,
    pub end: u64,
    pub pointers: Vec<u64>,
}

impl From<&BlockDescriptor> for BlockEntry {
    fn from(block: &BlockDescriptor) -> Self {
        Self {
            offset: block.offset,
            size: block.size,
            end: block.end(),
            pointers: block.pointers.clone(),
        }
    }
}

/// A slack region as listed in a report.
#[derive(Debug, Clone, Serialize)]
pub struct RegionEntry {
    #[serde(flatten)]
    pub span: SlackSpan,
    pub len: u64,
    /// Lossy text rendering of the first bytes of the region.
    pub preview: String,
}

impl From<&SlackRegion> for RegionEntry {
    fn from(region: &SlackRegion) -> Self {
        Self {
            span: region.span,
            len: region.bytes.len() as u64,
            preview: String::from_utf8_lossy(&region.bytes)
                .chars()
                .take(PREVIEW_CHARS)
                .collect(),
        }
    }
}

/// Everything learned about one container.
#[derive(Debug, Clone, Serialize)]
pub struct SlackReport {
    pub path: PathBuf,
    pub file_len: u64,
    pub root_offset: u64,
    pub block_count: usize,
    /// Total bytes recovered from all regions.
    pub slack_bytes: u64,
    /// Share of the file that is slack.
    pub slack_percent: f64,
    /// SHA-256 of the concatenated slack, hex encoded.
    pub sha256: String,
    pub blocks: Vec<BlockEntry>,
    pub regions: Vec<RegionEntry>,
}

impl SlackReport {
    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slack::RegionKind;

    #[test]
    fn test_region_entry_preview_truncated() {
        let region = SlackRegion {
            span: SlackSpan {
                start: 10,
                end: 110,
                kind: RegionKind::Gap { after_block: 0 },
            },
            bytes: vec![b'q'; 100],
        };
        let entry = RegionEntry::from(&region);
        assert_eq!(entry.len, 100);
        assert_eq!(entry.preview.chars().count(), PREVIEW_CHARS);
    }

    #[test]
    fn test_json_shape() {
        let report = SlackReport {
            path: PathBuf::from("disk.bin"),
            file_len: 20,
            root_offset: 0,
            block_count: 1,
            slack_bytes: 4,
            slack_percent: 20.0,
            sha256: String::new(),
            blocks: vec![BlockEntry {
                offset: 0,
                size: 16,
                end: 16,
                pointers: vec![],
            }],
            regions: vec![RegionEntry {
                span: SlackSpan {
                    start: 16,
                    end: 20,
                    kind: RegionKind::Trailing,
                },
                len: 4,
                preview: "abcd".to_string(),
            }],
        };

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["regions"][0]["kind"], "trailing");
        assert_eq!(json["regions"][0]["start"], 16);
        assert_eq!(json["blocks"][0]["end"], 16);
    }
}
