//! Analyzer operations - the main interface.

use crate::analyzer::report::{BlockEntry, RegionEntry, SlackReport};
use crate::config::AnalysisConfig;
use crate::container::{walk_blocks, BlockDescriptor, BlockTable, Container};
use crate::error::{Error, Result};
use crate::slack::{join_regions, locate_regions, read_regions, regions_to_text, SlackRegion, SlackSpan};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::info;

/// One container with its live block set already discovered.
pub struct SlackAnalyzer {
    /// Open container file.
    container: Container,
    /// Settings the analysis ran with.
    config: AnalysisConfig,
    /// Live blocks by offset.
    table: BlockTable,
    /// Parsed blocks in ascending offset order.
    descriptors: Vec<BlockDescriptor>,
}

impl SlackAnalyzer {
    /// Open a container and discover its live blocks.
    ///
    /// # Arguments
    ///
    /// * `path` - Container file
    /// * `config` - Root offset and text decoding
    pub fn open(path: &Path, config: AnalysisConfig) -> Result<Self> {
        let mut container = Container::open(path)?;
        config
            .validate(container.len())
            .map_err(Error::InvalidConfig)?;

        let mut descriptors = Vec::new();
        let table = walk_blocks(&mut container, config.root_offset, |block| {
            descriptors.push(block.clone())
        })?;
        descriptors.sort_unstable_by_key(|block| block.offset);

        info!(
            path = %path.display(),
            file_len = container.len(),
            blocks = table.len(),
            "discovered live blocks"
        );

        Ok(Self {
            container,
            config,
            table,
            descriptors,
        })
    }

    /// Path of the analyzed container.
    pub fn path(&self) -> &Path {
        self.container.path()
    }

    /// Length of the container in bytes.
    pub fn file_len(&self) -> u64 {
        self.container.len()
    }

    /// Settings the analysis ran with.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Live blocks by offset.
    pub fn blocks(&self) -> &BlockTable {
        &self.table
    }

    /// Parsed live blocks, ascending by offset.
    pub fn descriptors(&self) -> &[BlockDescriptor] {
        &self.descriptors
    }

    /// Slack ranges without their contents.
    pub fn spans(&self) -> Vec<SlackSpan> {
        locate_regions(&self.table, self.container.len())
    }

    /// Slack ranges with their contents.
    pub fn regions(&mut self) -> Result<Vec<SlackRegion>> {
        read_regions(&mut self.container, &self.table)
    }

    /// All slack bytes, concatenated in file order.
    pub fn unused_bytes(&mut self) -> Result<Vec<u8>> {
        let regions = self.regions()?;
        Ok(join_regions(&regions))
    }

    /// All slack as text, using the configured decoding.
    pub fn unused_text(&mut self) -> Result<String> {
        let regions = self.regions()?;
        regions_to_text(&regions, self.config.decoding)
    }

    /// Build a full report of the live blocks and the recovered slack.
    pub fn report(&mut self) -> Result<SlackReport> {
        let regions = self.regions()?;
        let recovered = join_regions(&regions);
        let file_len = self.container.len();
        let slack_bytes = recovered.len() as u64;

        let slack_percent = if file_len == 0 {
            0.0
        } else {
            slack_bytes as f64 / file_len as f64 * 100.0
        };

        Ok(SlackReport {
            path: self.container.path().to_path_buf(),
            file_len,
            root_offset: self.config.root_offset,
            block_count: self.table.len(),
            slack_bytes,
            slack_percent,
            sha256: hex::encode(Sha256::digest(&recovered)),
            blocks: self.descriptors.iter().map(BlockEntry::from).collect(),
            regions: regions.iter().map(RegionEntry::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TextDecoding;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    /// Root (0..4) -> block (8..12), stale "old!" between them, "tail" after.
    fn sample() -> NamedTempFile {
        let mut data = vec![0x04, 0x08, 0x00, 0x01];
        data.extend_from_slice(b"old!");
        data.extend_from_slice(&[0x04, 0x00, 0x01, 0x01]);
        data.extend_from_slice(b"tail");
        create_test_file(&data)
    }

    #[test]
    fn test_open_discovers_blocks() {
        let file = sample();
        let analyzer = SlackAnalyzer::open(file.path(), AnalysisConfig::default()).unwrap();

        assert_eq!(analyzer.file_len(), 16);
        assert_eq!(analyzer.blocks().len(), 2);
        assert_eq!(analyzer.descriptors()[0].pointers, vec![8]);
        assert_eq!(analyzer.descriptors()[1].offset, 8);
        assert_eq!(analyzer.spans().len(), 2);
    }

    #[test]
    fn test_unused_bytes_and_text() {
        let file = sample();
        let config = AnalysisConfig::new(0, TextDecoding::Strict);
        let mut analyzer = SlackAnalyzer::open(file.path(), config).unwrap();

        assert_eq!(analyzer.unused_bytes().unwrap(), b"old!tail");
        assert_eq!(analyzer.unused_text().unwrap(), "old!tail");
    }

    #[test]
    fn test_report_digest_matches_bytes() {
        let file = sample();
        let mut analyzer = SlackAnalyzer::open(file.path(), AnalysisConfig::default()).unwrap();
        let report = analyzer.report().unwrap();

        assert_eq!(report.block_count, 2);
        assert_eq!(report.slack_bytes, 8);
        assert!((report.slack_percent - 50.0).abs() < f64::EPSILON);
        assert_eq!(report.sha256, hex::encode(Sha256::digest(b"old!tail")));
        assert_eq!(report.regions[0].preview, "old!");
    }

    #[test]
    fn test_root_offset_beyond_file_rejected() {
        let file = sample();
        let config = AnalysisConfig::new(100, TextDecoding::Raw);
        let result = SlackAnalyzer::open(file.path(), config);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}
