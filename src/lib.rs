//! Block Container Slack Recovery
//!
//! Recovers the bytes of a block container that no live block owns. Such
//! slack usually holds stale payloads left behind when blocks are reused in
//! place, which makes it valuable for forensic reconstruction.
//!
//! # Container format
//!
//! - Every block starts with a base-128 varint holding its total size.
//! - Varint pointers to other blocks follow, up to a zero sentinel or the
//!   end of the block.
//! - The block at offset 0 is the root; live blocks are those reachable
//!   from it.
//!
//! # Pipeline
//!
//! ```text
//! bytes → varints → blocks → live block table → slack regions
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use block_slack::{AnalysisConfig, SlackAnalyzer};
//! use std::path::Path;
//!
//! let mut analyzer = SlackAnalyzer::open(
//!     Path::new("./container.bin"),
//!     AnalysisConfig::default(),
//! ).unwrap();
//!
//! println!("{} live blocks", analyzer.blocks().len());
//! let slack = analyzer.unused_bytes().unwrap();
//! ```

pub mod analyzer;
pub mod config;
pub mod container;
pub mod error;
pub mod slack;

pub use analyzer::{survey, SlackAnalyzer, SlackReport};
pub use config::{AnalysisConfig, TextDecoding};
pub use container::{discover_blocks, read_block, BlockDescriptor, BlockTable, Container};
pub use error::{Error, Result};
pub use slack::{extract_unused_bytes, extract_unused_regions};
