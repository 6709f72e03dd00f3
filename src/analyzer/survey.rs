//! Batch analysis of every container under a directory.

use crate::analyzer::operations::SlackAnalyzer;
use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Result of analyzing one file during a survey.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SurveyOutcome {
    /// The file parsed as a container.
    Analyzed {
        blocks: usize,
        slack_bytes: u64,
        sha256: String,
    },
    /// Analysis aborted; the message says why.
    Failed { error: String },
}

/// One surveyed file.
#[derive(Debug, Clone, Serialize)]
pub struct SurveyEntry {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: SurveyOutcome,
}

impl SurveyEntry {
    /// Whether the file was analyzed successfully.
    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, SurveyOutcome::Analyzed { .. })
    }
}

/// Analyze every regular file under `root`.
///
/// Hidden files are skipped. A file that fails to analyze is recorded as
/// [`SurveyOutcome::Failed`] and the survey moves on. Entries come back
/// sorted by path.
pub fn survey(root: &Path, config: &AnalysisConfig) -> Result<Vec<SurveyEntry>> {
    if !root.exists() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Directory not found: {}", root.display()),
        )));
    }

    let mut entries = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }

        let path = entry.into_path();
        let outcome = match analyze_one(&path, config) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "container analysis failed");
                SurveyOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        entries.push(SurveyEntry { path, outcome });
    }

    info!(root = %root.display(), files = entries.len(), "survey complete");
    Ok(entries)
}

fn analyze_one(path: &Path, config: &AnalysisConfig) -> Result<SurveyOutcome> {
    let mut analyzer = SlackAnalyzer::open(path, config.clone())?;
    let recovered = analyzer.unused_bytes()?;

    Ok(SurveyOutcome::Analyzed {
        blocks: analyzer.blocks().len(),
        slack_bytes: recovered.len() as u64,
        sha256: hex::encode(Sha256::digest(&recovered)),
    })
}
