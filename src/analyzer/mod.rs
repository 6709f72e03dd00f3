//! Container analysis.
//!
//! Ties block discovery and slack extraction together for one container,
//! and runs the same analysis over whole directory trees.

mod operations;
mod report;
mod survey;

pub use operations::SlackAnalyzer;
pub use report::{BlockEntry, RegionEntry, SlackReport, PREVIEW_CHARS};
pub use survey::{survey, SurveyEntry, SurveyOutcome};
