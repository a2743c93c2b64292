//! Report assembly for company news coverage.
//!
//! [`ReportBuilder`] turns annotated articles into a [`report_core::Report`];
//! [`AnalysisPipeline`] drives one request through fetch, annotation, report
//! building and the optional audio summary.

pub mod audio;
pub mod builder;
pub mod config;
pub mod narrative;
pub mod pipeline;
pub mod topics;
pub mod verdict;

pub use audio::{audio_segments, truncate_summary, AudioSynthesisCoordinator, DEFAULT_SUMMARY_CHARS};
pub use builder::{ReportBuilder, DEFAULT_MAX_COMPARISONS};
pub use config::AnalysisConfig;
pub use pipeline::{AnalysisOutcome, AnalysisPipeline, AnalysisRequest, ValidatedRequest};
