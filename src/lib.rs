pub mod analyzer;
pub mod cli;
pub mod config;
pub mod fixer;
pub mod organize;
pub mod pipeline;
pub mod report;
pub mod scanner;
pub mod validate;
pub mod vcs;
pub mod watch;

pub use pipeline::{FixDescriptor, FixKind, FixOutcome, Pipeline, PipelineReport, PipelineState};

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Result;

pub fn analyze(path: &Path) -> Result<AnalysisResult> {
    let resolved = config::load_config(path, None)?;
    analyzer::analyze_dependencies(&resolved, scanner::usage::ScanOptions::default())
}

pub fn analyze_with_config(
    path: &Path,
    config_path: Option<&Path>,
) -> Result<AnalysisResult> {
    let resolved = config::load_config(path, config_path)?;
    analyzer::analyze_dependencies(&resolved, scanner::usage::ScanOptions::default())
}

#[derive(Debug)]
pub struct AnalysisResult {
    pub status: DependencyStatus,
    pub used: HashSet<String>,
    pub unused: Vec<String>,
    pub skipped_files: Vec<PathBuf>,
    pub stats: Stats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyStatus {
    Analyzed,
    SkippedNoManifest,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Stats {
    pub files_scanned: usize,
    pub duration_ms: u64,
}

impl AnalysisResult {
    /// Result for a project without a manifest: nothing to diff, not an error.
    pub fn skipped() -> Self {
        Self {
            status: DependencyStatus::SkippedNoManifest,
            used: HashSet::new(),
            unused: Vec::new(),
            skipped_files: Vec::new(),
            stats: Stats::default(),
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.status == DependencyStatus::SkippedNoManifest
    }

    /// One fix descriptor per unused dependency, in sorted name order.
    pub fn fix_queue(&self) -> Vec<FixDescriptor> {
        self.unused
            .iter()
            .map(|name| FixDescriptor::unused_dependency(name))
            .collect()
    }
}
