use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::ResolvedConfig;
use crate::AnalysisResult;

/// The run's artifact: a stable set of keys, every value a sorted list.
/// Written whole on each run; there is no merging with earlier reports.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct CleanupReport {
    pub unused_dependencies: Vec<String>,
    pub used_dependencies: Vec<String>,
    pub organized_folders: Vec<String>,
    pub skipped_files: Vec<String>,
}

impl CleanupReport {
    pub fn from_analysis(config: &ResolvedConfig, analysis: &AnalysisResult) -> Self {
        let mut used: Vec<String> = analysis.used.iter().cloned().collect();
        used.sort();

        let mut skipped: Vec<String> = analysis
            .skipped_files
            .iter()
            .map(|path| relative_display(path, &config.root))
            .collect();
        skipped.sort();

        Self {
            unused_dependencies: analysis.unused.clone(),
            used_dependencies: used,
            organized_folders: config
                .config
                .categories
                .iter()
                .map(|c| c.name.clone())
                .collect(),
            skipped_files: skipped,
        }
    }
}

fn relative_display(path: &Path, root: &Path) -> String {
    let relative = pathdiff::diff_paths(path, root).unwrap_or_else(|| path.to_path_buf());
    relative.to_string_lossy().replace('\\', "/")
}

/// Serialize the report into the project root, replacing any earlier
/// artifact at that path. A write failure is fatal to the run.
pub fn write_report(root: &Path, file_name: &str, report: &CleanupReport) -> Result<PathBuf> {
    let path = root.join(file_name);
    let content = serde_json::to_string_pretty(report)?;

    std::fs::write(&path, content + "\n")
        .with_context(|| format!("Failed to write report: {}", path.display()))?;

    Ok(path)
}
