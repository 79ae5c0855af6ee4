use std::time::Instant;

use anyhow::Result;

use crate::config::ResolvedConfig;
use crate::scanner::usage::{scan_usage_with_options, ScanOptions};
use crate::{AnalysisResult, DependencyStatus, Stats};

/// Diff the manifest's declared dependencies against the imports actually
/// found in the tree. Detection only: nothing here mutates the project.
///
/// A missing manifest is not an error; the run is reported as skipped with
/// empty sets. Anything declared but never seen in an import is unused, with
/// no further heuristics.
pub fn analyze_dependencies(
    config: &ResolvedConfig,
    options: ScanOptions,
) -> Result<AnalysisResult> {
    let start = Instant::now();

    let Some(ref pkg) = config.package_json else {
        return Ok(AnalysisResult::skipped());
    };

    let outcome = scan_usage_with_options(config, options)?;

    let mut unused: Vec<String> = pkg
        .dependencies
        .keys()
        .filter(|name| !outcome.used.contains(name.as_str()))
        .cloned()
        .collect();
    unused.sort();

    Ok(AnalysisResult {
        status: DependencyStatus::Analyzed,
        used: outcome.used,
        unused,
        skipped_files: outcome.skipped_files,
        stats: Stats {
            files_scanned: outcome.files_scanned,
            duration_ms: start.elapsed().as_millis() as u64,
        },
    })
}
