use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use globset::{Glob, GlobSetBuilder};
use ignore::WalkBuilder;
use indicatif::ProgressBar;
use rayon::prelude::*;

use crate::config::{Config, ResolvedConfig};

use super::scan_file;

#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub used: HashSet<String>,
    pub files_scanned: usize,
    pub skipped_files: Vec<PathBuf>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ScanOptions {
    pub progress: bool,
}

pub fn scan_usage(config: &ResolvedConfig) -> Result<ScanOutcome> {
    scan_usage_with_options(config, ScanOptions::default())
}

/// Fan the per-file scan out over rayon's pool and merge once every unit has
/// reported. The merge runs single-threaded after the join, so the hot path
/// takes no lock; set union makes the result independent of scan order.
pub fn scan_usage_with_options(
    config: &ResolvedConfig,
    options: ScanOptions,
) -> Result<ScanOutcome> {
    let files = collect_source_files(&config.root, &config.config)?;

    let bar = if options.progress {
        ProgressBar::new(files.len() as u64)
    } else {
        ProgressBar::hidden()
    };

    let results: Vec<(PathBuf, Option<HashSet<String>>)> = files
        .into_par_iter()
        .map(|path| {
            let scanned = scan_file(&path);
            bar.inc(1);
            (path, scanned)
        })
        .collect();

    bar.finish_and_clear();

    let mut outcome = ScanOutcome {
        files_scanned: results.len(),
        ..ScanOutcome::default()
    };

    for (path, scanned) in results {
        match scanned {
            Some(imports) => outcome.used.extend(imports),
            None => outcome.skipped_files.push(path),
        }
    }

    outcome.skipped_files.sort();
    Ok(outcome)
}

/// Collect every scannable file under `root`: ignored directory names are
/// matched exactly against path segments, ignored file names against the
/// file name (globs allowed), and only configured source extensions qualify.
fn collect_source_files(root: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    let ignore_dirs: HashSet<String> = config.ignore_dirs.iter().cloned().collect();

    let mut ignore_builder = GlobSetBuilder::new();
    for pattern in &config.ignore_files {
        if let Ok(glob) = Glob::new(pattern) {
            ignore_builder.add(glob);
        }
    }
    let ignore_files = ignore_builder.build()?;

    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            if entry.file_type().map_or(false, |t| t.is_dir()) {
                let name = entry.file_name().to_string_lossy();
                !ignore_dirs.contains(name.as_ref())
            } else {
                true
            }
        })
        .build();

    let mut files = Vec::new();

    for entry in walker.filter_map(Result::ok) {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if ignore_files.is_match(name) {
            continue;
        }

        if config.source_extensions.iter().any(|ext| name.ends_with(ext.as_str())) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}
