use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use walkdir::WalkDir;

use crate::config::{Category, Config};

#[derive(Debug, Default)]
pub struct OrganizeReport {
    pub moved: Vec<(PathBuf, String)>,
    pub failed: Vec<PathBuf>,
}

/// First category whose pattern occurs in the file name wins; category order
/// decides ties.
pub fn categorize<'a>(file_name: &str, categories: &'a [Category]) -> Option<&'a str> {
    categories
        .iter()
        .find(|category| {
            category
                .patterns
                .iter()
                .any(|pattern| file_name.contains(pattern.as_str()))
        })
        .map(|category| category.name.as_str())
}

/// Move files under `root` into their category folders. The manifest and the
/// report artifact stay put, as does anything in an ignored directory. A file
/// that fails to move is recorded and the pass continues.
pub fn organize_files(root: &Path, config: &Config) -> Result<OrganizeReport> {
    let category_dirs: Vec<PathBuf> = config
        .categories
        .iter()
        .map(|c| root.join(&c.name))
        .collect();

    // Snapshot the candidates before moving anything, so the walk never sees
    // its own renames.
    let mut candidates = Vec::new();
    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        if entry.depth() == 0 {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        if entry.file_type().is_dir() {
            !config.ignore_dirs.iter().any(|d| d == name.as_ref()) && !name.starts_with('.')
        } else {
            true
        }
    });

    for entry in walker.filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.')
            || name == "package.json"
            || name == config.report_file
            || config.ignore_files.iter().any(|f| f == &name)
        {
            continue;
        }
        candidates.push((entry.path().to_path_buf(), name));
    }

    let mut report = OrganizeReport::default();

    for (path, name) in candidates {
        let Some(category) = categorize(&name, &config.categories) else {
            continue;
        };

        // Files already inside a category folder are left where they are,
        // which also makes repeated passes a no-op.
        if category_dirs.iter().any(|dir| path.starts_with(dir)) {
            continue;
        }

        let target_dir = root.join(category);

        let target = target_dir.join(&name);
        let moved = fs::create_dir_all(&target_dir)
            .and_then(|_| fs::rename(&path, &target))
            .is_ok();

        if moved {
            report.moved.push((path, category.to_string()));
        } else {
            report.failed.push(path);
        }
    }

    Ok(report)
}
