pub mod usage;

use std::collections::HashSet;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

static IMPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?:import|require)\s+['"]([\w-]+)['"]"#).unwrap());

/// Extract the externally referenced module names from one file's text.
///
/// The match is deliberately textual, not an AST walk: one `import "name"` /
/// `require "name"` shape per line, first occurrence only. It can under- or
/// over-report relative to true semantic usage; that imprecision is part of
/// the contract.
pub fn scan_source(content: &str) -> HashSet<String> {
    let mut imports = HashSet::new();

    for line in content.lines() {
        if let Some(caps) = IMPORT_RE.captures(line) {
            imports.insert(caps[1].to_string());
        }
    }

    imports
}

/// Read and scan one file. Files that cannot be read or decoded as UTF-8
/// contribute nothing; `None` marks them as skipped rather than raising.
pub fn scan_file(path: &Path) -> Option<HashSet<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Some(scan_source(&content)),
        Err(_) => None,
    }
}
