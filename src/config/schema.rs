use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default = "default_ignore_dirs")]
    pub ignore_dirs: Vec<String>,

    #[serde(default = "default_ignore_files")]
    pub ignore_files: Vec<String>,

    #[serde(default = "default_source_extensions")]
    pub source_extensions: Vec<String>,

    #[serde(default = "default_serve_command")]
    pub serve_command: Vec<String>,

    #[serde(default = "default_grace_secs")]
    pub grace_secs: u64,

    #[serde(default = "default_branch_prefix")]
    pub branch_prefix: String,

    #[serde(default = "default_report_file")]
    pub report_file: String,

    #[serde(default = "default_categories")]
    pub categories: Vec<Category>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema: None,
            ignore_dirs: default_ignore_dirs(),
            ignore_files: default_ignore_files(),
            source_extensions: default_source_extensions(),
            serve_command: default_serve_command(),
            grace_secs: default_grace_secs(),
            branch_prefix: default_branch_prefix(),
            report_file: default_report_file(),
            categories: default_categories(),
        }
    }
}

impl Config {
    pub fn base_branch(&self) -> String {
        format!("{}_base", self.branch_prefix)
    }
}

fn default_ignore_dirs() -> Vec<String> {
    ["node_modules", ".git", "build", "dist", "coverage"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_ignore_files() -> Vec<String> {
    [".DS_Store", "package-lock.json", "yarn.lock"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_source_extensions() -> Vec<String> {
    [".js", ".jsx", ".ts", ".tsx"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_serve_command() -> Vec<String> {
    ["npm", "run", "dev"].iter().map(|s| s.to_string()).collect()
}

fn default_grace_secs() -> u64 {
    5
}

fn default_branch_prefix() -> String {
    "fix".to_string()
}

fn default_report_file() -> String {
    "cleanup_report.json".to_string()
}

/// A named target folder plus the filename patterns that route files into it.
/// Order is significant: the first matching category wins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub name: String,
    pub patterns: Vec<String>,
}

impl Category {
    fn new(name: &str, patterns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            patterns: patterns.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn default_categories() -> Vec<Category> {
    vec![
        Category::new("components", &[".jsx", ".tsx"]),
        Category::new("hooks", &["use"]),
        Category::new("pages", &["Page", "pages"]),
        Category::new("styles", &[".css", ".scss", ".less"]),
        Category::new("utils", &["utils", "helper"]),
        Category::new("tests", &[".test.js", ".spec.js"]),
        Category::new("assets", &[".png", ".jpg", ".svg", ".gif"]),
        Category::new("configs", &[".yaml", ".yml"]),
        Category::new("docs", &[".md", ".markdown"]),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PackageJson {
    pub name: Option<String>,

    pub version: Option<String>,

    #[serde(default)]
    pub dependencies: HashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct ResolvedConfig {
    pub root: PathBuf,
    pub config: Config,
    pub package_json: Option<PackageJson>,
}
