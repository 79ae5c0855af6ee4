use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::schema::{Config, PackageJson, ResolvedConfig};

const CONFIG_FILES: &[&str] = &[
    "remend.json",
    "remend.jsonc",
    ".remendrc",
    ".remendrc.json",
];

pub fn load_config(root: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());

    let config = if let Some(path) = config_path {
        load_config_file(path)?
    } else {
        find_and_load_config(&root)?
    };

    let package_json = load_package_json(&root)?;

    Ok(ResolvedConfig {
        root,
        config,
        package_json,
    })
}

fn find_and_load_config(root: &Path) -> Result<Config> {
    for filename in CONFIG_FILES {
        let path = root.join(filename);
        if path.exists() {
            return load_config_file(&path);
        }
    }

    Ok(Config::default())
}

fn load_config_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let content = strip_json_comments(&content);

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

pub fn load_package_json(root: &Path) -> Result<Option<PackageJson>> {
    let path = root.join("package.json");
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read package.json: {}", path.display()))?;

    let pkg: PackageJson = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse package.json: {}", path.display()))?;

    Ok(Some(pkg))
}

fn strip_json_comments(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape_next = false;

    while let Some(c) = chars.next() {
        if escape_next {
            result.push(c);
            escape_next = false;
            continue;
        }

        if c == '\\' && in_string {
            result.push(c);
            escape_next = true;
            continue;
        }

        if c == '"' && !escape_next {
            in_string = !in_string;
            result.push(c);
            continue;
        }

        if in_string {
            result.push(c);
            continue;
        }

        if c == '/' {
            if let Some(&next) = chars.peek() {
                if next == '/' {
                    chars.next();
                    while let Some(&ch) = chars.peek() {
                        if ch == '\n' {
                            break;
                        }
                        chars.next();
                    }
                    continue;
                } else if next == '*' {
                    chars.next();
                    while let Some(ch) = chars.next() {
                        if ch == '*' {
                            if let Some(&'/') = chars.peek() {
                                chars.next();
                                break;
                            }
                        }
                    }
                    continue;
                }
            }
        }

        result.push(c);
    }

    result
}

pub fn generate_default_config() -> Config {
    Config {
        schema: Some("https://remend.dev/schema.json".to_string()),
        ..Config::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_strip_single_line_comments() {
        let input = r#"{
            "foo": "bar" // comment
        }"#;
        let result = strip_json_comments(input);
        assert!(!result.contains("// comment"));
        assert!(result.contains(r#""foo": "bar""#));
    }

    #[test]
    fn test_strip_multi_line_comments() {
        let input = r#"{
            /* multi
               line
               comment */
            "foo": "bar"
        }"#;
        let result = strip_json_comments(input);
        assert!(!result.contains("multi"));
        assert!(result.contains(r#""foo": "bar""#));
    }

    #[test]
    fn test_preserve_strings_with_slashes() {
        let input = r#"{"url": "https://example.com"}"#;
        let result = strip_json_comments(input);
        assert_eq!(result, input);
    }

    #[test]
    fn test_default_config() {
        let config = generate_default_config();
        assert!(config.schema.is_some());
        assert!(!config.ignore_dirs.is_empty());
    }

    #[test]
    fn test_load_config_without_files_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let resolved = load_config(temp.path(), None).unwrap();
        assert!(resolved.package_json.is_none());
        assert_eq!(resolved.config.branch_prefix, "fix");
    }

    #[test]
    fn test_load_config_reads_project_file() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("remend.json"),
            r#"{"branchPrefix": "trial", "graceSecs": 2}"#,
        )
        .unwrap();

        let resolved = load_config(temp.path(), None).unwrap();
        assert_eq!(resolved.config.branch_prefix, "trial");
        assert_eq!(resolved.config.grace_secs, 2);
        assert_eq!(resolved.config.base_branch(), "trial_base");
    }

    #[test]
    fn test_load_package_json() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("package.json"),
            r#"{"name": "demo", "dependencies": {"lodash": "^4.0.0"}}"#,
        )
        .unwrap();

        let pkg = load_package_json(temp.path()).unwrap().unwrap();
        assert_eq!(pkg.name.as_deref(), Some("demo"));
        assert!(pkg.dependencies.contains_key("lodash"));
    }
}
