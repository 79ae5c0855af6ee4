use std::path::Path;

use anyhow::{Context, Result};

/// Remove one entry from the manifest's `dependencies` table. Returns whether
/// the entry was present. The rest of the manifest is left untouched.
pub fn remove_dependency(root: &Path, name: &str) -> Result<bool> {
    let package_json_path = root.join("package.json");

    if !package_json_path.exists() {
        return Ok(false);
    }

    let content = std::fs::read_to_string(&package_json_path)
        .with_context(|| format!("Failed to read package.json: {}", package_json_path.display()))?;

    let mut pkg: serde_json::Value =
        serde_json::from_str(&content).with_context(|| "Failed to parse package.json")?;

    let mut removed = false;

    if let Some(deps) = pkg.get_mut("dependencies") {
        if let Some(deps_obj) = deps.as_object_mut() {
            removed = deps_obj.remove(name).is_some();
        }
    }

    if removed {
        let updated_content = serde_json::to_string_pretty(&pkg)?;
        std::fs::write(&package_json_path, updated_content + "\n")
            .with_context(|| "Failed to write package.json")?;
    }

    Ok(removed)
}
