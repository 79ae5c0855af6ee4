mod loader;
mod schema;

pub use loader::{generate_default_config, load_config, load_package_json};
pub use schema::{Category, Config, PackageJson, ResolvedConfig};
