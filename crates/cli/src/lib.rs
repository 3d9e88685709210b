//! `stockroom` console front end: configuration loading, command parsing and
//! plain-text rendering over an [`InventorySession`](stockroom_inventory::InventorySession).

pub mod console;
pub mod render;

use std::path::Path;

use anyhow::Context;

use stockroom_inventory::InventoryConfig;

/// Load the session configuration, applying command-line overrides.
///
/// Without a path the built-in defaults are used.
pub fn load_config(
    path: Option<&Path>,
    page_size: Option<usize>,
) -> anyhow::Result<InventoryConfig> {
    let mut config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            InventoryConfig::from_json_str(&raw)
                .with_context(|| format!("invalid config file {}", path.display()))?
        }
        None => InventoryConfig::default(),
    };

    if let Some(page_size) = page_size {
        config.page_size = page_size;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}
