use crate::config::HubConfig;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and parse a hub declaration document from a YAML or JSON file
pub fn load_config(config_path: &Path) -> Result<HubConfig> {
    info!("Loading declaration document from: {:?}", config_path);

    // Open the declaration document
    let file = File::open(config_path).wrap_err_with(|| {
        format!(
            "Failed to open declaration document '{}'",
            config_path.display()
        )
    })?;

    // JSON by extension, YAML otherwise
    let config: HubConfig = if config_path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_reader(file).wrap_err("Failed to parse JSON declaration document")?
    } else {
        serde_yaml::from_reader(file).wrap_err("Failed to parse YAML declaration document")?
    };

    info!(
        "Parsed {} virtual network declaration(s)",
        config.hub_virtual_networks.len()
    );

    // Validate the declaration set
    config.validate()?;

    Ok(config)
}
