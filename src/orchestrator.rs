//! Resolution orchestrator.
//!
//! This module coordinates the overall generation process, managing the
//! flow from a validated declaration document through artifact resolution
//! to the serialized topology output.

use crate::artifacts::Resolution;
use crate::config::HubConfig;
use crate::resolver;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// File the derived artifact document is written to, inside the output
/// directory
pub const TOPOLOGY_FILE_NAME: &str = "hub_topology.json";

/// Resolve a declaration set and write the derived topology document.
///
/// Returns the path of the written document.
pub fn generate_topology(config: &HubConfig, output_dir: &Path) -> Result<PathBuf> {
    let resolution = resolver::resolve(config)
        .wrap_err("Failed to derive the hub topology from the declaration set")?;
    write_resolution(&resolution, output_dir)
}

/// Serialize a resolved artifact set into the output directory.
pub fn write_resolution(resolution: &Resolution, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir).wrap_err_with(|| {
        format!(
            "Failed to create output directory '{}'",
            output_dir.display()
        )
    })?;

    let topology_path = output_dir.join(TOPOLOGY_FILE_NAME);
    let file = fs::File::create(&topology_path).wrap_err_with(|| {
        format!(
            "Failed to create topology document '{}'",
            topology_path.display()
        )
    })?;
    serde_json::to_writer_pretty(file, resolution)
        .wrap_err("Failed to serialize the topology document")?;

    info!("Generated topology document: {:?}", topology_path);
    Ok(topology_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::config::VirtualNetwork;

    fn mesh_vnet(name: &str, routing: Option<Vec<&str>>) -> VirtualNetwork {
        VirtualNetwork {
            name: name.to_string(),
            address_space: vec![],
            location: "eastus".to_string(),
            resource_group_name: "rg0".to_string(),
            resource_group_creation_enabled: false,
            resource_group_lock_enabled: false,
            resource_group_lock_name: None,
            mesh_peering_enabled: true,
            routing_address_space: routing
                .map(|prefixes| prefixes.into_iter().map(str::to_string).collect()),
            hub_router_ip_address: Some("172.16.0.1".to_string()),
            firewall: None,
            route_table_entries: vec![],
            subnets: BTreeMap::new(),
        }
    }

    #[test]
    fn test_generate_topology_writes_document() {
        let config = HubConfig {
            hub_virtual_networks: [
                ("vnet0".to_string(), mesh_vnet("vnet0", None)),
                (
                    "vnet1".to_string(),
                    mesh_vnet("vnet1", Some(vec!["10.0.0.0/16"])),
                ),
            ]
            .into_iter()
            .collect(),
        };

        let output_dir = tempfile::tempdir().unwrap();
        let path = generate_topology(&config, output_dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), TOPOLOGY_FILE_NAME);

        let document: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            document["hub_peering_map"]
                .as_object()
                .unwrap()
                .len(),
            2
        );
        assert_eq!(
            document["route_map"]["vnet0"][0]["name"],
            "vnet1-10.0.0.0/16"
        );
        assert_eq!(
            document["route_map"]["vnet0"][0]["next_hop_type"],
            "VirtualAppliance"
        );
        // Networks deriving no conditional artifacts are absent, not empty
        assert!(document["firewalls"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_output_directory_created_when_missing() {
        let config = HubConfig {
            hub_virtual_networks: [("vnet0".to_string(), mesh_vnet("vnet0", None))]
                .into_iter()
                .collect(),
        };
        let base = tempfile::tempdir().unwrap();
        let nested = base.path().join("nested").join("out");
        let path = generate_topology(&config, &nested).unwrap();
        assert!(path.exists());
    }
}
