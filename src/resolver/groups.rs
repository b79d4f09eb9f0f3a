//! Resource-group aggregation.
//!
//! Networks that request group creation are collected into one aggregate
//! record per unique group name; several networks may share a new group.

use itertools::Itertools;

use crate::artifacts::ResourceGroupData;
use crate::config::HubConfig;

/// Aggregate the resource groups to be created across all networks.
///
/// Networks referencing an existing group contribute nothing. The first
/// declaring network supplies the record's location and lock settings.
pub fn derive_resource_groups(config: &HubConfig) -> Vec<ResourceGroupData> {
    config
        .hub_virtual_networks
        .values()
        .filter(|vnet| vnet.resource_group_creation_enabled)
        .map(|vnet| ResourceGroupData {
            name: vnet.resource_group_name.clone(),
            location: vnet.location.clone(),
            lock_enabled: vnet.resource_group_lock_enabled,
            lock_name: vnet.resource_group_lock_name.clone(),
        })
        .unique_by(|record| record.name.clone())
        .collect()
}
