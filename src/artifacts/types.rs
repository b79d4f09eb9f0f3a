//! Derived-artifact type definitions.
//!
//! This module contains the serializable output types of a resolution pass:
//! peering entries, route tables, route-table associations, firewall and
//! public IP plans, and resource group records.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::NextHopType;

// ============================================================================
// Connectivity
// ============================================================================

/// One directed peering between two mesh-enabled virtual networks.
///
/// An unordered pair of networks produces two of these, one per direction.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PeeringEntry {
    /// Name of the network this peering is attached to
    pub virtual_network_name: String,
    /// Reference to the remote network's planned resource id
    pub remote_virtual_network_id: String,
}

/// A resolved route table entry, derived or passed through.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ResolvedRoute {
    pub name: String,
    pub address_prefix: String,
    pub next_hop_type: NextHopType,
    /// Set exactly when the next hop is a virtual appliance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_hop_ip_address: Option<String>,
}

/// Association of one subnet to a route table.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RouteTableAssociation {
    pub name: String,
    pub subnet_id: String,
    pub route_table_id: String,
}

// ============================================================================
// Appliances
// ============================================================================

/// Planned public IP for a firewall IP configuration.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PublicIpConfig {
    pub name: String,
    pub location: String,
    pub resource_group_name: String,
    pub ip_version: String,
    /// Mirrors the firewall's SKU tier
    pub sku: String,
    pub sku_tier: String,
    /// Absent means the provider default zone redundancy; serialized as null
    /// so consumers see the field either way
    pub zones: Option<Vec<String>>,
}

/// One IP configuration attached to a firewall.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct IpConfiguration {
    pub name: String,
    pub subnet_id: String,
    pub public_ip_address_id: String,
}

/// Planned firewall for a virtual network.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FirewallInstance {
    pub name: String,
    pub sku_name: String,
    pub sku_tier: String,
    pub threat_intel_mode: String,
    pub default_ip_configuration: IpConfiguration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub management_ip_configuration: Option<IpConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firewall_policy_id: Option<String>,
    /// Address the appliance will hold inside its subnet; mesh routes in
    /// peer networks use it as their next hop
    pub private_ip_address: String,
}

/// Aggregate record for a resource group to be created.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ResourceGroupData {
    pub name: String,
    pub location: String,
    pub lock_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_name: Option<String>,
}

// ============================================================================
// Resolution
// ============================================================================

/// Full derived artifact set of one resolution pass.
///
/// Peering, firewall, and public IP maps are keyed by network name and omit
/// networks that derive nothing; the route map carries a key for every
/// network, empty tables included. Association maps are keyed by
/// `{vnet}-{subnetKey}`.
#[derive(Serialize, Debug, Default)]
pub struct Resolution {
    pub hub_peering_map: BTreeMap<String, PeeringEntry>,
    pub route_map: BTreeMap<String, Vec<ResolvedRoute>>,
    pub subnet_route_table_association_map: BTreeMap<String, RouteTableAssociation>,
    pub subnet_external_route_table_association_map: BTreeMap<String, RouteTableAssociation>,
    pub fw_default_ip_configuration_pip: BTreeMap<String, PublicIpConfig>,
    pub fw_management_ip_configuration_pip: BTreeMap<String, PublicIpConfig>,
    pub firewalls: BTreeMap<String, FirewallInstance>,
    pub resource_group_data: Vec<ResourceGroupData>,
}
