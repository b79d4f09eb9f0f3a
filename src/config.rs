use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::utils::cidr;

/// Subnet name the firewall binds to, by platform convention.
pub const FIREWALL_SUBNET_NAME: &str = "AzureFirewallSubnet";

/// Subnet name for the firewall management IP configuration.
pub const FIREWALL_MANAGEMENT_SUBNET_NAME: &str = "AzureFirewallManagementSubnet";

/// Next-hop kinds a route entry can declare
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum NextHopType {
    /// Traffic is steered through a network appliance at a declared IP address
    VirtualAppliance,
    /// Traffic stays within the virtual network
    VnetLocal,
    /// Traffic is dropped
    None,
}

/// Root declaration document: named virtual networks attached to a shared hub
///
/// Keys are arbitrary document-level identifiers and need not equal the
/// declared `name` of each network; every derived artifact is keyed by the
/// declared name.
#[derive(Debug, Serialize, Deserialize)]
pub struct HubConfig {
    pub hub_virtual_networks: BTreeMap<String, VirtualNetwork>,
}

/// One virtual network attached to the hub
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VirtualNetwork {
    pub name: String,
    #[serde(default)]
    pub address_space: Vec<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub resource_group_name: String,
    #[serde(default)]
    pub resource_group_creation_enabled: bool,
    #[serde(default)]
    pub resource_group_lock_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_group_lock_name: Option<String>,
    #[serde(default)]
    pub mesh_peering_enabled: bool,
    /// CIDRs this network wants reachable via the hub; peers derive routes
    /// toward them through this network's next hop
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing_address_space: Option<Vec<String>>,
    /// Static next-hop address used when no firewall is declared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hub_router_ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firewall: Option<FirewallConfig>,
    /// User-declared route entries, passed through to the derived table
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub route_table_entries: Vec<RouteEntryConfig>,
    #[serde(default)]
    pub subnets: BTreeMap<String, SubnetConfig>,
}

impl VirtualNetwork {
    /// CIDRs this network advertises for hub routing, empty when undeclared
    pub fn routing_prefixes(&self) -> &[String] {
        self.routing_address_space.as_deref().unwrap_or(&[])
    }

    /// The address prefix the firewall subnet will occupy.
    ///
    /// The declared `AzureFirewallSubnet` subnet takes precedence; the
    /// firewall's own `subnet_address_prefix` is the fallback for networks
    /// that let the provisioning engine create the subnet.
    pub fn firewall_subnet_prefix(&self) -> Option<&str> {
        self.subnets
            .get(FIREWALL_SUBNET_NAME)
            .and_then(|s| s.address_prefixes.first())
            .map(|s| s.as_str())
            .or_else(|| {
                self.firewall
                    .as_ref()
                    .and_then(|fw| fw.subnet_address_prefix.as_deref())
            })
    }
}

/// Subnet declaration within a virtual network
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SubnetConfig {
    pub address_prefixes: Vec<String>,
    /// Request an association to the per-network generated route table
    #[serde(default)]
    pub assign_generated_route_table: bool,
    /// Associate to an externally managed route table instead
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_route_table_id: Option<String>,
}

/// User-declared route entry
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RouteEntryConfig {
    pub name: String,
    pub address_prefix: String,
    pub next_hop_type: NextHopType,
    /// Required for `VirtualAppliance`, rejected for the other kinds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_hop_ip_address: Option<String>,
}

/// Firewall declaration for a virtual network
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FirewallConfig {
    /// Resource name override; defaults to `{network}_firewall`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub sku_name: String,
    pub sku_tier: String,
    /// Prefix for the firewall subnet when the network does not declare one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet_address_prefix: Option<String>,
    /// Declaring a management subnet prefix enables the management IP
    /// configuration and its public IP
    #[serde(skip_serializing_if = "Option::is_none")]
    pub management_subnet_address_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firewall_policy_id: Option<String>,
    /// Availability zones for the firewall public IPs; absent means the
    /// provider default zone redundancy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zones: Option<Vec<String>>,
}

impl HubConfig {
    /// Validate the declaration set.
    ///
    /// Declaration errors fail the whole document; the derived artifacts are
    /// provisioned together, so no partial resolution is attempted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut declared_names = HashSet::new();

        for (key, vnet) in &self.hub_virtual_networks {
            if vnet.name.is_empty() {
                return Err(ValidationError::InvalidVirtualNetwork(format!(
                    "entry '{}' declares an empty name",
                    key
                )));
            }
            if !declared_names.insert(vnet.name.as_str()) {
                return Err(ValidationError::InvalidVirtualNetwork(format!(
                    "name '{}' is declared more than once; derived keys would collide",
                    vnet.name
                )));
            }

            for prefix in &vnet.address_space {
                cidr::parse_prefix(prefix).map_err(|e| {
                    ValidationError::InvalidVirtualNetwork(format!(
                        "'{}' has a malformed address space entry: {}",
                        vnet.name, e
                    ))
                })?;
            }
            for prefix in vnet.routing_prefixes() {
                cidr::parse_prefix(prefix).map_err(|e| {
                    ValidationError::InvalidVirtualNetwork(format!(
                        "'{}' has a malformed routing address space entry: {}",
                        vnet.name, e
                    ))
                })?;
            }
            if let Some(addr) = &vnet.hub_router_ip_address {
                cidr::parse_ip(addr).map_err(|e| {
                    ValidationError::InvalidVirtualNetwork(format!(
                        "'{}' has a malformed hub router address: {}",
                        vnet.name, e
                    ))
                })?;
            }
            if vnet.resource_group_creation_enabled && vnet.resource_group_name.is_empty() {
                return Err(ValidationError::InvalidVirtualNetwork(format!(
                    "'{}' requests resource group creation without a resource group name",
                    vnet.name
                )));
            }

            Self::validate_subnets(vnet)?;
            Self::validate_route_entries(vnet)?;
            Self::validate_firewall(vnet)?;
        }

        Ok(())
    }

    fn validate_subnets(vnet: &VirtualNetwork) -> Result<(), ValidationError> {
        for (subnet_key, subnet) in &vnet.subnets {
            if subnet.address_prefixes.is_empty() {
                return Err(ValidationError::InvalidSubnet(format!(
                    "subnet '{}' in '{}' declares no address prefixes",
                    subnet_key, vnet.name
                )));
            }
            for prefix in &subnet.address_prefixes {
                cidr::parse_prefix(prefix).map_err(|e| {
                    ValidationError::InvalidSubnet(format!(
                        "subnet '{}' in '{}' has a malformed prefix: {}",
                        subnet_key, vnet.name, e
                    ))
                })?;
            }
        }
        Ok(())
    }

    fn validate_route_entries(vnet: &VirtualNetwork) -> Result<(), ValidationError> {
        let mut names = HashSet::new();
        for entry in &vnet.route_table_entries {
            if entry.name.is_empty() {
                return Err(ValidationError::InvalidRouteEntry(format!(
                    "'{}' declares a route entry with an empty name",
                    vnet.name
                )));
            }
            if !names.insert(entry.name.as_str()) {
                return Err(ValidationError::InvalidRouteEntry(format!(
                    "route name '{}' is declared more than once in '{}'",
                    entry.name, vnet.name
                )));
            }
            cidr::parse_prefix(&entry.address_prefix).map_err(|e| {
                ValidationError::InvalidRouteEntry(format!(
                    "route '{}' in '{}' has a malformed address prefix: {}",
                    entry.name, vnet.name, e
                ))
            })?;
            match entry.next_hop_type {
                NextHopType::VirtualAppliance => {
                    let addr = entry.next_hop_ip_address.as_deref().ok_or_else(|| {
                        ValidationError::InvalidRouteEntry(format!(
                            "route '{}' in '{}' is a VirtualAppliance route without a next hop address",
                            entry.name, vnet.name
                        ))
                    })?;
                    cidr::parse_ip(addr).map_err(|e| {
                        ValidationError::InvalidRouteEntry(format!(
                            "route '{}' in '{}' has a malformed next hop address: {}",
                            entry.name, vnet.name, e
                        ))
                    })?;
                }
                NextHopType::VnetLocal | NextHopType::None => {
                    if entry.next_hop_ip_address.is_some() {
                        return Err(ValidationError::InvalidRouteEntry(format!(
                            "route '{}' in '{}' declares a next hop address for a {:?} route",
                            entry.name, vnet.name, entry.next_hop_type
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn validate_firewall(vnet: &VirtualNetwork) -> Result<(), ValidationError> {
        let Some(fw) = &vnet.firewall else {
            return Ok(());
        };
        if fw.sku_name.is_empty() || fw.sku_tier.is_empty() {
            return Err(ValidationError::InvalidFirewall(format!(
                "firewall in '{}' must declare both a SKU name and a SKU tier",
                vnet.name
            )));
        }
        let prefix = vnet.firewall_subnet_prefix().ok_or_else(|| {
            ValidationError::InvalidFirewall(format!(
                "firewall in '{}' needs a '{}' subnet or a subnet_address_prefix",
                vnet.name, FIREWALL_SUBNET_NAME
            ))
        })?;
        cidr::parse_prefix(prefix).map_err(|e| {
            ValidationError::InvalidFirewall(format!(
                "firewall subnet prefix in '{}' is malformed: {}",
                vnet.name, e
            ))
        })?;
        if let Some(mgmt) = &fw.management_subnet_address_prefix {
            cidr::parse_prefix(mgmt).map_err(|e| {
                ValidationError::InvalidFirewall(format!(
                    "firewall management subnet prefix in '{}' is malformed: {}",
                    vnet.name, e
                ))
            })?;
        }
        Ok(())
    }
}

/// Declaration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid virtual network declaration: {0}")]
    InvalidVirtualNetwork(String),
    #[error("Invalid subnet declaration: {0}")]
    InvalidSubnet(String),
    #[error("Invalid route entry: {0}")]
    InvalidRouteEntry(String),
    #[error("Invalid firewall declaration: {0}")]
    InvalidFirewall(String),
}
