//! Appliance and public IP derivation.
//!
//! Runs as the first resolution phase: the planned appliance addresses are
//! the next hops mesh route derivation references, so they must exist
//! before any route is emitted.

use log::debug;
use std::collections::BTreeMap;

use super::ResolveError;
use crate::artifacts::{FirewallInstance, IpConfiguration, PublicIpConfig};
use crate::config::{
    HubConfig, VirtualNetwork, FIREWALL_MANAGEMENT_SUBNET_NAME, FIREWALL_SUBNET_NAME,
};
use crate::utils::{cidr, naming};

/// Offset of the appliance address inside its subnet; the platform reserves
/// the first four addresses of every subnet.
const APPLIANCE_HOST_OFFSET: u32 = 4;

const DEFAULT_IP_CONFIGURATION_NAME: &str = "default";
const MANAGEMENT_IP_CONFIGURATION_NAME: &str = "management";
const PIP_SKU_TIER: &str = "Regional";
const PIP_IP_VERSION: &str = "IPv4";
const DEFAULT_THREAT_INTEL_MODE: &str = "Alert";

/// Appliance resources derived for firewall-declaring networks
#[derive(Debug, Default)]
pub struct ApplianceDerivation {
    pub firewalls: BTreeMap<String, FirewallInstance>,
    pub default_pips: BTreeMap<String, PublicIpConfig>,
    pub management_pips: BTreeMap<String, PublicIpConfig>,
}

/// Derive firewalls and their public IPs for every network declaring one.
///
/// Networks without a firewall declaration are absent from all three maps.
pub fn derive_appliances(config: &HubConfig) -> Result<ApplianceDerivation, ResolveError> {
    let mut derivation = ApplianceDerivation::default();

    for vnet in config.hub_virtual_networks.values() {
        let Some(fw) = &vnet.firewall else {
            continue;
        };

        let private_ip = appliance_address(vnet)?;
        debug!(
            "Planned appliance address {} for virtual network '{}'",
            private_ip, vnet.name
        );

        derivation.default_pips.insert(
            vnet.name.clone(),
            PublicIpConfig {
                name: naming::firewall_pip_name(&vnet.name),
                location: vnet.location.clone(),
                resource_group_name: vnet.resource_group_name.clone(),
                ip_version: PIP_IP_VERSION.to_string(),
                sku: fw.sku_tier.clone(),
                sku_tier: PIP_SKU_TIER.to_string(),
                zones: fw.zones.clone(),
            },
        );

        let management_ip_configuration = if fw.management_subnet_address_prefix.is_some() {
            derivation.management_pips.insert(
                vnet.name.clone(),
                PublicIpConfig {
                    name: naming::firewall_management_pip_name(&vnet.name),
                    location: vnet.location.clone(),
                    resource_group_name: vnet.resource_group_name.clone(),
                    ip_version: PIP_IP_VERSION.to_string(),
                    sku: fw.sku_tier.clone(),
                    sku_tier: PIP_SKU_TIER.to_string(),
                    zones: fw.zones.clone(),
                },
            );
            Some(IpConfiguration {
                name: MANAGEMENT_IP_CONFIGURATION_NAME.to_string(),
                subnet_id: naming::subnet_id(FIREWALL_MANAGEMENT_SUBNET_NAME),
                public_ip_address_id: naming::firewall_management_pip_id(&vnet.name),
            })
        } else {
            None
        };

        derivation.firewalls.insert(
            vnet.name.clone(),
            FirewallInstance {
                name: fw
                    .name
                    .clone()
                    .unwrap_or_else(|| naming::firewall_name(&vnet.name)),
                sku_name: fw.sku_name.clone(),
                sku_tier: fw.sku_tier.clone(),
                threat_intel_mode: DEFAULT_THREAT_INTEL_MODE.to_string(),
                default_ip_configuration: IpConfiguration {
                    name: DEFAULT_IP_CONFIGURATION_NAME.to_string(),
                    subnet_id: naming::subnet_id(FIREWALL_SUBNET_NAME),
                    public_ip_address_id: naming::firewall_pip_id(&vnet.name),
                },
                management_ip_configuration,
                firewall_policy_id: fw.firewall_policy_id.clone(),
                private_ip_address: private_ip,
            },
        );
    }

    Ok(derivation)
}

/// Per-network next hop addresses for mesh route derivation.
///
/// A network with a firewall uses its planned appliance address; otherwise
/// its static hub router address. Networks with neither are absent and
/// cannot serve as a routing next hop.
pub fn next_hop_addresses(
    config: &HubConfig,
    firewalls: &BTreeMap<String, FirewallInstance>,
) -> BTreeMap<String, String> {
    let mut next_hops = BTreeMap::new();
    for vnet in config.hub_virtual_networks.values() {
        if let Some(fw) = firewalls.get(&vnet.name) {
            next_hops.insert(vnet.name.clone(), fw.private_ip_address.clone());
        } else if let Some(addr) = &vnet.hub_router_ip_address {
            next_hops.insert(vnet.name.clone(), addr.clone());
        }
    }
    next_hops
}

fn appliance_address(vnet: &VirtualNetwork) -> Result<String, ResolveError> {
    let prefix = vnet
        .firewall_subnet_prefix()
        .ok_or_else(|| ResolveError::FirewallAddress {
            vnet: vnet.name.clone(),
            reason: format!("no '{}' subnet prefix declared", FIREWALL_SUBNET_NAME),
        })?;
    let net = cidr::parse_prefix(prefix).map_err(|reason| ResolveError::FirewallAddress {
        vnet: vnet.name.clone(),
        reason,
    })?;
    let addr =
        cidr::offset_host(&net, APPLIANCE_HOST_OFFSET).map_err(|reason| {
            ResolveError::FirewallAddress {
                vnet: vnet.name.clone(),
                reason,
            }
        })?;
    Ok(addr.to_string())
}
