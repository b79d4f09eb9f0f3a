//! Route derivation.
//!
//! Each network's table is the concatenation of routes derived from its
//! mesh peers' routing address spaces and the routes the declarer supplied
//! verbatim. The map carries a key for every declared network so consumers
//! see empty tables explicitly.

use log::warn;
use std::collections::{BTreeMap, HashSet};

use super::ResolveError;
use crate::artifacts::ResolvedRoute;
use crate::config::{HubConfig, NextHopType};
use crate::utils::naming;

/// Derive the per-network route map.
///
/// `next_hops` is the phase-one address map: appliance addresses for
/// firewall-declaring networks, static hub router addresses otherwise. A
/// mesh peer absent from it contributes no routes anywhere; the gap is
/// logged and resolution continues, since a routing gap for one pair must
/// not block unrelated networks.
pub fn derive_routes(
    config: &HubConfig,
    next_hops: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, Vec<ResolvedRoute>>, ResolveError> {
    for vnet in config.hub_virtual_networks.values() {
        if vnet.mesh_peering_enabled
            && !vnet.routing_prefixes().is_empty()
            && !next_hops.contains_key(&vnet.name)
        {
            warn!(
                "Virtual network '{}' advertises routing prefixes but has neither a firewall \
                 nor a hub router address; peers will not receive routes toward it",
                vnet.name
            );
        }
    }

    let mut route_map = BTreeMap::new();
    for vnet in config.hub_virtual_networks.values() {
        let mut table = Vec::new();

        if vnet.mesh_peering_enabled {
            for peer in config.hub_virtual_networks.values() {
                if !peer.mesh_peering_enabled || peer.name == vnet.name {
                    continue;
                }
                let Some(next_hop) = next_hops.get(&peer.name) else {
                    continue;
                };
                for prefix in peer.routing_prefixes() {
                    table.push(ResolvedRoute {
                        name: naming::mesh_route_name(&peer.name, prefix),
                        address_prefix: prefix.clone(),
                        next_hop_type: NextHopType::VirtualAppliance,
                        next_hop_ip_address: Some(next_hop.clone()),
                    });
                }
            }
        }

        for entry in &vnet.route_table_entries {
            table.push(ResolvedRoute {
                name: entry.name.clone(),
                address_prefix: entry.address_prefix.clone(),
                next_hop_type: entry.next_hop_type.clone(),
                next_hop_ip_address: entry.next_hop_ip_address.clone(),
            });
        }

        ensure_unique_names(&vnet.name, &table)?;
        route_map.insert(vnet.name.clone(), table);
    }

    Ok(route_map)
}

/// Route names must be unique within one table; the derived and declared
/// sets share a namespace.
fn ensure_unique_names(vnet: &str, table: &[ResolvedRoute]) -> Result<(), ResolveError> {
    let mut seen = HashSet::new();
    for route in table {
        if !seen.insert(route.name.as_str()) {
            return Err(ResolveError::DuplicateRouteName {
                vnet: vnet.to_string(),
                name: route.name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RouteEntryConfig, VirtualNetwork};

    fn vnet(name: &str, mesh: bool) -> VirtualNetwork {
        VirtualNetwork {
            name: name.to_string(),
            address_space: vec![],
            location: "eastus".to_string(),
            resource_group_name: String::new(),
            resource_group_creation_enabled: false,
            resource_group_lock_enabled: false,
            resource_group_lock_name: None,
            mesh_peering_enabled: mesh,
            routing_address_space: None,
            hub_router_ip_address: None,
            firewall: None,
            route_table_entries: vec![],
            subnets: BTreeMap::new(),
        }
    }

    fn config_of(vnets: Vec<VirtualNetwork>) -> HubConfig {
        HubConfig {
            hub_virtual_networks: vnets
                .into_iter()
                .map(|v| (v.name.clone(), v))
                .collect(),
        }
    }

    fn next_hops(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(name, addr)| (name.to_string(), addr.to_string()))
            .collect()
    }

    fn sorted(mut table: Vec<ResolvedRoute>) -> Vec<ResolvedRoute> {
        table.sort_by(|a, b| a.name.cmp(&b.name));
        table
    }

    #[test]
    fn test_no_routing_address_space_yields_empty_tables() {
        let config = config_of(vec![vnet("vnet0", true), vnet("vnet1", true)]);
        let hops = next_hops(&[("vnet0", "172.16.0.1"), ("vnet1", "172.16.0.2")]);
        let routes = derive_routes(&config, &hops).unwrap();
        assert_eq!(routes.len(), 2);
        assert!(routes["vnet0"].is_empty());
        assert!(routes["vnet1"].is_empty());
    }

    #[test]
    fn test_empty_routing_address_space_yields_empty_tables() {
        let mut a = vnet("vnet0", true);
        a.routing_address_space = Some(vec![]);
        let mut b = vnet("vnet1", true);
        b.routing_address_space = Some(vec![]);
        let hops = next_hops(&[("vnet0", "172.16.0.1"), ("vnet1", "172.16.0.2")]);
        let routes = derive_routes(&config_of(vec![a, b]), &hops).unwrap();
        assert!(routes["vnet0"].is_empty());
        assert!(routes["vnet1"].is_empty());
    }

    #[test]
    fn test_uni_directional_route() {
        let a = vnet("vnet0", true);
        let mut b = vnet("vnet1", true);
        b.routing_address_space = Some(vec!["10.0.0.0/16".to_string()]);
        let hops = next_hops(&[("vnet0", "172.16.0.1"), ("vnet1", "172.16.0.2")]);

        let routes = derive_routes(&config_of(vec![a, b]), &hops).unwrap();
        assert_eq!(
            routes["vnet0"],
            vec![ResolvedRoute {
                name: "vnet1-10.0.0.0/16".to_string(),
                address_prefix: "10.0.0.0/16".to_string(),
                next_hop_type: NextHopType::VirtualAppliance,
                next_hop_ip_address: Some("172.16.0.2".to_string()),
            }]
        );
        assert!(routes["vnet1"].is_empty());
    }

    #[test]
    fn test_bi_directional_routes() {
        let mut a = vnet("vnet0", true);
        a.routing_address_space = Some(vec!["10.0.0.0/16".to_string()]);
        let mut b = vnet("vnet1", true);
        b.routing_address_space = Some(vec!["10.1.0.0/16".to_string()]);
        let hops = next_hops(&[("vnet0", "10.0.255.4"), ("vnet1", "10.1.255.4")]);

        let routes = derive_routes(&config_of(vec![a, b]), &hops).unwrap();
        assert_eq!(routes["vnet0"][0].name, "vnet1-10.1.0.0/16");
        assert_eq!(
            routes["vnet0"][0].next_hop_ip_address.as_deref(),
            Some("10.1.255.4")
        );
        assert_eq!(routes["vnet1"][0].name, "vnet0-10.0.0.0/16");
        assert_eq!(
            routes["vnet1"][0].next_hop_ip_address.as_deref(),
            Some("10.0.255.4")
        );
    }

    #[test]
    fn test_one_route_per_advertised_prefix() {
        let a = vnet("vnet0", true);
        let mut b = vnet("vnet1", true);
        b.routing_address_space = Some(vec!["10.1.0.0/16".to_string(), "10.2.0.0/16".to_string()]);
        let hops = next_hops(&[("vnet1", "172.16.0.2")]);

        let routes = derive_routes(&config_of(vec![a, b]), &hops).unwrap();
        let table = sorted(routes["vnet0"].clone());
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].name, "vnet1-10.1.0.0/16");
        assert_eq!(table[1].name, "vnet1-10.2.0.0/16");
        assert!(table
            .iter()
            .all(|r| r.next_hop_ip_address.as_deref() == Some("172.16.0.2")));
        // No self-referential routes appear in the advertiser's own table
        assert!(routes["vnet1"].is_empty());
    }

    #[test]
    fn test_non_mesh_network_receives_no_derived_routes() {
        let mut advertiser = vnet("vnet0", true);
        advertiser.routing_address_space = Some(vec!["10.0.0.0/16".to_string()]);
        let bystander = vnet("standalone", false);
        let hops = next_hops(&[("vnet0", "172.16.0.1")]);

        let routes = derive_routes(&config_of(vec![advertiser, bystander]), &hops).unwrap();
        assert!(routes["standalone"].is_empty());
    }

    #[test]
    fn test_peer_without_next_hop_is_skipped() {
        let a = vnet("vnet0", true);
        let mut b = vnet("vnet1", true);
        b.routing_address_space = Some(vec!["10.1.0.0/16".to_string()]);
        // vnet1 has no entry in the next hop map
        let hops = next_hops(&[("vnet0", "172.16.0.1")]);

        let routes = derive_routes(&config_of(vec![a, b]), &hops).unwrap();
        assert!(routes["vnet0"].is_empty());
        assert!(routes["vnet1"].is_empty());
    }

    #[test]
    fn test_user_routes_pass_through_unchanged() {
        let mut a = vnet("vnet0", true);
        a.route_table_entries = vec![
            RouteEntryConfig {
                name: "no_internet".to_string(),
                address_prefix: "0.0.0.0/0".to_string(),
                next_hop_type: NextHopType::None,
                next_hop_ip_address: None,
            },
            RouteEntryConfig {
                name: "intranet".to_string(),
                address_prefix: "10.0.0.0/16".to_string(),
                next_hop_type: NextHopType::VnetLocal,
                next_hop_ip_address: None,
            },
        ];
        let routes = derive_routes(&config_of(vec![a]), &BTreeMap::new()).unwrap();
        let table = sorted(routes["vnet0"].clone());
        assert_eq!(
            table,
            vec![
                ResolvedRoute {
                    name: "intranet".to_string(),
                    address_prefix: "10.0.0.0/16".to_string(),
                    next_hop_type: NextHopType::VnetLocal,
                    next_hop_ip_address: None,
                },
                ResolvedRoute {
                    name: "no_internet".to_string(),
                    address_prefix: "0.0.0.0/0".to_string(),
                    next_hop_type: NextHopType::None,
                    next_hop_ip_address: None,
                },
            ]
        );
    }

    #[test]
    fn test_derived_and_declared_routes_share_one_table() {
        let mut a = vnet("vnet0", true);
        a.route_table_entries = vec![RouteEntryConfig {
            name: "no_internet".to_string(),
            address_prefix: "0.0.0.0/0".to_string(),
            next_hop_type: NextHopType::None,
            next_hop_ip_address: None,
        }];
        let mut b = vnet("vnet1", true);
        b.routing_address_space = Some(vec!["10.1.0.0/16".to_string()]);
        let hops = next_hops(&[("vnet1", "172.16.0.2")]);

        let routes = derive_routes(&config_of(vec![a, b]), &hops).unwrap();
        let table = sorted(routes["vnet0"].clone());
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].name, "no_internet");
        assert_eq!(table[1].name, "vnet1-10.1.0.0/16");
    }

    #[test]
    fn test_route_name_collision_fails_resolution() {
        let mut a = vnet("vnet0", true);
        a.route_table_entries = vec![RouteEntryConfig {
            name: "vnet1-10.1.0.0/16".to_string(),
            address_prefix: "0.0.0.0/0".to_string(),
            next_hop_type: NextHopType::None,
            next_hop_ip_address: None,
        }];
        let mut b = vnet("vnet1", true);
        b.routing_address_space = Some(vec!["10.1.0.0/16".to_string()]);
        let hops = next_hops(&[("vnet1", "172.16.0.2")]);

        let result = derive_routes(&config_of(vec![a, b]), &hops);
        assert!(matches!(
            result,
            Err(ResolveError::DuplicateRouteName { ref vnet, ref name })
                if vnet == "vnet0" && name == "vnet1-10.1.0.0/16"
        ));
    }
}
