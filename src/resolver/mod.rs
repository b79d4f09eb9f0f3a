//! # Topology Resolver
//!
//! Derives every cross-cutting resource needed to connect a set of virtual
//! networks through a shared hub: peering entries, route tables, subnet
//! route-table associations, firewall and public IP plans, and resource
//! group aggregation.
//!
//! ## Key Components
//!
//! - `firewall.rs`: appliance and public IP derivation, next-hop resolution
//! - `peering.rs`: directed peering entries between mesh-enabled networks
//! - `routing.rs`: mesh-derived and user-declared route tables
//! - `associations.rs`: subnet to route-table associations
//! - `groups.rs`: resource-group aggregation
//!
//! ## Resolution Order
//!
//! Resolution runs as a two-phase pipeline. Phase one derives appliances
//! and freezes each network's next-hop address (its planned firewall
//! address, or its static hub router address). Phase two derives peering,
//! routes, associations, and groups from that frozen view. The split makes
//! the one real ordering constraint explicit: mesh routes reference
//! appliance addresses, so those must resolve first.
//!
//! The resolver is a pure function over one immutable declaration snapshot;
//! the same input always derives the same artifact set.

pub mod associations;
pub mod firewall;
pub mod groups;
pub mod peering;
pub mod routing;

use log::info;

use crate::artifacts::Resolution;
use crate::config::HubConfig;

pub use associations::{derive_associations, AssociationDerivation};
pub use firewall::{derive_appliances, next_hop_addresses, ApplianceDerivation};
pub use groups::derive_resource_groups;
pub use peering::derive_peering;
pub use routing::derive_routes;

/// Errors raised while deriving artifacts from a validated declaration set
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("duplicate route name '{name}' in the table for virtual network '{vnet}'")]
    DuplicateRouteName { vnet: String, name: String },
    #[error("cannot plan a firewall address for virtual network '{vnet}': {reason}")]
    FirewallAddress { vnet: String, reason: String },
    #[error("two {kind} artifacts derive the same key '{key}'")]
    DuplicateArtifactKey { kind: &'static str, key: String },
}

/// Resolve the full artifact set for one declaration snapshot.
pub fn resolve(config: &HubConfig) -> Result<Resolution, ResolveError> {
    // Phase one: appliance addresses must exist before routes reference them
    let appliances = firewall::derive_appliances(config)?;
    let next_hops = firewall::next_hop_addresses(config, &appliances.firewalls);

    // Phase two: everything else derives from the frozen declaration view
    let hub_peering_map = peering::derive_peering(config)?;
    let route_map = routing::derive_routes(config, &next_hops)?;
    let associations = associations::derive_associations(config)?;
    let resource_group_data = groups::derive_resource_groups(config);

    info!(
        "Resolved {} peering entries, {} route tables, {} firewalls, {} resource groups",
        hub_peering_map.len(),
        route_map.len(),
        appliances.firewalls.len(),
        resource_group_data.len()
    );

    Ok(Resolution {
        hub_peering_map,
        route_map,
        subnet_route_table_association_map: associations.generated,
        subnet_external_route_table_association_map: associations.external,
        fw_default_ip_configuration_pip: appliances.default_pips,
        fw_management_ip_configuration_pip: appliances.management_pips,
        firewalls: appliances.firewalls,
        resource_group_data,
    })
}
