//! Naming and planned-reference functions for derived resources.
//!
//! Every derived key and resource reference is produced here so the encoding
//! lives in one place. References (`*_id` handles) are symbolic: the
//! provisioning engine substitutes concrete identifiers when it materializes
//! the plan.

/// Key of a directed peering entry, `{local}-{remote}`.
///
/// Network names may themselves contain the separator, so distinct pairs
/// can encode to the same key; peering derivation detects duplicate keys
/// and rejects the document instead of overwriting.
pub fn peering_key(local: &str, remote: &str) -> String {
    format!("{}-{}", local, remote)
}

/// Name of a route derived from a peer's routing address space,
/// `{peer}-{prefix}`.
///
/// The prefix is kept verbatim, slash included. Two derived routes can only
/// collide if their (peer, prefix) pairs are equal, because a valid CIDR
/// cannot absorb the separator or a peer name. A user-declared route may
/// still collide with a derived name; route derivation detects that and
/// fails the resolution.
pub fn mesh_route_name(peer: &str, prefix: &str) -> String {
    format!("{}-{}", peer, prefix)
}

/// Key of a subnet route-table association, `{vnet}-{subnetKey}`.
///
/// Same collision posture as [`peering_key`]: association derivation
/// rejects duplicate keys.
pub fn association_key(vnet: &str, subnet_key: &str) -> String {
    format!("{}-{}", vnet, subnet_key)
}

/// Reference to a virtual network's planned resource id
pub fn virtual_network_id(name: &str) -> String {
    format!("{}_id", name)
}

/// Reference to a subnet's planned resource id
pub fn subnet_id(subnet_key: &str) -> String {
    format!("{}_id", subnet_key)
}

/// Reference to the per-network generated route table
pub fn route_table_id(vnet: &str) -> String {
    format!("{}_route_table_id", vnet)
}

/// Reference to the firewall's default public IP
pub fn firewall_pip_id(vnet: &str) -> String {
    format!("{}_fw_pip_id", vnet)
}

/// Reference to the firewall's management public IP
pub fn firewall_management_pip_id(vnet: &str) -> String {
    format!("{}_fw_mgmt_pip_id", vnet)
}

/// Default firewall resource name
pub fn firewall_name(vnet: &str) -> String {
    format!("{}_firewall", vnet)
}

/// Name of the firewall's default IP configuration public IP
pub fn firewall_pip_name(vnet: &str) -> String {
    format!("{}-fw-default-ip-configuration-pip", vnet)
}

/// Name of the firewall's management IP configuration public IP
pub fn firewall_management_pip_name(vnet: &str) -> String {
    format!("{}-fw-management-ip-configuration-pip", vnet)
}
