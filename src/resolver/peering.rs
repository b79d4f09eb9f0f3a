//! Peering derivation.
//!
//! Every unordered pair of mesh-enabled networks yields two directed
//! peering entries, one per direction, keyed by the declared network names.

use itertools::Itertools;
use std::collections::BTreeMap;

use super::ResolveError;
use crate::artifacts::PeeringEntry;
use crate::config::HubConfig;
use crate::utils::naming;

/// Derive the directed peering map over all mesh-enabled networks.
///
/// N mesh-enabled networks produce `N*(N-1)` entries; networks with the
/// flag unset appear in none of them. Hyphenated network names can make
/// two distinct pairs encode to the same key; that is rejected rather than
/// silently overwritten.
pub fn derive_peering(
    config: &HubConfig,
) -> Result<BTreeMap<String, PeeringEntry>, ResolveError> {
    let mesh: Vec<_> = config
        .hub_virtual_networks
        .values()
        .filter(|vnet| vnet.mesh_peering_enabled)
        .collect();

    let mut peering = BTreeMap::new();
    for (local, remote) in mesh
        .iter()
        .cartesian_product(mesh.iter())
        .filter(|(local, remote)| local.name != remote.name)
    {
        let key = naming::peering_key(&local.name, &remote.name);
        let previous = peering.insert(
            key.clone(),
            PeeringEntry {
                virtual_network_name: local.name.clone(),
                remote_virtual_network_id: naming::virtual_network_id(&remote.name),
            },
        );
        if previous.is_some() {
            return Err(ResolveError::DuplicateArtifactKey {
                kind: "peering",
                key,
            });
        }
    }
    Ok(peering)
}
