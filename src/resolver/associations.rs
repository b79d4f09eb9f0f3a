//! Route-table association derivation.
//!
//! Subnets opt into either the per-network generated route table or an
//! externally managed one. The two association kinds land in separate maps
//! so generated-resource wiring and external references can be validated
//! independently.

use log::warn;
use std::collections::BTreeMap;

use super::ResolveError;
use crate::artifacts::RouteTableAssociation;
use crate::config::HubConfig;
use crate::utils::naming;

/// Associations derived from subnet declarations
#[derive(Debug, Default)]
pub struct AssociationDerivation {
    /// Subnets bound to their network's generated route table
    pub generated: BTreeMap<String, RouteTableAssociation>,
    /// Subnets bound to an externally supplied route table
    pub external: BTreeMap<String, RouteTableAssociation>,
}

/// Derive route-table associations for every subnet of every network.
///
/// A subnet declaring both options is bound to the external table; the
/// conflict is logged rather than rejected. Composite keys that collide
/// across networks (possible with hyphenated names) are rejected.
pub fn derive_associations(config: &HubConfig) -> Result<AssociationDerivation, ResolveError> {
    let mut derivation = AssociationDerivation::default();

    for vnet in config.hub_virtual_networks.values() {
        for (subnet_key, subnet) in &vnet.subnets {
            let key = naming::association_key(&vnet.name, subnet_key);
            let previous = if let Some(external_id) = &subnet.external_route_table_id {
                if subnet.assign_generated_route_table {
                    warn!(
                        "Subnet '{}' in virtual network '{}' requests both the generated route \
                         table and an external one; using the external reference",
                        subnet_key, vnet.name
                    );
                }
                derivation.external.insert(
                    key.clone(),
                    RouteTableAssociation {
                        name: key.clone(),
                        subnet_id: naming::subnet_id(subnet_key),
                        route_table_id: external_id.clone(),
                    },
                )
            } else if subnet.assign_generated_route_table {
                derivation.generated.insert(
                    key.clone(),
                    RouteTableAssociation {
                        name: key.clone(),
                        subnet_id: naming::subnet_id(subnet_key),
                        route_table_id: naming::route_table_id(&vnet.name),
                    },
                )
            } else {
                None
            };
            if previous.is_some() {
                return Err(ResolveError::DuplicateArtifactKey {
                    kind: "association",
                    key,
                });
            }
        }
    }

    Ok(derivation)
}
