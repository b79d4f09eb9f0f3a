//! # Derived Artifact Types
//!
//! Output model of the topology resolver: the named maps a provisioning
//! engine consumes to materialize hub connectivity.
//!
//! ## Key Components
//!
//! - `types.rs`: serializable artifact structures and the `Resolution`
//!   document that aggregates them
//!
//! ## Consumption Contract
//!
//! The `Resolution` document is serialized to JSON by the orchestrator.
//! Conditional maps (firewalls, public IPs, associations) omit keys for
//! networks that derive nothing; consumers must tolerate absence rather
//! than expect empty placeholders. The route map is total over declared
//! networks so downstream diffing sees empty tables explicitly.

pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    FirewallInstance,
    IpConfiguration,
    PeeringEntry,
    PublicIpConfig,
    Resolution,
    ResolvedRoute,
    ResourceGroupData,
    RouteTableAssociation,
};
