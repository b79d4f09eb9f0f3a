//! # Hubnet - Topology compiler for hub-and-spoke virtual network deployments
//!
//! This library derives the full cross-cutting resource set needed to
//! connect a group of virtual networks through a shared hub.
//!
//! ## Overview
//!
//! Hubnet consumes a declarative document describing the virtual networks
//! attached to a hub and resolves every artifact a provisioning engine
//! needs to wire them together: peering entries, route tables, subnet
//! route-table associations, firewall and public IP plans, and resource
//! group aggregation. The resolver is a pure function over one immutable
//! declaration snapshot, so the same input always produces the same
//! artifact document.
//!
//! ## Key Features
//!
//! - **Mesh Peering**: directed peering entries for every pair of
//!   mesh-enabled networks
//! - **Hub Routing**: routes derived from each peer's advertised routing
//!   address space, next-hopped at its firewall or static hub router
//! - **Route-Table Wiring**: generated and external route-table
//!   associations per subnet, tracked separately
//! - **Conditional Appliances**: firewall and public IP plans only for
//!   networks that declare a firewall
//! - **Deterministic Output**: stable keys and ordering for downstream
//!   diffing
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `config`: declaration data model, parsing, and validation
//! - `config_loader`: declaration document loading (YAML or JSON)
//! - `resolver`: the topology resolver and its per-artifact derivations
//! - `artifacts`: serializable derived-artifact types
//! - `utils`: CIDR parsing and derived-resource naming
//! - `orchestrator`: high-level generation flow and document output
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use hubnet::{config_loader, orchestrator};
//! use std::path::Path;
//!
//! // Load the declaration document
//! let config = config_loader::load_config(Path::new("hub.yaml"))?;
//!
//! // Derive the topology and write hub_output/hub_topology.json
//! let topology = orchestrator::generate_topology(&config, Path::new("hub_output"))?;
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Declaration Format
//!
//! Declarations use YAML (or JSON) with one entry per virtual network:
//!
//! ```yaml
//! hub_virtual_networks:
//!   hub0:
//!     name: vnet0
//!     address_space: ["10.0.0.0/16"]
//!     location: eastus
//!     resource_group_name: rg0
//!     mesh_peering_enabled: true
//!     routing_address_space: ["10.0.0.0/16"]
//!     firewall:
//!       sku_name: AZFW_VNet
//!       sku_tier: Standard
//!     subnets:
//!       AzureFirewallSubnet:
//!         address_prefixes: ["10.0.255.0/24"]
//!       workload:
//!         address_prefixes: ["10.0.1.0/24"]
//!         assign_generated_route_table: true
//! ```
//!
//! ## Error Handling
//!
//! Declaration problems (malformed CIDRs, duplicate route names, firewalls
//! without a subnet) fail the whole resolution before any artifact is
//! derived. Referential gaps between networks are logged and skipped so a
//! routing gap for one pair does not block the rest of the hub. Binary
//! entry points use `color_eyre` for error reporting with context.

pub mod artifacts;
pub mod config;
pub mod config_loader;
pub mod orchestrator;
pub mod resolver;
pub mod utils;
