//! Shared utilities: CIDR parsing and derived-resource naming.

pub mod cidr;
pub mod naming;

pub use cidr::{is_valid_prefix, offset_host, parse_ip, parse_prefix};
