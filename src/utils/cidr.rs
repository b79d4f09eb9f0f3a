//! CIDR and IP helpers used across validation and resolution.

use ipnet::IpNet;
use std::net::IpAddr;

/// Parse an address prefix in CIDR notation
pub fn parse_prefix(prefix: &str) -> Result<IpNet, String> {
    prefix
        .parse::<IpNet>()
        .map_err(|e| format!("'{}' is not a valid CIDR prefix: {}", prefix, e))
}

/// Parse a bare IP address (IPv4 or IPv6)
pub fn parse_ip(addr: &str) -> Result<IpAddr, String> {
    addr.parse::<IpAddr>()
        .map_err(|e| format!("'{}' is not a valid IP address: {}", addr, e))
}

/// Check if a string is a valid CIDR prefix
pub fn is_valid_prefix(prefix: &str) -> bool {
    prefix.parse::<IpNet>().is_ok()
}

/// Address at a fixed offset from the base of a prefix.
///
/// Used to plan addresses the platform hands out positionally, such as the
/// firewall instance address inside its subnet. The offset must land on a
/// host address, strictly between the network and broadcast addresses.
pub fn offset_host(prefix: &IpNet, offset: u32) -> Result<IpAddr, String> {
    match prefix {
        IpNet::V4(net) => {
            let base = u32::from(net.network());
            let last = u32::from(net.broadcast());
            let host = base
                .checked_add(offset)
                .ok_or_else(|| format!("offset {} overflows prefix '{}'", offset, net))?;
            if host <= base || host >= last {
                return Err(format!(
                    "prefix '{}' has no host address at offset {}",
                    net, offset
                ));
            }
            Ok(IpAddr::V4(host.into()))
        }
        IpNet::V6(net) => {
            let base = u128::from(net.network());
            let last = u128::from(net.broadcast());
            let host = base
                .checked_add(u128::from(offset))
                .ok_or_else(|| format!("offset {} overflows prefix '{}'", offset, net))?;
            if host <= base || host >= last {
                return Err(format!(
                    "prefix '{}' has no host address at offset {}",
                    net, offset
                ));
            }
            Ok(IpAddr::V6(host.into()))
        }
    }
}
