//! Interface classification
//!
//! Pure mapping from an address to LAN / PUBLIC. Only the three RFC 1918
//! IPv4 ranges count as LAN; every other literal address is PUBLIC.

use std::net::IpAddr;

use super::types::InterfaceClass;

/// Suffix used by browsers to mask host candidates
pub const MDNS_SUFFIX: &str = ".local";

/// Classify a parsed IP address
pub fn classify_ip(ip: &IpAddr) -> InterfaceClass {
    match ip {
        // 10.0.0.0/8, 172.16.0.0/12, 192.168.0.0/16
        IpAddr::V4(v4) if v4.is_private() => InterfaceClass::Lan,
        _ => InterfaceClass::Public,
    }
}

/// Classify a raw connection address; names and garbage are Unknown
pub fn classify_address(address: &str) -> InterfaceClass {
    match parse_ip(address) {
        Some(ip) => classify_ip(&ip),
        None => InterfaceClass::Unknown,
    }
}

/// Parse an address literal, tolerating `[v6]` brackets
pub fn parse_ip(address: &str) -> Option<IpAddr> {
    address
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .parse()
        .ok()
}

pub fn is_ipv6_address(address: &str) -> bool {
    matches!(parse_ip(address), Some(IpAddr::V6(_)))
}

/// mDNS-obfuscated host name (`<uuid>.local`)
pub fn is_mdns_name(address: &str) -> bool {
    let address = address.trim();
    address.len() > MDNS_SUFFIX.len()
        && address.to_ascii_lowercase().ends_with(MDNS_SUFFIX)
}
