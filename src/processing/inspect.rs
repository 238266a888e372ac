//! Per-entry address insight.
//!
//! Describes one CIDR or bare address: its block, usable host range, where
//! the literal address sits inside that range, and what kind of address it is.

use crate::error::ParseError;
use crate::models::{
    address_class, classify, format_mask, format_wildcard, parse_address, parse_cidr,
    serialize_address, AddressRange, Ipv4Class, NetworkDescriptor, MAX_LENGTH,
};
use serde::Serialize;

/// Number of following networks listed by [`inspect`].
pub const NEXT_NETWORK_COUNT: usize = 3;

/// Everything derived from one inspected entry.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AddressInsight {
    pub network: NetworkDescriptor,
    pub mask: String,
    pub wildcard: String,
    pub class: Ipv4Class,
    /// Catalogue entry of the literal address.
    pub range: AddressRange,
    #[serde(serialize_with = "serialize_address")]
    pub first_usable: u32,
    #[serde(serialize_with = "serialize_address")]
    pub last_usable: u32,
    pub usable_host_count: u64,
    pub total_addresses: u64,
    /// Position of the literal address in the usable range, clamped to it.
    /// Also the number of usable addresses below it.
    pub host_index: u64,
    /// Usable addresses above the literal address.
    pub right_usable: u64,
    pub is_network_address: bool,
    pub is_broadcast_address: bool,
    /// Binary form with `|` at the prefix boundary.
    pub binary: String,
    pub next_networks: Vec<NetworkDescriptor>,
}

/// Parse a CIDR, or a bare address as a /32.
pub fn parse_network_or_address(text: &str) -> Result<NetworkDescriptor, ParseError> {
    let text = text.trim();
    if text.contains('/') {
        parse_cidr(text)
    } else {
        parse_address(text).map(NetworkDescriptor::host)
    }
}

/// Inspect a CIDR (`192.168.1.10/24`) or a bare address (`10.0.0.1`).
pub fn inspect(text: &str) -> Result<AddressInsight, ParseError> {
    let network = parse_network_or_address(text)?;
    Ok(inspect_network(&network))
}

pub fn inspect_network(network: &NetworkDescriptor) -> AddressInsight {
    let address = network.address();
    let first_usable = network.first_usable();
    let last_usable = network.last_usable();
    let clamped = address.clamp(first_usable, last_usable);

    AddressInsight {
        network: *network,
        mask: format_mask(network.mask()),
        wildcard: format_wildcard(network.mask()),
        class: address_class(address),
        range: classify(address),
        first_usable,
        last_usable,
        usable_host_count: last_usable as u64 - first_usable as u64 + 1,
        total_addresses: network.block_size(),
        host_index: (clamped - first_usable) as u64,
        right_usable: (last_usable - clamped) as u64,
        is_network_address: address == network.network(),
        is_broadcast_address: address == network.broadcast(),
        binary: format_binary(address, network.prefix_len()),
        next_networks: next_networks(network, NEXT_NETWORK_COUNT),
    }
}

/// Up to `count` following networks of the same prefix, stopping at 2^32.
pub fn next_networks(network: &NetworkDescriptor, count: usize) -> Vec<NetworkDescriptor> {
    std::iter::successors(network.to_network().next_network(), |n| n.next_network())
        .take(count)
        .collect()
}

/// Dotted binary octets, with `|` replacing the separator at the prefix boundary.
///
/// `192.168.1.10/24` gives `11000000.10101000.00000001|00001010`.
pub fn format_binary(addr: u32, prefix: u8) -> String {
    let mut out = String::with_capacity(36);
    for bit in 0..MAX_LENGTH {
        if bit > 0 && bit == prefix && prefix < MAX_LENGTH {
            out.push('|');
        } else if bit > 0 && bit % 8 == 0 {
            out.push('.');
        }
        let set = addr & (1u32 << (MAX_LENGTH - 1 - bit)) != 0;
        out.push(if set { '1' } else { '0' });
    }
    out
}
