//! IPv4 address and CIDR notation utilities.
//!
//! Provides [`NetworkDescriptor`] for a parsed `address/prefix`, along with the
//! codec functions converting between dotted-decimal text and `u32`.

use crate::error::ParseError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

lazy_static! {
    static ref DOTTED_QUAD: Regex =
        Regex::new(r"^([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})$")
            .expect("Invalid Regex?");
}

/// Parse four dot-separated decimal octets into a `u32`.
///
/// # Examples
/// ```
/// use ipv4_planner::models::parse_address;
/// assert_eq!(parse_address("10.0.0.1").unwrap(), 0x0A000001);
/// assert!(parse_address("10.0.0.256").is_err());
/// ```
pub fn parse_address(text: &str) -> Result<u32, ParseError> {
    let invalid = || ParseError::InvalidAddress(text.to_string());
    let caps = DOTTED_QUAD.captures(text).ok_or_else(invalid)?;

    let mut addr: u32 = 0;
    for i in 1..=4 {
        let octet: u32 = caps[i].parse().map_err(|_| invalid())?;
        if octet > 255 {
            return Err(invalid());
        }
        addr = (addr << 8) | octet;
    }
    Ok(addr)
}

/// Render a `u32` as dotted-decimal text, e.g. `10.0.0.1`.
pub fn format_address(addr: u32) -> String {
    Ipv4Addr::from(addr).to_string()
}

/// Render a mask in dotted-decimal, e.g. `255.255.255.0`.
pub fn format_mask(mask: u32) -> String {
    format_address(mask)
}

/// Render the wildcard (bitwise complement) of a mask, e.g. `0.0.0.255`.
pub fn format_wildcard(mask: u32) -> String {
    format_address(!mask)
}

/// Convert a CIDR prefix length to a subnet mask as u32.
///
/// Prefix 0 yields 0. Lengths above 32 are treated as 32.
///
/// # Examples
/// ```
/// use ipv4_planner::models::mask_from_prefix;
/// assert_eq!(mask_from_prefix(24), 0xFFFFFF00);
/// assert_eq!(mask_from_prefix(0), 0);
/// ```
pub fn mask_from_prefix(len: u8) -> u32 {
    let right_len = MAX_LENGTH - len.min(MAX_LENGTH);
    let all_bits = u32::MAX as u64;
    ((all_bits >> right_len) << right_len) as u32
}

/// Host bits for a prefix length: the complement of [`mask_from_prefix`].
pub fn wildcard_from_prefix(len: u8) -> u32 {
    !mask_from_prefix(len)
}

/// Number of addresses in a block of the given prefix length (`2^(32-len)`).
pub fn total_address_count(len: u8) -> u64 {
    1u64 << (MAX_LENGTH - len.min(MAX_LENGTH))
}

/// Number of addresses assignable to hosts.
///
/// Network and broadcast are reserved, except for /31 (both usable) and /32
/// (the single address).
pub fn usable_host_count(len: u8) -> u64 {
    match len.min(MAX_LENGTH) {
        31 => 2,
        32 => 1,
        len => total_address_count(len) - 2,
    }
}

/// Longest prefix for which `addr` is a valid network address.
pub fn alignment_prefix(addr: u32) -> u8 {
    // trailing_zeros(0) == 32, so 0.0.0.0 aligns to /0
    MAX_LENGTH - addr.trailing_zeros() as u8
}

/// A parsed `address/prefix`.
///
/// The literal address is kept as entered; network, broadcast and mask are
/// derived on construction and always satisfy
/// `network <= address <= broadcast`.
#[derive(Eq, Debug, Copy, Clone, Hash)]
pub struct NetworkDescriptor {
    address: u32,
    prefix: u8,
    mask: u32,
    network: u32,
    broadcast: u32,
}

impl NetworkDescriptor {
    /// Build a descriptor from an address and prefix length (0-32).
    pub fn new(address: u32, prefix: u8) -> Result<NetworkDescriptor, ParseError> {
        if prefix > MAX_LENGTH {
            return Err(ParseError::InvalidCidr {
                input: format!("{}/{}", format_address(address), prefix),
                reason: "network length is too long".to_string(),
            });
        }
        Ok(NetworkDescriptor::host(address).with_prefix(prefix))
    }

    /// A /32 descriptor for a single address.
    pub fn host(address: u32) -> NetworkDescriptor {
        NetworkDescriptor {
            address,
            prefix: MAX_LENGTH,
            mask: u32::MAX,
            network: address,
            broadcast: address,
        }
    }

    /// The literal address as entered.
    pub fn address(&self) -> u32 {
        self.address
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix
    }

    pub fn mask(&self) -> u32 {
        self.mask
    }

    pub fn wildcard(&self) -> u32 {
        !self.mask
    }

    /// Lowest address in the block.
    pub fn network(&self) -> u32 {
        self.network
    }

    /// Highest address in the block.
    pub fn broadcast(&self) -> u32 {
        self.broadcast
    }

    /// Number of addresses in the block, `2^(32 - prefix)`.
    pub fn block_size(&self) -> u64 {
        total_address_count(self.prefix)
    }

    pub fn usable_hosts(&self) -> u64 {
        usable_host_count(self.prefix)
    }

    /// First host address (the network address itself for /31 and /32).
    pub fn first_usable(&self) -> u32 {
        if self.prefix >= MAX_LENGTH - 1 {
            self.network
        } else {
            self.network + 1
        }
    }

    /// Last host address (the broadcast address itself for /31 and /32).
    pub fn last_usable(&self) -> u32 {
        if self.prefix >= MAX_LENGTH - 1 {
            self.broadcast
        } else {
            self.broadcast - 1
        }
    }

    /// Same literal address with a different prefix length (clamped to 32).
    pub fn with_prefix(&self, prefix: u8) -> NetworkDescriptor {
        let prefix = prefix.min(MAX_LENGTH);
        let mask = mask_from_prefix(prefix);
        let network = self.address & mask;
        NetworkDescriptor {
            address: self.address,
            prefix,
            mask,
            network,
            broadcast: network | !mask,
        }
    }

    /// The same block with the literal address replaced by the network address.
    pub fn to_network(&self) -> NetworkDescriptor {
        NetworkDescriptor {
            address: self.network,
            ..*self
        }
    }

    pub fn contains(&self, addr: u32) -> bool {
        self.network <= addr && addr <= self.broadcast
    }

    /// True when `other` lies entirely inside this block.
    pub fn contains_network(&self, other: &NetworkDescriptor) -> bool {
        self.network <= other.network && other.broadcast <= self.broadcast
    }

    /// True when the two address ranges intersect.
    pub fn overlaps(&self, other: &NetworkDescriptor) -> bool {
        self.network <= other.broadcast && other.network <= self.broadcast
    }

    /// The block of the same size directly after this one, if it is below 2^32.
    pub fn next_network(&self) -> Option<NetworkDescriptor> {
        let next_bits = (self.network as u64) + self.block_size();
        let next_bits = u32::try_from(next_bits).ok()?;
        NetworkDescriptor::new(next_bits, self.prefix).ok()
    }
}

/// Parse `address/prefix` into a [`NetworkDescriptor`].
///
/// Surrounding whitespace is ignored; the prefix must be a plain decimal
/// number in `0..=32`.
///
/// # Examples
/// ```
/// use ipv4_planner::models::{format_address, parse_cidr};
/// let net = parse_cidr("192.168.1.10/24").unwrap();
/// assert_eq!(format_address(net.network()), "192.168.1.0");
/// assert_eq!(format_address(net.broadcast()), "192.168.1.255");
/// ```
pub fn parse_cidr(text: &str) -> Result<NetworkDescriptor, ParseError> {
    let addr_cidr = text.trim();
    let invalid = |reason: &str| ParseError::InvalidCidr {
        input: addr_cidr.to_string(),
        reason: reason.to_string(),
    };

    let parts: Vec<&str> = addr_cidr.split('/').collect();
    if parts.len() != 2 {
        return Err(invalid("expected address/prefix"));
    }
    let address = parse_address(parts[0]).map_err(|_| invalid("invalid address"))?;

    let prefix_str = parts[1];
    if prefix_str.is_empty()
        || prefix_str.len() > 2
        || !prefix_str.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid("invalid prefix length"));
    }
    let prefix: u8 = prefix_str
        .parse()
        .map_err(|_| invalid("invalid prefix length"))?;
    if prefix > MAX_LENGTH {
        return Err(invalid("network length is too long"));
    }

    NetworkDescriptor::new(address, prefix)
}

impl FromStr for NetworkDescriptor {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_cidr(s)
    }
}

impl std::fmt::Display for NetworkDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", Ipv4Addr::from(self.address), self.prefix)
    }
}

impl PartialEq for NetworkDescriptor {
    fn eq(&self, other: &NetworkDescriptor) -> bool {
        self.address == other.address && self.prefix == other.prefix
    }
}

impl Ord for NetworkDescriptor {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.network, self.prefix, self.address).cmp(&(other.network, other.prefix, other.address))
    }
}

impl PartialOrd for NetworkDescriptor {
    fn partial_cmp(&self, other: &NetworkDescriptor) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for NetworkDescriptor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for NetworkDescriptor {
    fn deserialize<D>(deserializer: D) -> Result<NetworkDescriptor, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_cidr(&s).map_err(de::Error::custom)
    }
}

/// Serde helper writing a `u32` address as dotted-decimal text.
pub fn serialize_address<S>(addr: &u32, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_address(*addr))
}
