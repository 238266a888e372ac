//! Planner request and result types.

use super::ipv4::{parse_address, parse_cidr, serialize_address, usable_host_count};
use super::NetworkDescriptor;
use crate::config::PlannerConfig;
use crate::error::{AllocationError, ParseError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

fn default_replicas() -> u32 {
    1
}

/// One VLSM request: `replicas` subnets, each holding `host_capacity` hosts.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct AllocationRequest {
    /// Hosts needed per subnet. 0 asks for the smallest (2 address) block.
    #[serde(alias = "hosts")]
    pub host_capacity: u32,
    /// Number of identical subnets wanted.
    #[serde(default = "default_replicas")]
    pub replicas: u32,
}

impl AllocationRequest {
    pub fn new(host_capacity: u32, replicas: u32) -> AllocationRequest {
        AllocationRequest {
            host_capacity,
            replicas,
        }
    }

    /// Validate a text row (hosts, replicas) as typed in a form.
    ///
    /// An empty replica field means 1.
    pub fn parse(
        request_index: usize,
        hosts: &str,
        replicas: &str,
        config: &PlannerConfig,
    ) -> Result<AllocationRequest, AllocationError> {
        let host_capacity: u32 =
            hosts
                .trim()
                .parse()
                .map_err(|_| AllocationError::InvalidHostCount {
                    request_index,
                    value: hosts.to_string(),
                })?;

        let replicas_str = replicas.trim();
        let invalid_replicas = || AllocationError::InvalidReplicaCount {
            request_index,
            value: replicas.to_string(),
            max: config.max_replicas,
        };
        let replicas = if replicas_str.is_empty() {
            1
        } else {
            replicas_str.parse::<u32>().map_err(|_| invalid_replicas())?
        };
        if replicas < 1 || replicas > config.max_replicas {
            return Err(invalid_replicas());
        }

        Ok(AllocationRequest {
            host_capacity,
            replicas,
        })
    }

    /// Addresses one instance needs including network and broadcast.
    pub fn addresses_needed(&self) -> u64 {
        if self.host_capacity == 0 {
            2
        } else {
            self.host_capacity as u64 + 2
        }
    }

    /// Power-of-two block size holding [`Self::addresses_needed`].
    pub fn block_size(&self) -> u64 {
        self.addresses_needed().max(2).next_power_of_two()
    }
}

/// A subnet placed by the VLSM allocator.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct AllocatedBlock {
    /// Index of the originating request in the input list.
    pub request_id: usize,
    /// Replica number within the request, starting at 0.
    pub instance_index: u32,
    /// Hosts that were requested for this block.
    pub host_capacity: u32,
    pub prefix_length: u8,
    #[serde(serialize_with = "serialize_address")]
    pub network_address: u32,
    #[serde(serialize_with = "serialize_address")]
    pub broadcast_address: u32,
    pub block_size: u64,
}

impl AllocatedBlock {
    pub fn usable_hosts(&self) -> u64 {
        usable_host_count(self.prefix_length)
    }

    /// The block as a network descriptor.
    pub fn descriptor(&self) -> NetworkDescriptor {
        NetworkDescriptor::host(self.network_address).with_prefix(self.prefix_length)
    }
}

/// Input to the route summarizer: a CIDR or a bare address.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RouteEntry {
    Network(NetworkDescriptor),
    /// Takes the prefix of the explicit networks in the same call.
    Address(u32),
}

impl RouteEntry {
    /// Explicit prefix carried by the entry, if any.
    pub fn prefix(&self) -> Option<u8> {
        match self {
            RouteEntry::Network(net) => Some(net.prefix_len()),
            RouteEntry::Address(_) => None,
        }
    }

    /// Resolve to a network, giving bare addresses `inherited_prefix`.
    pub fn resolve(&self, inherited_prefix: u8) -> Result<NetworkDescriptor, ParseError> {
        match self {
            RouteEntry::Network(net) => Ok(*net),
            RouteEntry::Address(addr) => NetworkDescriptor::new(*addr, inherited_prefix),
        }
    }
}

impl FromStr for RouteEntry {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.contains('/') {
            Ok(RouteEntry::Network(parse_cidr(s)?))
        } else {
            Ok(RouteEntry::Address(parse_address(s)?))
        }
    }
}

impl std::fmt::Display for RouteEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            RouteEntry::Network(net) => write!(f, "{net}"),
            RouteEntry::Address(addr) => write!(f, "{}", std::net::Ipv4Addr::from(*addr)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_size() {
        assert_eq!(AllocationRequest::new(0, 1).block_size(), 2);
        assert_eq!(AllocationRequest::new(1, 1).block_size(), 4);
        assert_eq!(AllocationRequest::new(2, 1).block_size(), 4);
        assert_eq!(AllocationRequest::new(3, 1).block_size(), 8);
        assert_eq!(AllocationRequest::new(10, 1).block_size(), 16);
        assert_eq!(AllocationRequest::new(60, 1).block_size(), 64);
        assert_eq!(AllocationRequest::new(62, 1).block_size(), 64);
        assert_eq!(AllocationRequest::new(63, 1).block_size(), 128);
        assert_eq!(AllocationRequest::new(120, 1).block_size(), 128);
        assert_eq!(AllocationRequest::new(u32::MAX, 1).block_size(), 1u64 << 33);
    }

    #[test]
    fn test_parse_request_row() {
        let config = PlannerConfig::default();
        assert_eq!(
            AllocationRequest::parse(0, "120", "", &config).unwrap(),
            AllocationRequest::new(120, 1)
        );
        assert_eq!(
            AllocationRequest::parse(0, " 10 ", "4", &config).unwrap(),
            AllocationRequest::new(10, 4)
        );
        assert_eq!(
            AllocationRequest::parse(2, "-1", "1", &config),
            Err(AllocationError::InvalidHostCount {
                request_index: 2,
                value: "-1".to_string()
            })
        );
        assert!(matches!(
            AllocationRequest::parse(0, "1.5", "1", &config),
            Err(AllocationError::InvalidHostCount { .. })
        ));
        assert!(matches!(
            AllocationRequest::parse(1, "10", "0", &config),
            Err(AllocationError::InvalidReplicaCount { request_index: 1, .. })
        ));
        assert!(matches!(
            AllocationRequest::parse(1, "10", "65", &config),
            Err(AllocationError::InvalidReplicaCount { max: 64, .. })
        ));
        assert!(AllocationRequest::parse(1, "10", "64", &config).is_ok());
    }

    #[test]
    fn test_request_deserialize_defaults() {
        let req: AllocationRequest = serde_json::from_str(r#"{"hosts": 30}"#).unwrap();
        assert_eq!(req, AllocationRequest::new(30, 1));
        let req: AllocationRequest =
            serde_json::from_str(r#"{"host_capacity": 5, "replicas": 3}"#).unwrap();
        assert_eq!(req, AllocationRequest::new(5, 3));
    }

    #[test]
    fn test_route_entry_from_str() {
        let entry: RouteEntry = "192.168.0.0/24".parse().unwrap();
        assert_eq!(entry.prefix(), Some(24));
        let entry: RouteEntry = " 10.0.0.5 ".parse().unwrap();
        assert_eq!(entry, RouteEntry::Address(0x0A000005));
        assert_eq!(entry.prefix(), None);
        assert_eq!(entry.resolve(24).unwrap().to_string(), "10.0.0.5/24");
        assert!("10.0.0.5/33".parse::<RouteEntry>().is_err());
        assert!("10.0.5".parse::<RouteEntry>().is_err());
    }
}
