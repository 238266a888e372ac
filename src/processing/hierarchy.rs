//! Layered subdivision of a supernet.
//!
//! Each layer handle is a prefix length. The bits between two consecutive
//! handles decide how many networks that layer holds; the bits after the
//! last handle are left for hosts.

use crate::config::PlannerConfig;
use crate::error::HierarchyError;
use crate::models::{NetworkDescriptor, MAX_LENGTH};
use serde::Serialize;

/// Handle used when none is given (a /24 layer).
const DEFAULT_HANDLE: u8 = 24;

/// One subdivision layer.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct HierarchyLayer {
    pub index: usize,
    pub prefix: u8,
    /// Bits added by this layer.
    pub bits: u8,
    /// Networks per parent network, `2^bits`.
    pub network_count: u64,
    pub addresses_per_network: u64,
}

/// Host part below the last layer.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct HostTail {
    pub prefix: u8,
    pub host_bits: u8,
    pub host_addresses: u64,
    pub host_usable: u64,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct HierarchyPlan {
    pub supernet: NetworkDescriptor,
    pub base_prefix: u8,
    /// Handles after ordering and clamping.
    pub handles: Vec<u8>,
    pub layers: Vec<HierarchyLayer>,
    pub host: HostTail,
}

/// Sort handles, clamp each between the previous one and /32, keep at most `max_layers`.
pub fn sanitise_handles(handles: &[u8], base_prefix: u8, config: &PlannerConfig) -> Vec<u8> {
    let minimum = base_prefix.max(config.min_layer_prefix).min(MAX_LENGTH);
    let mut sorted = handles.to_vec();
    sorted.sort_unstable();

    if sorted.is_empty() {
        return vec![DEFAULT_HANDLE.max(minimum).min(MAX_LENGTH)];
    }

    let mut cursor = minimum;
    sorted
        .into_iter()
        .take(config.max_layers)
        .map(|value| {
            let clamped = value.max(cursor).min(MAX_LENGTH);
            cursor = clamped;
            clamped
        })
        .collect()
}

/// Plan the layers of `supernet` split at `handles`.
pub fn plan_hierarchy(
    supernet: NetworkDescriptor,
    handles: &[u8],
    config: &PlannerConfig,
) -> Result<HierarchyPlan, HierarchyError> {
    if supernet.prefix_len() < config.min_layer_prefix {
        return Err(HierarchyError::SupernetTooLarge {
            supernet,
            min_prefix: config.min_layer_prefix,
        });
    }

    let base_prefix = supernet.prefix_len().max(config.min_layer_prefix).min(MAX_LENGTH);
    let handles = sanitise_handles(handles, supernet.prefix_len(), config);

    let mut previous = base_prefix;
    let layers: Vec<HierarchyLayer> = handles
        .iter()
        .enumerate()
        .map(|(index, &prefix)| {
            let bits = prefix.saturating_sub(previous);
            previous = prefix;
            HierarchyLayer {
                index,
                prefix,
                bits,
                network_count: 1u64 << bits,
                addresses_per_network: 1u64 << (MAX_LENGTH - prefix),
            }
        })
        .collect();

    let host_bits = MAX_LENGTH - previous;
    let host_addresses = 1u64 << host_bits;
    let host = HostTail {
        prefix: previous,
        host_bits,
        host_addresses,
        host_usable: if host_bits >= 2 {
            host_addresses - 2
        } else {
            host_addresses
        },
    };

    log::info!(
        "Hierarchy for {supernet}: layers {:?}, {} usable hosts per leaf",
        handles,
        host.host_usable
    );
    Ok(HierarchyPlan {
        supernet,
        base_prefix,
        handles,
        layers,
        host,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_cidr;

    #[test]
    fn test_sanitise_handles() {
        let config = PlannerConfig::default();
        assert_eq!(sanitise_handles(&[26, 20, 24], 16, &config), vec![20, 24, 26]);
        assert_eq!(sanitise_handles(&[12, 20], 16, &config), vec![16, 20]);
        assert_eq!(sanitise_handles(&[40], 16, &config), vec![32]);
        assert_eq!(sanitise_handles(&[], 16, &config), vec![24]);
        assert_eq!(sanitise_handles(&[], 28, &config), vec![28]);
        assert_eq!(
            sanitise_handles(&[17, 18, 19, 20, 21], 16, &config),
            vec![17, 18, 19, 20]
        );
    }

    #[test]
    fn test_plan_hierarchy() {
        let supernet = parse_cidr("10.0.0.0/16").unwrap();
        let plan = plan_hierarchy(supernet, &[20, 24], &PlannerConfig::default()).unwrap();
        assert_eq!(plan.base_prefix, 16);
        assert_eq!(plan.layers.len(), 2);

        assert_eq!(plan.layers[0].bits, 4);
        assert_eq!(plan.layers[0].network_count, 16);
        assert_eq!(plan.layers[0].addresses_per_network, 4096);

        assert_eq!(plan.layers[1].bits, 4);
        assert_eq!(plan.layers[1].network_count, 16);
        assert_eq!(plan.layers[1].addresses_per_network, 256);

        assert_eq!(plan.host.prefix, 24);
        assert_eq!(plan.host.host_bits, 8);
        assert_eq!(plan.host.host_addresses, 256);
        assert_eq!(plan.host.host_usable, 254);
    }

    #[test]
    fn test_plan_hierarchy_small_host_part() {
        let supernet = parse_cidr("192.168.0.0/24").unwrap();
        let plan = plan_hierarchy(supernet, &[31], &PlannerConfig::default()).unwrap();
        assert_eq!(plan.layers[0].network_count, 128);
        assert_eq!(plan.host.host_bits, 1);
        assert_eq!(plan.host.host_usable, 2);

        let plan = plan_hierarchy(supernet, &[32], &PlannerConfig::default()).unwrap();
        assert_eq!(plan.host.host_addresses, 1);
        assert_eq!(plan.host.host_usable, 1);
    }

    #[test]
    fn test_plan_hierarchy_rejects_large_supernet() {
        let supernet = parse_cidr("10.0.0.0/7").unwrap();
        assert_eq!(
            plan_hierarchy(supernet, &[16], &PlannerConfig::default()),
            Err(HierarchyError::SupernetTooLarge {
                supernet,
                min_prefix: 8
            })
        );
    }
}
