//! Overlap and coverage analysis of a set of networks.
//!
//! Counts overlapping pairs, sweeps start/end events to measure covered and
//! multiply-covered addresses, and sums the gaps between sorted networks.

use super::gap_finder::find_gaps;
use crate::config::PlannerConfig;
use crate::error::AnalysisError;
use crate::models::NetworkDescriptor;
use itertools::Itertools;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Aggregate figures for a set of networks, recomputed on every call.
#[derive(Serialize, Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct OverlapReport {
    /// Number of networks analyzed.
    pub network_count: usize,
    /// Unordered pairs whose ranges intersect.
    pub overlapping_pair_count: u64,
    /// Addresses covered by two or more networks.
    pub overlapping_address_count: u64,
    /// Addresses covered by at least one network.
    pub unique_covered_address_count: u64,
    /// Sum of the individual network sizes.
    pub total_address_count: u64,
    /// Number of gap ranges between networks in sort order.
    ///
    /// This counts ranges, not addresses: the browser planner this engine
    /// replaces added each gap's size here too, making it equal to
    /// `gap_address_count`.
    pub gap_network_count: u64,
    /// Addresses in those gaps.
    pub gap_address_count: u64,
}

/// Coverage change at an address, `+1` where a network starts and `-1` after it ends.
#[derive(Debug, Copy, Clone)]
struct SweepEvent {
    position: u64,
    delta: i64,
}

/// Count unordered pairs of intersecting networks.
///
/// Networks are visited by network address; each one overlaps every earlier
/// network whose broadcast address has not been passed yet.
pub fn count_overlapping_pairs(networks: &[NetworkDescriptor]) -> u64 {
    let mut active: BinaryHeap<Reverse<u32>> = BinaryHeap::new();
    let mut pairs: u64 = 0;
    for network in networks.iter().sorted_by_key(|n| n.network()) {
        while active
            .peek()
            .is_some_and(|Reverse(broadcast)| *broadcast < network.network())
        {
            active.pop();
        }
        pairs += active.len() as u64;
        active.push(Reverse(network.broadcast()));
    }
    pairs
}

/// Sweep network boundaries and return `(overlapping, unique)` address counts.
pub fn sweep_coverage(networks: &[NetworkDescriptor]) -> (u64, u64) {
    let mut events: Vec<SweepEvent> = networks
        .iter()
        .flat_map(|n| {
            [
                SweepEvent {
                    position: n.network() as u64,
                    delta: 1,
                },
                SweepEvent {
                    position: n.broadcast() as u64 + 1,
                    delta: -1,
                },
            ]
        })
        .collect();
    events.sort_by_key(|e| e.position);

    let mut coverage: i64 = 0;
    let mut overlapping: u64 = 0;
    let mut unique: u64 = 0;
    let mut last_position: Option<u64> = None;

    for event in events {
        // every delta at one position is applied before the next segment is measured
        if let Some(last) = last_position {
            if event.position > last {
                let segment = event.position - last;
                if coverage > 0 {
                    unique += segment;
                }
                if coverage >= 2 {
                    overlapping += segment;
                }
            }
        }
        coverage += event.delta;
        last_position = Some(event.position);
    }

    (overlapping, unique)
}

/// Analyze a set of networks for overlap, coverage and gaps.
///
/// Use [`analyze_overlap_checked`] to cap the input size.
///
/// # Examples
/// ```
/// use ipv4_planner::models::parse_cidr;
/// use ipv4_planner::processing::analyze_overlap;
///
/// let nets = [parse_cidr("10.0.0.0/24").unwrap(), parse_cidr("10.0.0.128/25").unwrap()];
/// let report = analyze_overlap(&nets);
/// assert_eq!(report.overlapping_pair_count, 1);
/// assert_eq!(report.overlapping_address_count, 128);
/// assert_eq!(report.unique_covered_address_count, 256);
/// ```
pub fn analyze_overlap(networks: &[NetworkDescriptor]) -> OverlapReport {
    let (overlapping_address_count, unique_covered_address_count) = sweep_coverage(networks);
    let gaps = find_gaps(networks);

    let report = OverlapReport {
        network_count: networks.len(),
        overlapping_pair_count: count_overlapping_pairs(networks),
        overlapping_address_count,
        unique_covered_address_count,
        total_address_count: networks.iter().map(|n| n.block_size()).sum(),
        gap_network_count: gaps.len() as u64,
        gap_address_count: gaps.iter().map(|g| g.size()).sum(),
    };

    if report.overlapping_pair_count > 0 {
        log::warn!(
            "Found {} overlapping network pair(s) covering {} addresses",
            report.overlapping_pair_count,
            report.overlapping_address_count
        );
    }
    log::info!("Analyzed {} networks: {:?}", networks.len(), report);
    report
}

/// [`analyze_overlap`] refusing more networks than `config.max_networks`.
pub fn analyze_overlap_checked(
    networks: &[NetworkDescriptor],
    config: &PlannerConfig,
) -> Result<OverlapReport, AnalysisError> {
    if networks.len() > config.max_networks {
        return Err(AnalysisError::TooManyNetworks {
            count: networks.len(),
            max: config.max_networks,
        });
    }
    Ok(analyze_overlap(networks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_cidr;

    fn nets(texts: &[&str]) -> Vec<NetworkDescriptor> {
        texts.iter().map(|t| parse_cidr(t).unwrap()).collect()
    }

    #[test]
    fn test_nested_networks() {
        let report = analyze_overlap(&nets(&["10.0.0.0/24", "10.0.0.128/25"]));
        assert_eq!(report.overlapping_pair_count, 1);
        assert_eq!(report.overlapping_address_count, 128);
        assert_eq!(report.unique_covered_address_count, 256);
        assert_eq!(report.total_address_count, 384);
        assert_eq!(report.gap_network_count, 0);
        assert_eq!(report.gap_address_count, 0);
    }

    #[test]
    fn test_disjoint_networks_with_gap() {
        let report = analyze_overlap(&nets(&["192.168.0.0/24", "192.168.2.0/23"]));
        assert_eq!(report.overlapping_pair_count, 0);
        assert_eq!(report.overlapping_address_count, 0);
        assert_eq!(report.unique_covered_address_count, 768);
        assert_eq!(report.gap_network_count, 1);
        assert_eq!(report.gap_address_count, 256);
    }

    #[test]
    fn test_gap_count_is_ranges_not_addresses() {
        let report = analyze_overlap(&nets(&["10.0.0.0/24", "10.0.2.0/24", "10.0.8.0/24"]));
        assert_eq!(report.gap_network_count, 2);
        assert_eq!(report.gap_address_count, 256 + 5 * 256);
    }

    #[test]
    fn test_triple_overlap_counts_pairs() {
        let report = analyze_overlap(&nets(&["10.0.0.0/16", "10.0.1.0/24", "10.0.1.0/25"]));
        assert_eq!(report.overlapping_pair_count, 3);
        // 10.0.1.0/24 is covered two or three times
        assert_eq!(report.overlapping_address_count, 256);
        assert_eq!(report.unique_covered_address_count, 65536);
    }

    #[test]
    fn test_duplicates_and_touching_edges() {
        let report = analyze_overlap(&nets(&["10.0.0.0/25", "10.0.0.0/25", "10.0.0.128/25"]));
        assert_eq!(report.overlapping_pair_count, 1);
        assert_eq!(report.overlapping_address_count, 128);
        assert_eq!(report.unique_covered_address_count, 256);
    }

    #[test]
    fn test_whole_address_space() {
        let report = analyze_overlap(&nets(&["0.0.0.0/0", "255.255.255.255/32"]));
        assert_eq!(report.unique_covered_address_count, 1u64 << 32);
        assert_eq!(report.overlapping_address_count, 1);
        assert_eq!(report.total_address_count, (1u64 << 32) + 1);
    }

    #[test]
    fn test_single_and_empty() {
        let report = analyze_overlap(&nets(&["172.16.0.0/12"]));
        assert_eq!(report.network_count, 1);
        assert_eq!(report.overlapping_pair_count, 0);
        assert_eq!(report.unique_covered_address_count, 1 << 20);

        assert_eq!(analyze_overlap(&[]), OverlapReport::default());
    }

    #[test]
    fn test_sweep_bounds() {
        let sets = [
            nets(&["10.0.0.0/8", "10.128.0.0/9", "11.0.0.0/8", "10.200.0.0/16"]),
            nets(&["1.2.3.4/32", "1.2.3.0/30", "1.2.3.4/31", "200.0.0.0/4"]),
        ];
        for networks in &sets {
            let report = analyze_overlap(networks);
            assert!(report.overlapping_address_count <= report.unique_covered_address_count);
            assert!(report.unique_covered_address_count <= report.total_address_count);
        }
    }

    #[test]
    fn test_pair_count_matches_pairwise_check() {
        let sets = [
            nets(&["10.0.0.0/8", "10.128.0.0/9", "11.0.0.0/8", "10.200.0.0/16"]),
            nets(&["1.2.3.4/32", "1.2.3.0/30", "1.2.3.4/31", "200.0.0.0/4", "1.2.3.3/32"]),
            nets(&["10.0.0.0/25", "10.0.0.128/25", "10.0.0.0/24", "10.0.0.0/25"]),
        ];
        for networks in &sets {
            let pairwise = networks
                .iter()
                .tuple_combinations()
                .filter(|(a, b)| a.overlaps(b))
                .count() as u64;
            assert_eq!(count_overlapping_pairs(networks), pairwise);
        }
    }

    #[test]
    fn test_pair_count_beyond_u32() {
        let networks = vec![parse_cidr("10.0.0.0/24").unwrap(); 92_683];
        let report = analyze_overlap(&networks);
        assert_eq!(report.overlapping_pair_count, 4_295_022_903);
        assert!(report.overlapping_pair_count > u32::MAX as u64);
    }

    #[test]
    fn test_checked_cap() {
        let config = PlannerConfig {
            max_networks: 2,
            ..Default::default()
        };
        let networks = nets(&["10.0.0.0/24", "10.0.1.0/24", "10.0.2.0/24"]);
        assert_eq!(
            analyze_overlap_checked(&networks, &config),
            Err(AnalysisError::TooManyNetworks { count: 3, max: 2 })
        );
        assert!(analyze_overlap_checked(&networks[..2], &config).is_ok());
    }
}
