//! Gap finding between networks.
//!
//! Identifies unused address ranges between networks sorted by network
//! address, and splits each range into the largest aligned CIDR blocks.

use crate::models::{alignment_prefix, serialize_address, NetworkDescriptor, MAX_LENGTH};
use itertools::Itertools;
use serde::Serialize;

/// An unused address range, both ends inclusive.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct GapRange {
    #[serde(serialize_with = "serialize_address")]
    pub start: u32,
    #[serde(serialize_with = "serialize_address")]
    pub end: u32,
}

impl GapRange {
    /// Number of addresses in the gap.
    pub fn size(&self) -> u64 {
        self.end as u64 - self.start as u64 + 1
    }
}

/// Gaps between consecutive networks in network-address order.
///
/// Only sort-order neighbours are compared: a gap is reported between two
/// neighbours even when an earlier, larger network already covers it.
pub fn find_gaps(networks: &[NetworkDescriptor]) -> Vec<GapRange> {
    networks
        .iter()
        .sorted_by_key(|n| n.network())
        .tuple_windows()
        .filter_map(|(current, next)| {
            let after_current = current.broadcast() as u64 + 1;
            if (next.network() as u64) > after_current {
                Some(GapRange {
                    start: after_current as u32,
                    end: next.network() - 1,
                })
            } else {
                None
            }
        })
        .collect()
}

/// Split a gap into the largest aligned CIDR blocks, lowest address first.
///
/// Each block is limited by the alignment of its start address and by the
/// addresses left in the gap.
pub fn gap_blocks(gap: &GapRange) -> Vec<NetworkDescriptor> {
    let mut blocks = Vec::new();
    let end = gap.end as u64;
    let mut next_ip = gap.start as u64;

    while next_ip <= end {
        let remaining = end - next_ip + 1;
        let span_prefix = MAX_LENGTH - remaining.ilog2() as u8;
        let next_mask = alignment_prefix(next_ip as u32).max(span_prefix);

        let block = NetworkDescriptor::host(next_ip as u32).with_prefix(next_mask);
        next_ip += block.block_size();
        blocks.push(block);
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{format_address, parse_cidr};

    fn nets(texts: &[&str]) -> Vec<NetworkDescriptor> {
        texts.iter().map(|t| parse_cidr(t).unwrap()).collect()
    }

    fn block_strings(gap: &GapRange) -> Vec<String> {
        gap_blocks(gap).iter().map(|b| b.to_string()).collect()
    }

    #[test]
    fn test_find_gaps_sorted() {
        let gaps = find_gaps(&nets(&["10.0.2.0/24", "10.0.0.0/24", "10.0.8.0/24"]));
        assert_eq!(gaps.len(), 2);
        assert_eq!(format_address(gaps[0].start), "10.0.1.0");
        assert_eq!(format_address(gaps[0].end), "10.0.1.255");
        assert_eq!(gaps[0].size(), 256);
        assert_eq!(format_address(gaps[1].start), "10.0.3.0");
        assert_eq!(gaps[1].size(), 5 * 256);
    }

    #[test]
    fn test_find_gaps_adjacent_and_single() {
        assert!(find_gaps(&nets(&["10.0.0.0/24", "10.0.1.0/24"])).is_empty());
        assert!(find_gaps(&nets(&["10.0.0.0/24"])).is_empty());
        assert!(find_gaps(&[]).is_empty());
    }

    #[test]
    fn test_find_gaps_top_of_space() {
        let gaps = find_gaps(&nets(&["255.255.255.0/24", "0.0.0.0/1"]));
        assert_eq!(gaps.len(), 1);
        assert_eq!(format_address(gaps[0].start), "128.0.0.0");
        assert_eq!(format_address(gaps[0].end), "255.255.254.255");
    }

    #[test]
    fn test_find_gaps_sort_order_approximation() {
        // 10.0.0.0/16 covers everything, but its sort neighbour is the /24
        let gaps = find_gaps(&nets(&["10.0.0.0/16", "10.0.0.0/24", "10.0.5.0/24"]));
        assert_eq!(gaps.len(), 1);
        assert_eq!(format_address(gaps[0].start), "10.0.1.0");
        assert_eq!(gaps[0].size(), 4 * 256);
    }

    #[test]
    fn test_gap_blocks() {
        let gap = GapRange {
            start: parse_cidr("10.0.0.0/32").unwrap().network(),
            end: parse_cidr("10.0.0.255/32").unwrap().network(),
        };
        assert_eq!(block_strings(&gap), vec!["10.0.0.0/24"]);

        // alignment limits the first block
        let gap = GapRange {
            start: parse_cidr("10.6.2.80/32").unwrap().network(),
            end: parse_cidr("10.6.7.255/32").unwrap().network(),
        };
        assert_eq!(
            block_strings(&gap),
            vec![
                "10.6.2.80/28",
                "10.6.2.96/27",
                "10.6.2.128/25",
                "10.6.3.0/24",
                "10.6.4.0/22"
            ]
        );

        // remaining span limits the last blocks
        let gap = GapRange {
            start: parse_cidr("10.0.0.0/32").unwrap().network(),
            end: parse_cidr("10.0.0.10/32").unwrap().network(),
        };
        assert_eq!(
            block_strings(&gap),
            vec!["10.0.0.0/29", "10.0.0.8/31", "10.0.0.10/32"]
        );
    }

    #[test]
    fn test_gap_blocks_cover_gap_exactly() {
        let gap = GapRange {
            start: 0x0A000003,
            end: 0x0A0123FE,
        };
        let blocks = gap_blocks(&gap);
        assert_eq!(blocks.first().unwrap().network(), gap.start);
        assert_eq!(blocks.last().unwrap().broadcast(), gap.end);
        let total: u64 = blocks.iter().map(|b| b.block_size()).sum();
        assert_eq!(total, gap.size());
        for (a, b) in blocks.iter().tuple_windows() {
            assert_eq!(a.broadcast() as u64 + 1, b.network() as u64);
        }
    }

    #[test]
    fn test_gap_blocks_whole_space() {
        let gap = GapRange {
            start: 0,
            end: u32::MAX,
        };
        assert_eq!(block_strings(&gap), vec!["0.0.0.0/0"]);
    }
}
