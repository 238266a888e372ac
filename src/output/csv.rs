//! CSV output formatting for allocated subnets.

use crate::models::{format_address, format_mask, mask_from_prefix, AllocatedBlock};
use itertools::Itertools;

use super::terminal::format_field;

/// Header row matching [`format_allocation_row`].
pub const ALLOCATION_HEADER: &str = r#" "request", "replica",  "hosts",      "subnet_cidr",           "mask",       "broadcast", "usable""#;

/// Format one allocated block as a CSV row.
pub fn format_allocation_row(block: &AllocatedBlock) -> String {
    format!(
        "{request},{replica},{hosts},{subnet},{mask},{broadcast},{usable}",
        request = format_field(block.request_id + 1, 10),
        replica = format_field(block.instance_index + 1, 10),
        hosts = format_field(block.host_capacity, 9),
        subnet = format_field(block.descriptor(), 20),
        mask = format_field(format_mask(mask_from_prefix(block.prefix_length)), 18),
        broadcast = format_field(format_address(block.broadcast_address), 18),
        usable = format_field(block.usable_hosts(), 9),
    )
}

/// Header plus one row per block, in the given order.
pub fn format_allocations(blocks: &[AllocatedBlock]) -> Vec<String> {
    std::iter::once(ALLOCATION_HEADER.to_string())
        .chain(blocks.iter().map(format_allocation_row))
        .collect()
}

/// Flatten per-request allocations into address order.
pub fn blocks_by_address(allocations: &[Vec<AllocatedBlock>]) -> Vec<AllocatedBlock> {
    allocations
        .iter()
        .flatten()
        .copied()
        .sorted_by_key(|b| b.network_address)
        .collect()
}

/// Print allocated blocks as CSV to stdout, in address order.
pub fn print_allocations(allocations: &[Vec<AllocatedBlock>]) {
    let blocks = blocks_by_address(allocations);
    log::info!("Printing {} allocated subnets", blocks.len());
    for row in format_allocations(&blocks) {
        println!("{row}");
    }
}
