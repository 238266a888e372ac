//! VLSM allocation inside a supernet.
//!
//! Requests are placed largest first from the supernet's network address
//! upwards. Each block starts on a multiple of its own size measured from the
//! supernet base, so every block is a valid CIDR network.

use crate::config::PlannerConfig;
use crate::error::AllocationError;
use crate::models::{AllocatedBlock, AllocationRequest, NetworkDescriptor, MAX_LENGTH};
use itertools::Itertools;
use std::cmp::Reverse;

/// One replica of a request, waiting to be placed.
#[derive(Debug, Copy, Clone)]
struct Instance {
    request_index: usize,
    instance_index: u32,
    host_capacity: u32,
    block_size: u64,
}

/// Round `cursor` up to the next multiple of `block_size` counted from `base`.
///
/// A cursor below `base` aligns to `base`.
pub fn align_to_block(cursor: u64, block_size: u64, base: u64) -> u64 {
    let offset = cursor.saturating_sub(base);
    base + offset.div_ceil(block_size) * block_size
}

/// Allocate every request inside `supernet`.
///
/// Returns one list per request, in input order, holding that request's
/// replicas in instance order. The call is all-or-nothing: the first instance
/// that does not fit aborts the allocation with [`AllocationError::DoesNotFit`].
///
/// # Examples
/// ```
/// use ipv4_planner::models::{parse_cidr, AllocationRequest};
/// use ipv4_planner::processing::allocate_vlsm;
///
/// let supernet = parse_cidr("192.168.0.0/24").unwrap();
/// let plan = allocate_vlsm(supernet, &[AllocationRequest::new(60, 2)]).unwrap();
/// assert_eq!(plan[0][1].prefix_length, 26);
/// ```
pub fn allocate_vlsm(
    supernet: NetworkDescriptor,
    requests: &[AllocationRequest],
) -> Result<Vec<Vec<AllocatedBlock>>, AllocationError> {
    for (request_index, request) in requests.iter().enumerate() {
        if request.replicas == 0 {
            return Err(AllocationError::InvalidReplicaCount {
                request_index,
                value: request.replicas.to_string(),
                max: u32::MAX,
            });
        }
    }
    place(supernet, requests)
}

/// [`allocate_vlsm`] with the request-row and replica limits of `config`.
pub fn allocate_vlsm_checked(
    supernet: NetworkDescriptor,
    requests: &[AllocationRequest],
    config: &PlannerConfig,
) -> Result<Vec<Vec<AllocatedBlock>>, AllocationError> {
    if requests.len() > config.max_request_rows {
        return Err(AllocationError::TooManyRequests {
            count: requests.len(),
            max: config.max_request_rows,
        });
    }
    for (request_index, request) in requests.iter().enumerate() {
        if request.replicas < 1 || request.replicas > config.max_replicas {
            return Err(AllocationError::InvalidReplicaCount {
                request_index,
                value: request.replicas.to_string(),
                max: config.max_replicas,
            });
        }
    }
    place(supernet, requests)
}

/// Expand requests into instances, largest host count first.
///
/// Ties keep input order, and replicas of one request stay together in
/// instance order, so the expansion is lazy.
fn sorted_instances(requests: &[AllocationRequest]) -> impl Iterator<Item = Instance> + '_ {
    requests
        .iter()
        .enumerate()
        .sorted_by_key(|(request_index, request)| (Reverse(request.host_capacity), *request_index))
        .flat_map(|(request_index, request)| {
            let block_size = request.block_size();
            (0..request.replicas).map(move |instance_index| Instance {
                request_index,
                instance_index,
                host_capacity: request.host_capacity,
                block_size,
            })
        })
}

fn place(
    supernet: NetworkDescriptor,
    requests: &[AllocationRequest],
) -> Result<Vec<Vec<AllocatedBlock>>, AllocationError> {
    let base = supernet.network() as u64;
    let end = base + supernet.block_size();
    let mut cursor = base;
    let mut allocations: Vec<Vec<AllocatedBlock>> = requests.iter().map(|_| Vec::new()).collect();
    let mut placed = 0usize;

    for instance in sorted_instances(requests) {
        let aligned_start = align_to_block(cursor, instance.block_size, base);
        if aligned_start + instance.block_size > end {
            log::debug!(
                "Request {} replica {} needs {} addresses at {}, past the end of {}",
                instance.request_index,
                instance.instance_index,
                instance.block_size,
                aligned_start,
                supernet
            );
            return Err(AllocationError::DoesNotFit {
                request_index: instance.request_index,
                supernet,
            });
        }

        // block_size <= 2^32 here, so the prefix cannot underflow
        let prefix_length = MAX_LENGTH - instance.block_size.trailing_zeros() as u8;
        let block = AllocatedBlock {
            request_id: instance.request_index,
            instance_index: instance.instance_index,
            host_capacity: instance.host_capacity,
            prefix_length,
            network_address: aligned_start as u32,
            broadcast_address: (aligned_start + instance.block_size - 1) as u32,
            block_size: instance.block_size,
        };
        log::debug!(
            "Placed request {} replica {} at {}",
            block.request_id,
            block.instance_index,
            block.descriptor()
        );
        allocations[instance.request_index].push(block);
        cursor = aligned_start + instance.block_size;
        placed += 1;
    }

    log::info!(
        "Allocated {placed} subnets in {supernet}, {} of {} addresses used up to the cursor",
        cursor - base,
        supernet.block_size()
    );
    Ok(allocations)
}
