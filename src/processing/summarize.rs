//! Route summarization.
//!
//! Finds the smallest CIDR block covering a set of routes. This is a longest
//! common prefix of the lowest network address and the highest broadcast
//! address, not a minimal set of disjoint blocks.

use crate::error::SummaryError;
use crate::models::{NetworkDescriptor, RouteEntry};

/// The smallest CIDR block containing every address from `lo` to `hi`.
pub fn covering_network(lo: u32, hi: u32) -> NetworkDescriptor {
    // leading_zeros(0) == 32 when both bounds are equal
    let prefix = (lo ^ hi).leading_zeros() as u8;
    NetworkDescriptor::host(lo).with_prefix(prefix).to_network()
}

/// Record the first explicit prefix and reject any entry disagreeing with it.
fn check_prefix(
    index: usize,
    entry: &RouteEntry,
    inherited_prefix: &mut Option<u8>,
) -> Result<(), SummaryError> {
    let Some(found) = entry.prefix() else {
        return Ok(());
    };
    match *inherited_prefix {
        None => *inherited_prefix = Some(found),
        Some(expected) if expected != found => {
            return Err(SummaryError::MaskMismatch {
                index,
                expected,
                found,
            })
        }
        Some(_) => {}
    }
    Ok(())
}

/// Summarize a mix of networks and bare addresses.
///
/// Bare addresses take the prefix of the explicit networks, which must all
/// share one prefix length.
///
/// # Examples
/// ```
/// use ipv4_planner::models::RouteEntry;
/// use ipv4_planner::processing::summarize_routes;
///
/// let entries: Vec<RouteEntry> = ["192.168.0.0/24", "192.168.1.0/24"]
///     .iter()
///     .map(|s| s.parse().unwrap())
///     .collect();
/// assert_eq!(summarize_routes(&entries).unwrap().to_string(), "192.168.0.0/23");
/// ```
pub fn summarize_routes(entries: &[RouteEntry]) -> Result<NetworkDescriptor, SummaryError> {
    let mut inherited_prefix: Option<u8> = None;
    for (index, entry) in entries.iter().enumerate() {
        check_prefix(index, entry, &mut inherited_prefix)?;
    }
    let prefix = inherited_prefix.ok_or(SummaryError::NoMaskProvided)?;

    let mut resolved = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let network = entry
            .resolve(prefix)
            .map_err(|source| SummaryError::InvalidEntry { index, source })?;
        resolved.push(network);
    }

    let bare_count = entries.iter().filter(|e| e.prefix().is_none()).count();
    if bare_count > 0 {
        log::debug!("Applied /{prefix} to {bare_count} entries without a mask");
    }

    let summary = summarize_networks(&resolved).ok_or(SummaryError::NoMaskProvided)?;
    log::info!("Summarized {} routes into {}", entries.len(), summary);
    Ok(summary)
}

/// Parse and check each text entry in order, then summarize.
///
/// The first bad row wins, whether it is malformed or has a conflicting mask.
pub fn summarize_route_text<S: AsRef<str>>(entries: &[S]) -> Result<NetworkDescriptor, SummaryError> {
    let mut inherited_prefix: Option<u8> = None;
    let mut parsed = Vec::with_capacity(entries.len());
    for (index, text) in entries.iter().enumerate() {
        let entry = text
            .as_ref()
            .parse::<RouteEntry>()
            .map_err(|source| SummaryError::InvalidEntry { index, source })?;
        check_prefix(index, &entry, &mut inherited_prefix)?;
        parsed.push(entry);
    }
    summarize_routes(&parsed)
}

/// Aggregate CIDR of already resolved networks, prefixes may differ.
///
/// Returns `None` for an empty list.
pub fn summarize_networks(networks: &[NetworkDescriptor]) -> Option<NetworkDescriptor> {
    let min_network = networks.iter().map(|n| n.network()).min()?;
    let max_broadcast = networks.iter().map(|n| n.broadcast()).max()?;
    Some(covering_network(min_network, max_broadcast))
}
