//! Planning computations.
//!
//! This module contains the engine operations, all pure functions:
//! - [`vlsm`] - VLSM allocation inside a supernet
//! - [`summarize`] - Route summarization
//! - [`overlap`] - Overlap and coverage analysis
//! - [`gap_finder`] - Finding gaps between networks
//! - [`inspect`] - Per-entry address insight
//! - [`hierarchy`] - Layered subdivision plans
//! - [`summary`] - Overlap report with the aggregate route

pub mod gap_finder;
pub mod hierarchy;
pub mod inspect;
pub mod overlap;
pub mod summarize;
pub mod summary;
pub mod vlsm;

// Re-export public functions
pub use gap_finder::{find_gaps, gap_blocks, GapRange};
pub use hierarchy::{plan_hierarchy, HierarchyLayer, HierarchyPlan, HostTail};
pub use inspect::{inspect, inspect_network, parse_network_or_address, AddressInsight};
pub use overlap::{analyze_overlap, analyze_overlap_checked, OverlapReport};
pub use summarize::{covering_network, summarize_networks, summarize_route_text, summarize_routes};
pub use summary::{overall_summary, overall_summary_checked, OverallSummary};
pub use vlsm::{allocate_vlsm, allocate_vlsm_checked};
