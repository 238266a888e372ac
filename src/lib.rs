// cargo watch -x 'fmt' -x 'test'

//! IPv4 address planning engine.
//!
//! Parses and formats dotted-decimal addresses and CIDR notation, allocates
//! VLSM subnets inside a supernet, summarizes routes into one covering CIDR
//! and reports overlap, coverage and gaps of a set of networks.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod plan_file;
pub mod processing;

pub use config::PlannerConfig;
pub use error::{
    AllocationError, AnalysisError, HierarchyError, ParseError, PlanFileError, SummaryError,
};
pub use models::{
    format_address, format_mask, format_wildcard, mask_from_prefix, parse_address, parse_cidr,
    total_address_count, usable_host_count, wildcard_from_prefix, AllocatedBlock,
    AllocationRequest, NetworkDescriptor, RouteEntry,
};
pub use processing::{
    allocate_vlsm, allocate_vlsm_checked, analyze_overlap, analyze_overlap_checked, inspect,
    overall_summary, plan_hierarchy, summarize_route_text, summarize_routes, OverlapReport,
};
