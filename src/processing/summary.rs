//! Combined figures for a set of networks.

use super::gap_finder::{find_gaps, GapRange};
use super::overlap::{analyze_overlap, analyze_overlap_checked, OverlapReport};
use super::summarize::summarize_networks;
use crate::config::PlannerConfig;
use crate::error::AnalysisError;
use crate::models::NetworkDescriptor;
use serde::Serialize;

/// Overlap report plus the aggregate route of the whole set.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct OverallSummary {
    pub report: OverlapReport,
    /// Smallest CIDR covering every network; only set for two or more networks.
    pub aggregate: Option<NetworkDescriptor>,
    /// Unused ranges between the networks in sort order.
    pub gaps: Vec<GapRange>,
}

fn aggregate_route(networks: &[NetworkDescriptor]) -> Option<NetworkDescriptor> {
    if networks.len() >= 2 {
        summarize_networks(networks)
    } else {
        None
    }
}

pub fn overall_summary(networks: &[NetworkDescriptor]) -> OverallSummary {
    OverallSummary {
        report: analyze_overlap(networks),
        aggregate: aggregate_route(networks),
        gaps: find_gaps(networks),
    }
}

/// [`overall_summary`] refusing more networks than `config.max_networks`.
pub fn overall_summary_checked(
    networks: &[NetworkDescriptor],
    config: &PlannerConfig,
) -> Result<OverallSummary, AnalysisError> {
    Ok(OverallSummary {
        report: analyze_overlap_checked(networks, config)?,
        aggregate: aggregate_route(networks),
        gaps: find_gaps(networks),
    })
}
