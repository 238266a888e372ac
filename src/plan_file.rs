//! JSON plan files.
//!
//! A plan file bundles the input of several planner operations so one run
//! can allocate, summarize, analyze and lay out hierarchy layers together.

use crate::config::PlannerConfig;
use crate::error::PlanFileError;
use crate::models::{AllocatedBlock, AllocationRequest, NetworkDescriptor};
use crate::processing::{
    allocate_vlsm_checked, overall_summary_checked, parse_network_or_address, plan_hierarchy,
    summarize_route_text, HierarchyPlan, OverallSummary,
};
use serde::{Deserialize, Serialize};
use std::error::Error;

/// Input for the hierarchy planner.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HierarchySection {
    pub supernet: NetworkDescriptor,
    #[serde(default)]
    pub handles: Vec<u8>,
}

/// Contents of a plan file. Every section is optional.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PlanFile {
    /// Supernet carved up by `requests`.
    pub supernet: Option<NetworkDescriptor>,
    #[serde(default)]
    pub requests: Vec<AllocationRequest>,
    /// Route entries to summarize, CIDRs or bare addresses.
    #[serde(default)]
    pub routes: Vec<String>,
    /// Networks to analyze, CIDRs or bare addresses (as /32).
    #[serde(default)]
    pub networks: Vec<String>,
    pub hierarchy: Option<HierarchySection>,
    /// Overrides the limits from the environment.
    pub config: Option<PlannerConfig>,
}

/// Results of every section present in a plan file.
#[derive(Serialize, Debug, Default)]
pub struct PlanReport {
    pub supernet: Option<NetworkDescriptor>,
    pub allocations: Option<Vec<Vec<AllocatedBlock>>>,
    pub route_summary: Option<NetworkDescriptor>,
    pub overall: Option<OverallSummary>,
    pub hierarchy: Option<HierarchyPlan>,
}

/// Decode a plan from JSON text. `path` is only used in error messages.
pub fn parse_plan(json: &str, path: &str) -> Result<PlanFile, PlanFileError> {
    let deserializer = &mut serde_json::Deserializer::from_str(json);
    serde_path_to_error::deserialize(deserializer).map_err(|e| PlanFileError::Parse {
        path: path.to_string(),
        field: e.path().to_string(),
        message: e.inner().to_string(),
    })
}

/// Read and decode a plan file.
pub fn read_plan_file(path: &str) -> Result<PlanFile, PlanFileError> {
    log::info!("Reading plan file: {path}");
    let json = std::fs::read_to_string(path).map_err(|source| PlanFileError::Io {
        path: path.to_string(),
        source,
    })?;
    parse_plan(&json, path)
}

/// Run every section of `plan`, stopping at the first error.
pub fn evaluate_plan(plan: &PlanFile, config: &PlannerConfig) -> Result<PlanReport, Box<dyn Error>> {
    let mut report = PlanReport {
        supernet: plan.supernet,
        ..Default::default()
    };

    if !plan.requests.is_empty() {
        let supernet = plan
            .supernet
            .ok_or("plan has subnet requests but no supernet")?;
        report.allocations = Some(allocate_vlsm_checked(supernet, &plan.requests, config)?);
    }

    if !plan.routes.is_empty() {
        report.route_summary = Some(summarize_route_text(&plan.routes)?);
    }

    if !plan.networks.is_empty() {
        let networks = plan
            .networks
            .iter()
            .map(|text| parse_network_or_address(text))
            .collect::<Result<Vec<_>, _>>()?;
        report.overall = Some(overall_summary_checked(&networks, config)?);
    }

    if let Some(section) = &plan.hierarchy {
        report.hierarchy = Some(plan_hierarchy(section.supernet, &section.handles, config)?);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AllocationError;

    #[test]
    fn test_parse_plan_minimal() {
        let plan = parse_plan(r#"{"routes": ["10.0.0.0/24", "10.0.1.1"]}"#, "inline").unwrap();
        assert_eq!(plan.routes.len(), 2);
        assert!(plan.supernet.is_none());

        let report = evaluate_plan(&plan, &PlannerConfig::default()).unwrap();
        assert_eq!(report.route_summary.unwrap().to_string(), "10.0.0.0/23");
        assert!(report.allocations.is_none());
    }

    #[test]
    fn test_parse_plan_error_names_field() {
        let err = parse_plan(
            r#"{"supernet": "10.0.0.0/24", "requests": [{"hosts": 10}, {"hosts": -3}]}"#,
            "bad.json",
        )
        .unwrap_err();
        match err {
            PlanFileError::Parse { path, field, .. } => {
                assert_eq!(path, "bad.json");
                assert_eq!(field, "requests[1].hosts");
            }
            other => panic!("unexpected error {other:?}"),
        }

        let err = parse_plan(r#"{"supernet": "10.0.0.0/33"}"#, "bad.json").unwrap_err();
        assert!(matches!(err, PlanFileError::Parse { ref field, .. } if field == "supernet"));

        assert!(parse_plan(r#"{"supernets": []}"#, "bad.json").is_err());
    }

    #[test]
    fn test_evaluate_plan_requires_supernet() {
        let plan = PlanFile {
            requests: vec![AllocationRequest::new(10, 1)],
            ..Default::default()
        };
        let err = evaluate_plan(&plan, &PlannerConfig::default()).unwrap_err();
        assert!(err.to_string().contains("no supernet"));
    }

    #[test]
    fn test_evaluate_plan_propagates_allocation_error() {
        let plan = parse_plan(
            r#"{"supernet": "10.0.0.0/30", "requests": [{"hosts": 100}]}"#,
            "inline",
        )
        .unwrap();
        let err = evaluate_plan(&plan, &PlannerConfig::default()).unwrap_err();
        let err = err.downcast_ref::<AllocationError>().unwrap();
        assert!(matches!(err, AllocationError::DoesNotFit { request_index: 0, .. }));
    }

    #[test]
    fn test_read_plan_file_missing() {
        let err = read_plan_file("tests/test_data/does_not_exist.json").unwrap_err();
        assert!(matches!(err, PlanFileError::Io { .. }));
    }
}
