//! Human readable reports for the planner results.
//!
//! Each `format_*` function returns the lines of one report so the binary
//! can print them and tests can look at them.

use crate::models::{format_address, format_mask, NetworkDescriptor};
use crate::plan_file::PlanReport;
use crate::processing::{gap_blocks, AddressInsight, HierarchyPlan, OverallSummary};
use colored::Colorize;
use serde::Serialize;

use super::csv::{blocks_by_address, format_allocations};
use super::terminal::{format_count, format_heading, format_line};

const LABEL_WIDTH: usize = 22;

pub fn format_insight(insight: &AddressInsight) -> Vec<String> {
    let network = insight.network;
    let mut lines = vec![
        format_heading(&format!("Inspect {network}")),
        format_line("Network", network.to_network(), LABEL_WIDTH),
        format_line("Mask", &insight.mask, LABEL_WIDTH),
        format_line("Wildcard", &insight.wildcard, LABEL_WIDTH),
        format_line("Broadcast", format_address(network.broadcast()), LABEL_WIDTH),
        format_line(
            "Usable range",
            format!(
                "{} - {}",
                format_address(insight.first_usable),
                format_address(insight.last_usable)
            ),
            LABEL_WIDTH,
        ),
        format_line("Usable hosts", format_count(insight.usable_host_count), LABEL_WIDTH),
        format_line("Total addresses", format_count(insight.total_addresses), LABEL_WIDTH),
        format_line(
            "Host position",
            format!(
                "{} ({} below, {} above)",
                insight.host_index, insight.host_index, insight.right_usable
            ),
            LABEL_WIDTH,
        ),
        format_line("Class", insight.class, LABEL_WIDTH),
        format_line("Range", insight.range.label, LABEL_WIDTH),
        format_line("Binary", &insight.binary, LABEL_WIDTH),
    ];
    if let Some(service) = insight.range.service {
        lines.push(format_line("Service", service, LABEL_WIDTH));
    }
    if insight.is_network_address && network.prefix_len() < 31 {
        lines.push(format!("{} address is the network address", "NOTE".on_yellow()));
    } else if insight.is_broadcast_address && network.prefix_len() < 31 {
        lines.push(format!("{} address is the broadcast address", "NOTE".on_yellow()));
    }
    if !insight.next_networks.is_empty() {
        let next: Vec<String> = insight.next_networks.iter().map(|n| n.to_string()).collect();
        lines.push(format_line("Next networks", next.join(", "), LABEL_WIDTH));
    }
    lines
}

pub fn format_route_summary(route: &NetworkDescriptor) -> Vec<String> {
    vec![
        format_heading("Route summary"),
        format_line("Summary route", route.to_string().green(), LABEL_WIDTH),
        format_line("Mask", format_mask(route.mask()), LABEL_WIDTH),
        format_line("Addresses", format_count(route.block_size()), LABEL_WIDTH),
    ]
}

pub fn format_overall(summary: &OverallSummary) -> Vec<String> {
    let report = &summary.report;
    let mut lines = vec![
        format_heading("Network analysis"),
        format_line("Networks", report.network_count, LABEL_WIDTH),
        format_line("Total addresses", format_count(report.total_address_count), LABEL_WIDTH),
        format_line(
            "Unique covered",
            format_count(report.unique_covered_address_count),
            LABEL_WIDTH,
        ),
    ];

    let overlap = format!(
        "{} pair(s), {} address(es)",
        report.overlapping_pair_count,
        format_count(report.overlapping_address_count)
    );
    lines.push(if report.overlapping_pair_count > 0 {
        format_line("Overlaps", overlap.red(), LABEL_WIDTH)
    } else {
        format_line("Overlaps", overlap.green(), LABEL_WIDTH)
    });

    lines.push(format_line(
        "Gaps",
        format!(
            "{} range(s), {} address(es)",
            report.gap_network_count,
            format_count(report.gap_address_count)
        ),
        LABEL_WIDTH,
    ));
    for gap in &summary.gaps {
        let blocks: Vec<String> = gap_blocks(gap).iter().map(|b| b.to_string()).collect();
        lines.push(format!(
            "  {} - {} = {}",
            format_address(gap.start),
            format_address(gap.end),
            blocks.join(" ").yellow()
        ));
    }

    if let Some(aggregate) = summary.aggregate {
        lines.push(format_line("Aggregate route", aggregate.to_string().green(), LABEL_WIDTH));
    }
    lines
}

pub fn format_hierarchy(plan: &HierarchyPlan) -> Vec<String> {
    let mut lines = vec![
        format_heading(&format!("Hierarchy of {}", plan.supernet)),
        format_line("Base prefix", format!("/{}", plan.base_prefix), LABEL_WIDTH),
    ];
    for layer in &plan.layers {
        lines.push(format_line(
            &format!("Layer {} (/{})", layer.index + 1, layer.prefix),
            format!(
                "{} bit(s), {} network(s) of {} addresses",
                layer.bits,
                format_count(layer.network_count),
                format_count(layer.addresses_per_network)
            ),
            LABEL_WIDTH,
        ));
    }
    lines.push(format_line(
        "Hosts",
        format!(
            "{} bit(s), {} usable of {} addresses",
            plan.host.host_bits,
            format_count(plan.host.host_usable),
            format_count(plan.host.host_addresses)
        ),
        LABEL_WIDTH,
    ));
    lines
}

/// Every section present in a plan report.
pub fn format_plan_report(report: &PlanReport) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(allocations) = &report.allocations {
        let supernet = report
            .supernet
            .map(|s| s.to_string())
            .unwrap_or_default();
        lines.push(format_heading(&format!("VLSM allocation in {supernet}")));
        lines.extend(format_allocations(&blocks_by_address(allocations)));
    }
    if let Some(route) = &report.route_summary {
        lines.extend(format_route_summary(route));
    }
    if let Some(overall) = &report.overall {
        lines.extend(format_overall(overall));
    }
    if let Some(hierarchy) = &report.hierarchy {
        lines.extend(format_hierarchy(hierarchy));
    }
    lines
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

/// Print any result as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
