//! Output formatting for planner results.
//!
//! This module handles formatting and outputting results:
//! - [`csv`] - CSV rows for allocated subnets
//! - [`report`] - Human readable reports
//! - [`terminal`] - Terminal output with colors

mod csv;
mod report;
mod terminal;

pub use csv::{
    blocks_by_address, format_allocation_row, format_allocations, print_allocations,
    ALLOCATION_HEADER,
};
pub use report::{
    format_hierarchy, format_insight, format_overall, format_plan_report, format_route_summary,
    print_json, print_lines,
};
pub use terminal::{format_count, format_field};
