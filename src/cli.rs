//! Command line interface of the `ipv4-planner` binary.

use crate::config::PlannerConfig;
use crate::error::AllocationError;
use crate::models::{parse_cidr, AllocationRequest};
use crate::output::{
    format_hierarchy, format_insight, format_overall, format_plan_report, format_route_summary,
    print_allocations, print_json, print_lines,
};
use crate::plan_file::{evaluate_plan, read_plan_file};
use crate::processing::{
    allocate_vlsm_checked, inspect, overall_summary_checked, parse_network_or_address,
    plan_hierarchy, summarize_route_text,
};
use clap::{Parser, Subcommand};
use lazy_static::lazy_static;
use regex::Regex;
use std::error::Error;

lazy_static! {
    /// `hosts` or `hosts x replicas`, e.g. `120`, `50x2`, `10*4`.
    static ref REQUEST_TOKEN: Regex =
        Regex::new(r"^\s*(\d+)\s*(?:[xX*]\s*(\d+))?\s*$").expect("Invalid Regex?");
}

/// IPv4 address planning: inspect, VLSM, route summaries and overlap checks.
#[derive(Parser, Debug)]
#[command(name = "ipv4-planner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Describe CIDRs or single addresses
    Inspect {
        /// e.g. 192.168.1.10/24 or 10.0.0.1
        #[arg(required = true)]
        entries: Vec<String>,
    },

    /// Carve subnets out of a supernet, largest first
    Vlsm {
        /// Supernet in CIDR notation
        supernet: String,

        /// Requests as HOSTS or HOSTSxREPLICAS, e.g. 120 50x2
        #[arg(required = true)]
        requests: Vec<String>,
    },

    /// Smallest CIDR covering every route
    Summarize {
        /// CIDRs, or bare addresses that take the mask of the others
        #[arg(required = true)]
        routes: Vec<String>,
    },

    /// Overlap, coverage and gaps of a set of networks
    Analyze {
        /// CIDRs, or bare addresses taken as /32
        #[arg(required = true)]
        networks: Vec<String>,
    },

    /// Split a supernet into layers at the given prefix lengths
    Hierarchy {
        /// Supernet in CIDR notation
        supernet: String,

        /// Layer prefix lengths, e.g. 20 24
        layers: Vec<u8>,
    },

    /// Run every section of a JSON plan file
    Plan {
        /// Path to the plan file
        file: String,
    },
}

/// Parse a request token such as `50x2` into a request.
pub fn parse_request_token(
    request_index: usize,
    token: &str,
    config: &PlannerConfig,
) -> Result<AllocationRequest, AllocationError> {
    let caps = REQUEST_TOKEN
        .captures(token)
        .ok_or_else(|| AllocationError::InvalidHostCount {
            request_index,
            value: token.to_string(),
        })?;
    let hosts = caps.get(1).map_or("", |m| m.as_str());
    let replicas = caps.get(2).map_or("", |m| m.as_str());
    AllocationRequest::parse(request_index, hosts, replicas, config)
}

pub fn parse_request_tokens(
    tokens: &[String],
    config: &PlannerConfig,
) -> Result<Vec<AllocationRequest>, AllocationError> {
    tokens
        .iter()
        .enumerate()
        .map(|(index, token)| parse_request_token(index, token, config))
        .collect()
}

/// Execute one parsed command line.
pub fn run(cli: Cli, config: &PlannerConfig) -> Result<(), Box<dyn Error>> {
    log::debug!("run({:?})", cli.command);
    match cli.command {
        Commands::Inspect { entries } => {
            let insights = entries
                .iter()
                .map(|entry| inspect(entry))
                .collect::<Result<Vec<_>, _>>()?;
            if cli.json {
                print_json(&insights)?;
            } else {
                for insight in &insights {
                    print_lines(&format_insight(insight));
                }
            }
        }
        Commands::Vlsm { supernet, requests } => {
            let supernet = parse_cidr(&supernet)?;
            let requests = parse_request_tokens(&requests, config)?;
            let allocations = allocate_vlsm_checked(supernet, &requests, config)?;
            if cli.json {
                print_json(&allocations)?;
            } else {
                print_allocations(&allocations);
            }
        }
        Commands::Summarize { routes } => {
            let summary = summarize_route_text(&routes)?;
            if cli.json {
                print_json(&summary)?;
            } else {
                print_lines(&format_route_summary(&summary));
            }
        }
        Commands::Analyze { networks } => {
            let networks = networks
                .iter()
                .map(|text| parse_network_or_address(text))
                .collect::<Result<Vec<_>, _>>()?;
            let summary = overall_summary_checked(&networks, config)?;
            if cli.json {
                print_json(&summary)?;
            } else {
                print_lines(&format_overall(&summary));
            }
        }
        Commands::Hierarchy { supernet, layers } => {
            let supernet = parse_cidr(&supernet)?;
            let plan = plan_hierarchy(supernet, &layers, config)?;
            if cli.json {
                print_json(&plan)?;
            } else {
                print_lines(&format_hierarchy(&plan));
            }
        }
        Commands::Plan { file } => {
            let plan = read_plan_file(&file)?;
            let config = plan.config.clone().unwrap_or_else(|| config.clone());
            let report = evaluate_plan(&plan, &config)?;
            if cli.json {
                print_json(&report)?;
            } else {
                print_lines(&format_plan_report(&report));
            }
        }
    }
    Ok(())
}
