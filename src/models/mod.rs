//! Domain models for IPv4 planning.
//!
//! This module contains the value types used throughout the engine:
//! - [`NetworkDescriptor`] - a parsed `address/prefix` plus the codec functions
//! - [`AllocationRequest`], [`AllocatedBlock`] and [`RouteEntry`] - planner input and output
//! - [`catalog`] - notable address ranges and classful labels

pub mod catalog;
mod ipv4;
mod request;

// Re-export public types
pub use catalog::{address_class, classify, AddressCategory, AddressRange, Ipv4Class};
pub use ipv4::{
    alignment_prefix, format_address, format_mask, format_wildcard, mask_from_prefix,
    parse_address, parse_cidr, serialize_address, total_address_count, usable_host_count,
    wildcard_from_prefix, NetworkDescriptor, MAX_LENGTH,
};
pub use request::{AllocatedBlock, AllocationRequest, RouteEntry};
