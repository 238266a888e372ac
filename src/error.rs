//! Error types returned by the planning engine.
//!
//! Every error is a rejected input, returned as a value. Each component stops
//! at the first error it meets and reports it.

use crate::models::NetworkDescriptor;
use thiserror::Error;

/// Malformed dotted-decimal or CIDR text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid IPv4 address '{0}'")]
    InvalidAddress(String),
    #[error("invalid CIDR '{input}': {reason}")]
    InvalidCidr { input: String, reason: String },
}

/// Rejected VLSM request or a request that cannot be placed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// The request at `request_index` (input order) did not fit in the remaining space.
    #[error("subnet request {} does not fit inside {supernet}", request_index + 1)]
    DoesNotFit {
        request_index: usize,
        supernet: NetworkDescriptor,
    },
    #[error("invalid host count '{value}' in subnet request {}", request_index + 1)]
    InvalidHostCount { request_index: usize, value: String },
    #[error(
        "replica count '{value}' in subnet request {} must be between 1 and {max}",
        request_index + 1
    )]
    InvalidReplicaCount {
        request_index: usize,
        value: String,
        max: u32,
    },
    #[error("too many subnet requests: {count} (max {max})")]
    TooManyRequests { count: usize, max: usize },
}

/// Route summarization failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummaryError {
    #[error("mask mismatch at entry {}: expected /{expected}, found /{found}", index + 1)]
    MaskMismatch { index: usize, expected: u8, found: u8 },
    #[error("provide the mask for at least one network so it can be applied to the others")]
    NoMaskProvided,
    #[error("invalid route entry {}: {source}", index + 1)]
    InvalidEntry {
        index: usize,
        #[source]
        source: ParseError,
    },
}

/// Overlap analysis rejected because of its input size.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("too many networks to analyze: {count} (max {max})")]
    TooManyNetworks { count: usize, max: usize },
}

/// Layered plan rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    #[error("supernet {supernet} is too large, prefix must be at least /{min_prefix}")]
    SupernetTooLarge {
        supernet: NetworkDescriptor,
        min_prefix: u8,
    },
}

/// Plan file could not be read or decoded.
#[derive(Debug, Error)]
pub enum PlanFileError {
    #[error("error reading plan file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("error parsing plan file {path} at '{field}': {message}")]
    Parse {
        path: String,
        field: String,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_cidr;

    #[test]
    fn test_error_messages_are_one_based() {
        let supernet = parse_cidr("10.0.0.0/30").unwrap();
        let err = AllocationError::DoesNotFit {
            request_index: 0,
            supernet,
        };
        assert_eq!(err.to_string(), "subnet request 1 does not fit inside 10.0.0.0/30");

        let err = SummaryError::MaskMismatch {
            index: 2,
            expected: 24,
            found: 23,
        };
        assert_eq!(
            err.to_string(),
            "mask mismatch at entry 3: expected /24, found /23"
        );
    }

    #[test]
    fn test_invalid_entry_keeps_source() {
        use std::error::Error as _;
        let err = SummaryError::InvalidEntry {
            index: 0,
            source: ParseError::InvalidAddress("10.0.0".to_string()),
        };
        assert!(err.source().is_some());
    }
}
