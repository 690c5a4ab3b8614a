//! URL construction for the DQSEGDB `/dq` resource tree.
//!
//! # Design
//! Four pure functions, one per query shape the server understands. Each is
//! deterministic given its inputs and produces a complete URL string by
//! literal concatenation. No percent-encoding is applied to path segments or
//! query values: the server expects the raw names, and callers are expected
//! to pre-sanitize `ifo`, flag names, and include-filter entries. Query
//! parameter order for windowed queries (`s`, `e`, `include`) is part of the
//! wire contract.

use std::fmt;

/// URL scheme for a segment-database endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Http,
    Https,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Http => f.write_str("http"),
            Protocol::Https => f.write_str("https"),
        }
    }
}

/// Version selector for a flag query.
///
/// A query addresses either a concrete numbered version or a server-side
/// token such as `"active"`. Both stringify into the same path position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagVersion {
    Number(u32),
    Token(String),
}

impl fmt::Display for FlagVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagVersion::Number(n) => write!(f, "{n}"),
            FlagVersion::Token(s) => f.write_str(s),
        }
    }
}

impl From<u32> for FlagVersion {
    fn from(n: u32) -> Self {
        FlagVersion::Number(n)
    }
}

impl From<&str> for FlagVersion {
    fn from(s: &str) -> Self {
        FlagVersion::Token(s.to_string())
    }
}

/// URL listing every flag defined for a detector: `{protocol}://{server}/dq/{ifo}`.
pub fn flag_query_url(protocol: Protocol, server: &str, ifo: &str) -> String {
    format!("{protocol}://{server}/dq/{ifo}")
}

/// URL listing the versions of one flag: `{protocol}://{server}/dq/{ifo}/{name}`.
pub fn version_query_url(protocol: Protocol, server: &str, ifo: &str, name: &str) -> String {
    format!("{protocol}://{server}/dq/{ifo}/{name}")
}

/// URL for one flag version, with an include filter selecting the response
/// fields: `.../dq/{ifo}/{name}/{version}?include=a,b,c`.
pub fn segment_query_url(
    protocol: Protocol,
    server: &str,
    ifo: &str,
    name: &str,
    version: &FlagVersion,
    include: &[&str],
) -> String {
    format!(
        "{protocol}://{server}/dq/{ifo}/{name}/{version}?include={}",
        include.join(",")
    )
}

/// URL for one flag version restricted to a time window:
/// `.../dq/{ifo}/{name}/{version}?s={start}&e={end}&include=a,b,c`.
///
/// `start` and `end` are integer epoch seconds.
pub fn segment_query_url_in_window(
    protocol: Protocol,
    server: &str,
    ifo: &str,
    name: &str,
    version: &FlagVersion,
    include: &[&str],
    start: i64,
    end: i64,
) -> String {
    format!(
        "{protocol}://{server}/dq/{ifo}/{name}/{version}?s={start}&e={end}&include={}",
        include.join(",")
    )
}
