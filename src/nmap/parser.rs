//! Line matchers for Nmap text output
//!
//! Each matcher looks at one raw line on its own. There is no lookahead and no
//! state shared between lines.

use once_cell::sync::Lazy;
use regex::Regex;

/// `Discovered open port 443/tcp on 10.0.0.1`
static DISCOVERY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Discovered open port (\d+)/\w+ on (\d+\.\d+\.\d+\.\d+)").unwrap()
});

/// A bare word immediately followed by ` ()`
static SERVICE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w+) \(\)").unwrap());

/// Service recorded when a line carries no service token
pub const UNKNOWN_SERVICE: &str = "unknown";

/// Port and address pulled from a discovery line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery<'a> {
    pub port: &'a str,
    pub ip: &'a str,
}

/// Match the `Discovered open port <port>/<proto> on <ipv4>` pattern anywhere
/// in the line.
pub fn match_discovery(line: &str) -> Option<Discovery<'_>> {
    let caps = DISCOVERY_RE.captures(line)?;
    Some(Discovery {
        port: caps.get(1)?.as_str(),
        ip: caps.get(2)?.as_str(),
    })
}

/// Match a `word ()` service token anywhere in the line.
///
/// Real Nmap discovery lines never carry one, so in practice the service stays
/// [`UNKNOWN_SERVICE`]. Service details printed on later lines are ignored.
pub fn match_service(line: &str) -> Option<&str> {
    SERVICE_RE.captures(line)?.get(1).map(|m| m.as_str())
}
