//! Nmap target extraction
//!
//! Reads Nmap text output, keeps the `Discovered open port` lines, and writes
//! a sorted, deduplicated target list plus a per-port CSV summary.

pub mod parser;
pub mod summary;

pub use parser::{match_discovery, match_service, Discovery, UNKNOWN_SERVICE};
pub use summary::{PortEntry, PortIndex, SUMMARY_HEADER};

use crate::config::EngagementConfig;
use crate::{HermitError, Result};
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// One reachable service: `ip:port:service`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Target {
    pub ip: String,
    pub port: String,
    pub service: String,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.ip, self.port, self.service)
    }
}

/// Optional port and service filters. Blank values mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetFilter {
    port: Option<String>,
    service: Option<String>,
}

impl TargetFilter {
    pub fn new(port: Option<&str>, service: Option<&str>) -> Self {
        Self::default().with_port(port).with_service(service)
    }

    pub fn with_port(mut self, port: Option<&str>) -> Self {
        self.port = non_blank(port);
        self
    }

    pub fn with_service(mut self, service: Option<&str>) -> Self {
        self.service = non_blank(service).map(|s| s.to_lowercase());
        self
    }

    pub fn port(&self) -> Option<&str> {
        self.port.as_deref()
    }

    pub fn service(&self) -> Option<&str> {
        self.service.as_deref()
    }

    /// Port must match exactly; service is a case-insensitive substring match
    pub fn accepts(&self, port: &str, service: &str) -> bool {
        if let Some(wanted) = &self.port {
            if wanted != port {
                return false;
            }
        }
        if let Some(wanted) = &self.service {
            if !service.to_lowercase().contains(wanted.as_str()) {
                return false;
            }
        }
        true
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Outcome of one extraction run
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    /// Unique targets, sorted
    pub targets: Vec<String>,
    pub port_index: PortIndex,
    pub lines_read: usize,
    /// Discovery lines seen, before filtering
    pub lines_matched: usize,
    /// Set only when the target list was written
    pub targets_path: Option<PathBuf>,
    pub summary_path: PathBuf,
}

impl ExtractionReport {
    pub fn has_targets(&self) -> bool {
        !self.targets.is_empty()
    }
}

/// Targets and port index collected from one input, before anything is written
#[derive(Debug, Clone, Default)]
pub struct ScanCollection {
    pub targets: BTreeSet<String>,
    pub port_index: PortIndex,
    pub lines_read: usize,
    pub lines_matched: usize,
}

impl ScanCollection {
    /// Examine one line and record it if it passes the filter
    pub fn observe(&mut self, line: &str, filter: &TargetFilter) {
        self.lines_read += 1;

        let Some(found) = match_discovery(line) else {
            return;
        };
        self.lines_matched += 1;

        let service = match_service(line).unwrap_or(UNKNOWN_SERVICE);
        if !filter.accepts(found.port, service) {
            return;
        }

        let target = Target {
            ip: found.ip.to_string(),
            port: found.port.to_string(),
            service: service.to_string(),
        };
        self.targets.insert(target.to_string());
        self.port_index.push(found.port, found.ip);
    }

    /// Read every line from `reader`. `\n`, `\r\n` and a lone `\r` all end a
    /// line. Bytes that are not UTF-8 are replaced rather than treated as
    /// errors.
    pub fn read_from<R: BufRead>(mut reader: R, filter: &TargetFilter) -> Result<Self> {
        let mut collection = Self::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let chunk = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
            // a trailing \r is either half of \r\n or a terminator of its own
            let chunk = chunk.strip_suffix(b"\r").unwrap_or(chunk);
            for piece in chunk.split(|&b| b == b'\r') {
                collection.observe(&String::from_utf8_lossy(piece), filter);
            }
        }

        Ok(collection)
    }

    /// Unique targets in ascending order
    pub fn sorted_targets(&self) -> Vec<String> {
        self.targets.iter().cloned().collect()
    }
}

/// Writes extraction results into the engagement log directory
pub struct TargetExtractor<'a> {
    config: &'a EngagementConfig,
}

impl<'a> TargetExtractor<'a> {
    pub fn new(config: &'a EngagementConfig) -> Self {
        Self { config }
    }

    /// Parse `nmap_file` and write the target list and summary CSV.
    ///
    /// The target list is only overwritten when at least one target survives
    /// the filter. The summary is always rewritten, even if it ends up holding
    /// only the header. A missing input file writes nothing.
    pub fn extract<P: AsRef<Path>>(&self, nmap_file: P, filter: &TargetFilter) -> Result<ExtractionReport> {
        let nmap_file = nmap_file.as_ref();
        if !nmap_file.is_file() {
            return Err(HermitError::InputNotFound(nmap_file.to_path_buf()));
        }

        let file = File::open(nmap_file).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => HermitError::InputNotFound(nmap_file.to_path_buf()),
            _ => HermitError::Io(e),
        })?;
        let collection = ScanCollection::read_from(BufReader::new(file), filter)?;
        debug!(
            "{}: {} lines, {} discovery lines, {} unique targets",
            nmap_file.display(),
            collection.lines_read,
            collection.lines_matched,
            collection.targets.len()
        );

        let targets = collection.sorted_targets();
        let targets_path = if targets.is_empty() {
            None
        } else {
            let path = self.config.targets_log();
            fs::write(&path, targets.join("\n"))?;
            info!("Found targets saved to {}", path.display());
            Some(path)
        };

        let summary_path = self.config.summary_log();
        collection.port_index.write_csv_file(&summary_path)?;
        info!("Summary saved to {}", summary_path.display());

        Ok(ExtractionReport {
            targets,
            port_index: collection.port_index,
            lines_read: collection.lines_read,
            lines_matched: collection.lines_matched,
            targets_path,
            summary_path,
        })
    }
}
