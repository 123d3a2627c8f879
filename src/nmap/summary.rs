//! Per-port summary of discovered addresses

use crate::Result;
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::collections::HashMap;
use std::path::Path;

/// Header row of the summary CSV
pub const SUMMARY_HEADER: [&str; 3] = ["Port", "Number of IPs", "IP List"];

/// One port and every address seen with it open
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PortEntry {
    pub port: String,
    pub ips: Vec<String>,
}

impl PortEntry {
    pub fn count(&self) -> usize {
        self.ips.len()
    }

    /// Addresses joined with `", "`, duplicates kept
    pub fn ip_list(&self) -> String {
        self.ips.join(", ")
    }
}

/// Ports in first-seen order, each with its addresses in insertion order.
///
/// Addresses are not deduplicated: an address reported twice for a port is
/// counted twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortIndex {
    entries: Vec<PortEntry>,
    positions: HashMap<String, usize>,
}

impl PortIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `ip` under `port`
    pub fn push(&mut self, port: &str, ip: &str) {
        let idx = match self.positions.get(port) {
            Some(&idx) => idx,
            None => {
                self.entries.push(PortEntry {
                    port: port.to_string(),
                    ips: Vec::new(),
                });
                let idx = self.entries.len() - 1;
                self.positions.insert(port.to_string(), idx);
                idx
            }
        };
        self.entries[idx].ips.push(ip.to_string());
    }

    pub fn get(&self, port: &str) -> Option<&[String]> {
        self.positions
            .get(port)
            .map(|&idx| self.entries[idx].ips.as_slice())
    }

    pub fn entries(&self) -> &[PortEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the index as CSV: a header row, then one row per port
    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_writer(writer);

        csv_writer.write_record(SUMMARY_HEADER)?;
        for entry in &self.entries {
            csv_writer.write_record([
                entry.port.as_str(),
                entry.count().to_string().as_str(),
                entry.ip_list().as_str(),
            ])?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Overwrite `path` with the CSV summary
    pub fn write_csv_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_csv(file)
    }
}

impl Serialize for PortIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for entry in &self.entries {
            seq.serialize_element(entry)?;
        }
        seq.end()
    }
}
