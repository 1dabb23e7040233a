//! JSON export and import of profile snapshots
//!
//! The wire format is decoupled from the in-memory types: every duration
//! crosses as integer nanoseconds so a written profile re-parses to an
//! identical snapshot, and map keys are ordered so identical snapshots
//! serialize to identical bytes. Files are written via a temp file and
//! rename, so a failed write never leaves a truncated profile.

use crate::metadata::Metadata;
use crate::stats::{CheckpointEvent, OperationStats, ProfileSnapshot, RegionSample};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Format identifier stored in every exported profile.
pub const FORMAT_TAG: &str = "cronista-profile-v1";

/// Errors from exporting or importing profiles.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported profile format: {0:?} (expected {FORMAT_TAG:?})")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Serialized form of a full snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonProfile {
    /// Version of the library that wrote the file.
    pub version: String,
    /// Format identifier, always [`FORMAT_TAG`].
    pub format: String,
    /// Grand total over all operations, nanoseconds.
    pub total_time_ns: u64,
    /// Number of operation entries.
    pub num_operations: usize,
    /// Total completed invocations across all entries.
    pub total_calls: u64,
    /// Operation entries in creation order.
    pub operations: Vec<JsonOperation>,
    /// Checkpoints in record order.
    pub checkpoints: Vec<JsonCheckpoint>,
}

/// One aggregated operation entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOperation {
    pub name: String,
    pub call_count: u64,
    pub total_ns: u64,
    /// Individual invocations in completion order.
    pub samples: Vec<JsonSample>,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

/// One recorded invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSample {
    /// Offset from the profiler epoch at open, nanoseconds.
    pub started_at_ns: u64,
    pub duration_ns: u64,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

/// One recorded checkpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonCheckpoint {
    pub name: String,
    /// Offset from the profiler epoch, nanoseconds.
    pub at_ns: u64,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl JsonProfile {
    /// Build the wire form of a snapshot.
    pub fn from_snapshot(snapshot: &ProfileSnapshot) -> Self {
        let operations: Vec<JsonOperation> = snapshot
            .operations
            .iter()
            .map(|op| JsonOperation {
                name: op.name.clone(),
                call_count: op.call_count,
                total_ns: op.total_duration.as_nanos() as u64,
                samples: op
                    .samples
                    .iter()
                    .map(|sample| JsonSample {
                        started_at_ns: sample.started_at.as_nanos() as u64,
                        duration_ns: sample.duration.as_nanos() as u64,
                        metadata: sample.metadata.clone(),
                    })
                    .collect(),
                metadata: op.metadata.clone(),
            })
            .collect();
        let checkpoints = snapshot
            .checkpoints
            .iter()
            .map(|cp| JsonCheckpoint {
                name: cp.name.clone(),
                at_ns: cp.at.as_nanos() as u64,
                metadata: cp.metadata.clone(),
            })
            .collect();

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: FORMAT_TAG.to_string(),
            total_time_ns: snapshot.grand_total().as_nanos() as u64,
            num_operations: snapshot.operations.len(),
            total_calls: snapshot.total_calls(),
            operations,
            checkpoints,
        }
    }

    /// Rebuild the in-memory snapshot. Entry creation order is taken from
    /// array position, matching how snapshots are serialized.
    pub fn into_snapshot(self) -> ProfileSnapshot {
        let operations = self
            .operations
            .into_iter()
            .enumerate()
            .map(|(seq, op)| OperationStats {
                name: op.name,
                call_count: op.call_count,
                total_duration: Duration::from_nanos(op.total_ns),
                samples: op
                    .samples
                    .into_iter()
                    .map(|sample| RegionSample {
                        started_at: Duration::from_nanos(sample.started_at_ns),
                        duration: Duration::from_nanos(sample.duration_ns),
                        metadata: sample.metadata,
                    })
                    .collect(),
                metadata: op.metadata,
                seq: seq as u64,
            })
            .collect();
        let checkpoints = self
            .checkpoints
            .into_iter()
            .map(|cp| CheckpointEvent {
                name: cp.name,
                at: Duration::from_nanos(cp.at_ns),
                metadata: cp.metadata,
            })
            .collect();

        ProfileSnapshot {
            operations,
            checkpoints,
        }
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Grand total as a [`Duration`].
    pub fn total_time(&self) -> Duration {
        Duration::from_nanos(self.total_time_ns)
    }
}

/// Write a snapshot as JSON at `path`, atomically.
pub fn write_profile<P: AsRef<Path>>(snapshot: &ProfileSnapshot, path: P) -> Result<()> {
    let path = path.as_ref();
    let json = JsonProfile::from_snapshot(snapshot).to_json()?;

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Read and validate a profile file.
pub fn read_profile<P: AsRef<Path>>(path: P) -> Result<JsonProfile> {
    let contents = fs::read_to_string(path)?;
    parse_profile(&contents)
}

/// Parse and validate profile JSON.
pub fn parse_profile(contents: &str) -> Result<JsonProfile> {
    let profile: JsonProfile = serde_json::from_str(contents)?;
    if profile.format != FORMAT_TAG {
        return Err(ExportError::UnsupportedFormat(profile.format));
    }
    Ok(profile)
}
