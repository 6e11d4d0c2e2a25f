//! Data model shared between the aggregator and the dashboard renderer
//!
//! Every record here is a flat, read-only transcription of a cluster object.
//! Field names are serialized in camelCase because the page template binds
//! to them directly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lifecycle phase reported by the cluster for a PersistentVolume or claim
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Phase {
    Pending,
    Available,
    Bound,
    Released,
    Failed,
    Lost,
    #[default]
    Unknown,
}

impl Phase {
    /// Map the cluster's phase string; missing or unrecognised phases become `Unknown`
    pub fn from_cluster(phase: Option<&str>) -> Self {
        match phase {
            Some("Pending") => Self::Pending,
            Some("Available") => Self::Available,
            Some("Bound") => Self::Bound,
            Some("Released") => Self::Released,
            Some("Failed") => Self::Failed,
            Some("Lost") => Self::Lost,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Available => "Available",
            Self::Bound => "Bound",
            Self::Released => "Released",
            Self::Failed => "Failed",
            Self::Lost => "Lost",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// PersistentVolume record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub name: String,
    /// Declared storage capacity as a quantity string, e.g. "10Gi"
    pub size: String,
    pub creation_time: String,
    /// Cluster-assigned uid
    pub uuid: String,
    pub labels: BTreeMap<String, String>,
    pub status: Phase,
}

/// PersistentVolumeClaim record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub name: String,
    pub namespace: String,
    pub creation_time: String,
    pub uuid: String,
    pub labels: BTreeMap<String, String>,
    pub status: Phase,
    /// Name of the bound volume, empty when unbound. Not guaranteed to resolve.
    pub bound_volume: String,
}

impl Claim {
    pub fn is_bound(&self) -> bool {
        !self.bound_volume.is_empty()
    }
}

/// Point-in-time capture of every volume and claim in the cluster
///
/// Built once at startup and never mutated. There is deliberately no index
/// from volumes to claims; lookups scan the volume list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    #[serde(rename = "pvs")]
    volumes: Vec<Volume>,
    #[serde(rename = "pvcs")]
    claims: Vec<Claim>,
}

impl Snapshot {
    pub fn new(volumes: Vec<Volume>, claims: Vec<Claim>) -> Self {
        Self { volumes, claims }
    }

    pub fn volumes(&self) -> &[Volume] {
        &self.volumes
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// Find the volume a claim is bound to, if it is present in this snapshot
    pub fn resolve_volume(&self, claim: &Claim) -> Option<&Volume> {
        if !claim.is_bound() {
            return None;
        }
        self.volumes.iter().find(|v| v.name == claim.bound_volume)
    }

    /// Claims whose bound-volume reference does not match any captured volume
    pub fn unresolved_claims(&self) -> impl Iterator<Item = &Claim> {
        self.claims
            .iter()
            .filter(|c| c.is_bound() && self.resolve_volume(c).is_none())
    }
}
