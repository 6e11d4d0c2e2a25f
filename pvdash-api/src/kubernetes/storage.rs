//! PersistentVolume and PersistentVolumeClaim listing
//!
//! Raw list calls plus the transcription of cluster objects into the
//! dashboard's flat records.

use crate::kubernetes::client::K8sClient;
use crate::kubernetes::error::K8sResult;
use k8s_openapi::api::core::v1::{PersistentVolume, PersistentVolumeClaim};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use kube::api::{Api, ListParams};
use pvdash_common::{Claim, Phase, Volume};

/// Rendering of creation timestamps, e.g. `2024-03-01/12:00:00`
pub const CREATION_TIME_FORMAT: &str = "%Y-%m-%d/%H:%M:%S";

/// Quantity shown for volumes that declare no storage capacity
const ZERO_QUANTITY: &str = "0";

/// List all PVs (cluster-scoped)
pub async fn list_pvs(client: &K8sClient) -> K8sResult<Vec<PersistentVolume>> {
    let pvs: Api<PersistentVolume> = Api::all(client.inner().clone());
    let list = pvs.list(&ListParams::default()).await?;

    Ok(list.items)
}

/// List PVCs in a namespace
pub async fn list_pvcs(client: &K8sClient, namespace: &str) -> K8sResult<Vec<PersistentVolumeClaim>> {
    let pvcs: Api<PersistentVolumeClaim> = Api::namespaced(client.inner().clone(), namespace);
    let list = pvcs.list(&ListParams::default()).await?;

    Ok(list.items)
}

/// Format a creation timestamp; missing timestamps render as empty.
///
/// Always UTC, independent of the host's local zone.
pub fn format_creation_time(time: Option<&Time>) -> String {
    time.map(|t| t.0.format(CREATION_TIME_FORMAT).to_string())
        .unwrap_or_default()
}

pub fn pv_to_volume(pv: PersistentVolume) -> Volume {
    let metadata = pv.metadata;
    let spec = pv.spec.unwrap_or_default();
    let status = pv.status.unwrap_or_default();

    let size = spec
        .capacity
        .and_then(|c| c.get("storage").map(|q| q.0.clone()))
        .unwrap_or_else(|| ZERO_QUANTITY.to_string());

    Volume {
        name: metadata.name.unwrap_or_default(),
        size,
        creation_time: format_creation_time(metadata.creation_timestamp.as_ref()),
        uuid: metadata.uid.unwrap_or_default(),
        labels: metadata.labels.unwrap_or_default(),
        status: Phase::from_cluster(status.phase.as_deref()),
    }
}

/// Transcribe a claim listed under `namespace`.
///
/// The listing namespace is recorded rather than the object's own metadata,
/// so a claim can never be attributed to a namespace it was not listed under.
pub fn pvc_to_claim(pvc: PersistentVolumeClaim, namespace: &str) -> Claim {
    let metadata = pvc.metadata;
    let spec = pvc.spec.unwrap_or_default();
    let status = pvc.status.unwrap_or_default();

    Claim {
        name: metadata.name.unwrap_or_default(),
        namespace: namespace.to_string(),
        creation_time: format_creation_time(metadata.creation_timestamp.as_ref()),
        uuid: metadata.uid.unwrap_or_default(),
        labels: metadata.labels.unwrap_or_default(),
        status: Phase::from_cluster(status.phase.as_deref()),
        bound_volume: spec.volume_name.unwrap_or_default(),
    }
}
