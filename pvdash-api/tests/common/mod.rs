//! Common test utilities: an in-memory cluster and object builders

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use k8s_openapi::api::core::v1::{
    PersistentVolume, PersistentVolumeClaim, PersistentVolumeClaimSpec,
    PersistentVolumeClaimStatus, PersistentVolumeClaimVolumeSource, PersistentVolumeSpec,
    PersistentVolumeStatus, Pod, PodSpec, Volume,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, Time};
use kube::core::ErrorResponse;
use pvdash_api::kubernetes::{ClusterReader, K8sError, K8sResult};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Cluster double backed by in-memory object lists
#[derive(Default)]
pub struct FakeCluster {
    pub volumes: Vec<PersistentVolume>,
    /// Namespaces in listing order, each with its claims
    pub namespaces: Vec<(String, Vec<PersistentVolumeClaim>)>,
    pub pods: BTreeMap<String, Vec<Pod>>,
    pub fail_volumes: bool,
    pub fail_namespaces: bool,
    pub fail_claims_in: Option<String>,
    pub fail_pods: bool,
    pub pod_calls: AtomicUsize,
    pub last_field_selector: std::sync::Mutex<Option<String>>,
}

impl FakeCluster {
    pub fn with_volume(mut self, pv: PersistentVolume) -> Self {
        self.volumes.push(pv);
        self
    }

    pub fn with_namespace(mut self, name: &str, claims: Vec<PersistentVolumeClaim>) -> Self {
        self.namespaces.push((name.to_string(), claims));
        self
    }

    pub fn with_pod(mut self, namespace: &str, pod: Pod) -> Self {
        self.pods.entry(namespace.to_string()).or_default().push(pod);
        self
    }

    pub fn pod_calls(&self) -> usize {
        self.pod_calls.load(Ordering::SeqCst)
    }
}

/// 403 as the API server would return it
pub fn forbidden(what: &str) -> K8sError {
    K8sError::KubeError(kube::Error::Api(ErrorResponse {
        status: "Failure".to_string(),
        message: format!("{} is forbidden", what),
        reason: "Forbidden".to_string(),
        code: 403,
    }))
}

#[async_trait]
impl ClusterReader for FakeCluster {
    async fn list_persistent_volumes(&self) -> K8sResult<Vec<PersistentVolume>> {
        if self.fail_volumes {
            return Err(forbidden("persistentvolumes"));
        }
        Ok(self.volumes.clone())
    }

    async fn list_namespaces(&self) -> K8sResult<Vec<String>> {
        if self.fail_namespaces {
            return Err(forbidden("namespaces"));
        }
        Ok(self.namespaces.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn list_persistent_volume_claims(
        &self,
        namespace: &str,
    ) -> K8sResult<Vec<PersistentVolumeClaim>> {
        if self.fail_claims_in.as_deref() == Some(namespace) {
            return Err(forbidden("persistentvolumeclaims"));
        }
        Ok(self
            .namespaces
            .iter()
            .find(|(name, _)| name == namespace)
            .map(|(_, claims)| claims.clone())
            .unwrap_or_default())
    }

    async fn list_pods(
        &self,
        namespace: &str,
        field_selector: Option<&str>,
    ) -> K8sResult<Vec<Pod>> {
        self.pod_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_field_selector.lock() {
            *last = field_selector.map(String::from);
        }
        if self.fail_pods {
            return Err(forbidden("pods"));
        }
        Ok(self.pods.get(namespace).cloned().unwrap_or_default())
    }
}

pub fn created_at() -> Time {
    Time(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
}

pub fn pv(name: &str, size: &str, phase: &str) -> PersistentVolume {
    PersistentVolume {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            uid: Some(format!("uid-{}", name)),
            labels: Some(BTreeMap::from([("app".to_string(), "db".to_string())])),
            creation_timestamp: Some(created_at()),
            ..Default::default()
        },
        spec: Some(PersistentVolumeSpec {
            capacity: Some(BTreeMap::from([(
                "storage".to_string(),
                Quantity(size.to_string()),
            )])),
            ..Default::default()
        }),
        status: Some(PersistentVolumeStatus {
            phase: Some(phase.to_string()),
            ..Default::default()
        }),
    }
}

/// Claim object; `metadata.namespace` is set to `namespace`
pub fn pvc(name: &str, namespace: &str, volume: Option<&str>) -> PersistentVolumeClaim {
    PersistentVolumeClaim {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            uid: Some(format!("uid-{}", name)),
            creation_timestamp: Some(created_at()),
            ..Default::default()
        },
        spec: Some(PersistentVolumeClaimSpec {
            volume_name: volume.map(String::from),
            ..Default::default()
        }),
        status: Some(PersistentVolumeClaimStatus {
            phase: Some(if volume.is_some() { "Bound" } else { "Pending" }.to_string()),
            ..Default::default()
        }),
    }
}

pub fn pod(name: &str, node: &str, claim: &str) -> Pod {
    Pod {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            ..Default::default()
        },
        spec: Some(PodSpec {
            node_name: Some(node.to_string()),
            volumes: Some(vec![Volume {
                name: "data".to_string(),
                persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
                    claim_name: claim.to_string(),
                    read_only: None,
                }),
                ..Default::default()
            }]),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Two volumes and one bound claim in `ns1`
pub fn scenario_cluster() -> FakeCluster {
    FakeCluster::default()
        .with_volume(pv("pv-a", "10Gi", "Bound"))
        .with_volume(pv("pv-b", "5Gi", "Available"))
        .with_namespace("ns1", vec![pvc("claim-x", "ns1", Some("pv-a"))])
}
