//! Kubernetes integration
//!
//! Read-only access to the cluster objects the dashboard is built from:
//! - PersistentVolumes (cluster-scoped)
//! - Namespaces and the PersistentVolumeClaims inside them
//! - Pods, for claim placement diagnostics

pub mod client;
pub mod error;
pub mod namespaces;
pub mod pods;
pub mod storage;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{PersistentVolume, PersistentVolumeClaim, Pod};

pub use client::K8sClient;
pub use error::{K8sError, K8sResult};

/// Read-only list operations the aggregator needs from a cluster
#[async_trait]
pub trait ClusterReader: Send + Sync {
    async fn list_persistent_volumes(&self) -> K8sResult<Vec<PersistentVolume>>;

    /// Names of all namespaces
    async fn list_namespaces(&self) -> K8sResult<Vec<String>>;

    async fn list_persistent_volume_claims(
        &self,
        namespace: &str,
    ) -> K8sResult<Vec<PersistentVolumeClaim>>;

    async fn list_pods(&self, namespace: &str, field_selector: Option<&str>)
        -> K8sResult<Vec<Pod>>;
}

#[async_trait]
impl ClusterReader for K8sClient {
    async fn list_persistent_volumes(&self) -> K8sResult<Vec<PersistentVolume>> {
        storage::list_pvs(self).await
    }

    async fn list_namespaces(&self) -> K8sResult<Vec<String>> {
        namespaces::list_namespaces(self).await
    }

    async fn list_persistent_volume_claims(
        &self,
        namespace: &str,
    ) -> K8sResult<Vec<PersistentVolumeClaim>> {
        storage::list_pvcs(self, namespace).await
    }

    async fn list_pods(
        &self,
        namespace: &str,
        field_selector: Option<&str>,
    ) -> K8sResult<Vec<Pod>> {
        pods::list_pods(self, namespace, field_selector).await
    }
}
