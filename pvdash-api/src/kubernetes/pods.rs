//! Pod listing and claim-to-node placement

use crate::kubernetes::client::K8sClient;
use crate::kubernetes::error::K8sResult;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, ListParams};

/// A pod mounting a claim, and the node it is scheduled on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodPlacement {
    pub pod: String,
    /// `None` while the pod is unscheduled
    pub node: Option<String>,
}

/// List pods in a namespace, optionally narrowed by a field selector
pub async fn list_pods(
    client: &K8sClient,
    namespace: &str,
    field_selector: Option<&str>,
) -> K8sResult<Vec<Pod>> {
    let pods: Api<Pod> = Api::namespaced(client.inner().clone(), namespace);

    let mut lp = ListParams::default();
    if let Some(selector) = field_selector {
        lp = lp.fields(selector);
    }

    let pod_list = pods.list(&lp).await?;

    Ok(pod_list.items)
}

/// Whether any of the pod's volumes is backed by the named claim
pub fn mounts_claim(pod: &Pod, claim_name: &str) -> bool {
    pod.spec
        .as_ref()
        .and_then(|spec| spec.volumes.as_ref())
        .map(|volumes| {
            volumes.iter().any(|v| {
                v.persistent_volume_claim
                    .as_ref()
                    .is_some_and(|pvc| pvc.claim_name == claim_name)
            })
        })
        .unwrap_or(false)
}

/// Placements of the pods that mount `claim_name`
pub fn placements_for_claim(pods: &[Pod], claim_name: &str) -> Vec<PodPlacement> {
    pods.iter()
        .filter(|pod| mounts_claim(pod, claim_name))
        .map(|pod| PodPlacement {
            pod: pod.metadata.name.clone().unwrap_or_default(),
            node: pod.spec.as_ref().and_then(|s| s.node_name.clone()),
        })
        .collect()
}
