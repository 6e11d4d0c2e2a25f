//! One-shot cluster aggregation
//!
//! Lists volumes, then every namespace's claims, and assembles the
//! [`Snapshot`] served for the lifetime of the process. Any failure listing
//! volumes, namespaces or claims aborts the whole run; nothing partial is
//! returned. Pod placement is a diagnostic side channel whose failures are
//! governed by [`PlacementPolicy`].

use crate::config::{KubernetesConfig, PlacementPolicy};
use crate::kubernetes::pods::{placements_for_claim, PodPlacement};
use crate::kubernetes::storage::{pv_to_volume, pvc_to_claim};
use crate::kubernetes::{ClusterReader, K8sError, K8sResult};
use pvdash_common::{Claim, Snapshot, Volume};
use tracing::{debug, info, warn};

/// Aggregation settings
#[derive(Debug, Clone, Default)]
pub struct AggregatorOptions {
    pub placement: PlacementPolicy,
    pub pod_field_selector: Option<String>,
}

impl From<&KubernetesConfig> for AggregatorOptions {
    fn from(config: &KubernetesConfig) -> Self {
        Self {
            placement: config.placement,
            pod_field_selector: config.pod_field_selector.clone(),
        }
    }
}

pub struct Aggregator {
    options: AggregatorOptions,
}

impl Aggregator {
    pub fn new(options: AggregatorOptions) -> Self {
        Self { options }
    }

    /// Capture every volume and claim in the cluster
    pub async fn collect<C>(&self, cluster: &C) -> K8sResult<Snapshot>
    where
        C: ClusterReader + ?Sized,
    {
        let volumes = self.collect_volumes(cluster).await?;
        let claims = self.collect_claims(cluster).await?;

        let snapshot = Snapshot::new(volumes, claims);

        for claim in snapshot.unresolved_claims() {
            debug!(
                claim = %claim.name,
                namespace = %claim.namespace,
                volume = %claim.bound_volume,
                "Claim references a volume that was not listed"
            );
        }

        Ok(snapshot)
    }

    async fn collect_volumes<C>(&self, cluster: &C) -> K8sResult<Vec<Volume>>
    where
        C: ClusterReader + ?Sized,
    {
        let pvs = cluster
            .list_persistent_volumes()
            .await
            .map_err(|e| K8sError::listing("persistentvolumes", e))?;

        info!("PersistentVolumes in the cluster:");

        let volumes: Vec<Volume> = pvs.into_iter().map(pv_to_volume).collect();
        for volume in &volumes {
            info!(
                name = %volume.name,
                size = %volume.size,
                status = %volume.status,
                "PersistentVolume {}",
                volume.name
            );
        }

        Ok(volumes)
    }

    async fn collect_claims<C>(&self, cluster: &C) -> K8sResult<Vec<Claim>>
    where
        C: ClusterReader + ?Sized,
    {
        let namespaces = cluster
            .list_namespaces()
            .await
            .map_err(|e| K8sError::listing("namespaces", e))?;

        let mut claims = Vec::new();

        for namespace in &namespaces {
            let pvcs = cluster
                .list_persistent_volume_claims(namespace)
                .await
                .map_err(|e| {
                    K8sError::listing(
                        format!("persistentvolumeclaims in namespace {}", namespace),
                        e,
                    )
                })?;

            for pvc in pvcs {
                let claim = pvc_to_claim(pvc, namespace);
                self.report_placement(cluster, &claim).await?;
                claims.push(claim);
            }
        }

        debug!(
            namespaces = namespaces.len(),
            claims = claims.len(),
            "Collected persistent volume claims"
        );

        Ok(claims)
    }

    /// Log which nodes the claim's pods run on, honouring the placement policy
    async fn report_placement<C>(&self, cluster: &C, claim: &Claim) -> K8sResult<()>
    where
        C: ClusterReader + ?Sized,
    {
        match self.options.placement {
            PlacementPolicy::Disabled => Ok(()),
            PlacementPolicy::BestEffort => {
                if let Err(e) = self.lookup_placement(cluster, claim).await {
                    warn!(
                        claim = %claim.name,
                        namespace = %claim.namespace,
                        "Pod placement lookup failed: {}",
                        e
                    );
                }
                Ok(())
            }
            PlacementPolicy::Strict => self.lookup_placement(cluster, claim).await.map(|_| ()),
        }
    }

    async fn lookup_placement<C>(&self, cluster: &C, claim: &Claim) -> K8sResult<Vec<PodPlacement>>
    where
        C: ClusterReader + ?Sized,
    {
        let pods = cluster
            .list_pods(&claim.namespace, self.options.pod_field_selector.as_deref())
            .await
            .map_err(|e| K8sError::listing(format!("pods in namespace {}", claim.namespace), e))?;

        let placements = placements_for_claim(&pods, &claim.name);
        for placement in &placements {
            let node = placement.node.as_deref().unwrap_or("<unscheduled>");
            info!(
                claim = %claim.name,
                namespace = %claim.namespace,
                "Pod {} is running on node {}",
                placement.pod,
                node
            );
        }

        Ok(placements)
    }
}
