//! Namespace listing

use crate::kubernetes::client::K8sClient;
use crate::kubernetes::error::K8sResult;
use k8s_openapi::api::core::v1::Namespace;
use kube::api::{Api, ListParams};

/// List the names of all namespaces
pub async fn list_namespaces(client: &K8sClient) -> K8sResult<Vec<String>> {
    let namespaces: Api<Namespace> = Api::all(client.inner().clone());
    let list = namespaces.list(&ListParams::default()).await?;

    Ok(list
        .items
        .into_iter()
        .filter_map(|ns| ns.metadata.name)
        .collect())
}
