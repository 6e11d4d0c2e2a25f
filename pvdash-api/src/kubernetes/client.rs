//! Kubernetes client wrapper
//!
//! Wraps the kube-rs Client with the API server it was built for.

use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::path::Path;

use super::error::{K8sError, K8sResult};
use crate::config::KubernetesConfig;

/// Wrapper around kube-rs Client with cluster context
#[derive(Clone)]
pub struct K8sClient {
    inner: Client,
    context: Option<String>,
    api_server: String,
}

impl K8sClient {
    /// Build a client according to the connection settings
    pub async fn connect(config: &KubernetesConfig) -> K8sResult<Self> {
        if config.in_cluster {
            return Self::from_incluster();
        }

        Self::from_kubeconfig_file(&config.kubeconfig, config.context.as_deref()).await
    }

    /// Create client from a kubeconfig file on disk
    pub async fn from_kubeconfig_file(path: &Path, context: Option<&str>) -> K8sResult<Self> {
        let yaml = tokio::fs::read_to_string(path).await.map_err(|e| {
            K8sError::InvalidKubeconfig(format!("Failed to read {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), "Loaded kubeconfig");

        Self::from_kubeconfig(&yaml, context).await
    }

    /// Create client from kubeconfig YAML with optional context
    pub async fn from_kubeconfig(kubeconfig_yaml: &str, context: Option<&str>) -> K8sResult<Self> {
        let kubeconfig = Kubeconfig::from_yaml(kubeconfig_yaml).map_err(|e| {
            K8sError::InvalidKubeconfig(format!("Failed to parse kubeconfig: {}", e))
        })?;

        let api_server = Self::extract_api_server(&kubeconfig, context)?;

        let config = Config::from_custom_kubeconfig(
            kubeconfig,
            &KubeConfigOptions {
                context: context.map(String::from),
                ..Default::default()
            },
        )
        .await
        .map_err(|e| K8sError::InvalidKubeconfig(format!("Failed to create config: {}", e)))?;

        let client = Client::try_from(config)
            .map_err(|e| K8sError::InvalidKubeconfig(format!("Failed to create client: {}", e)))?;

        Ok(Self {
            inner: client,
            context: context.map(String::from),
            api_server,
        })
    }

    /// Create client from in-cluster configuration (for running inside K8s)
    pub fn from_incluster() -> K8sResult<Self> {
        let config = Config::incluster().map_err(|e| {
            K8sError::InvalidKubeconfig(format!("Failed to get in-cluster config: {}", e))
        })?;

        let api_server = config.cluster_url.to_string();

        let client = Client::try_from(config)
            .map_err(|e| K8sError::InvalidKubeconfig(format!("Failed to create client: {}", e)))?;

        Ok(Self {
            inner: client,
            context: None,
            api_server,
        })
    }

    /// Resolve the API server URL for the selected (or current) context
    fn extract_api_server(kubeconfig: &Kubeconfig, context_name: Option<&str>) -> K8sResult<String> {
        let context_name = context_name
            .map(String::from)
            .or_else(|| kubeconfig.current_context.clone())
            .ok_or_else(|| {
                K8sError::InvalidKubeconfig("No context specified and no current-context".into())
            })?;

        let context = kubeconfig
            .contexts
            .iter()
            .find(|c| c.name == context_name)
            .ok_or_else(|| {
                K8sError::InvalidKubeconfig(format!("Context '{}' not found", context_name))
            })?;

        let cluster_name = context
            .context
            .as_ref()
            .map(|c| c.cluster.as_str())
            .ok_or_else(|| {
                K8sError::InvalidKubeconfig("Context has no cluster reference".into())
            })?;

        let cluster = kubeconfig
            .clusters
            .iter()
            .find(|c| c.name == cluster_name)
            .ok_or_else(|| {
                K8sError::InvalidKubeconfig(format!("Cluster '{}' not found", cluster_name))
            })?;

        cluster
            .cluster
            .as_ref()
            .and_then(|c| c.server.clone())
            .ok_or_else(|| K8sError::InvalidKubeconfig("Cluster has no server URL".into()))
    }

    /// Get the inner kube-rs Client
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    /// Get API server URL
    pub fn api_server(&self) -> &str {
        &self.api_server
    }

    /// Context explicitly selected at construction, if any
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }
}

impl std::fmt::Debug for K8sClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("K8sClient")
            .field("context", &self.context)
            .field("api_server", &self.api_server)
            .finish()
    }
}
