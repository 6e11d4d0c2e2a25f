//! Kubernetes error types
//!
//! Every variant is fatal when it happens during startup aggregation.

use thiserror::Error;

/// Kubernetes-specific errors
#[derive(Debug, Error)]
pub enum K8sError {
    /// Kubeconfig could not be read, parsed, or turned into a client
    #[error("Invalid kubeconfig: {0}")]
    InvalidKubeconfig(String),

    /// Error from kube-rs client
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    /// A list call failed; carries the resource being listed
    #[error("Failed to list {resource}: {source}")]
    ListFailed {
        resource: String,
        #[source]
        source: Box<K8sError>,
    },
}

impl K8sError {
    /// Attach the resource kind (and namespace, where relevant) to a listing failure
    pub fn listing(resource: impl Into<String>, source: K8sError) -> Self {
        K8sError::ListFailed {
            resource: resource.into(),
            source: Box::new(source),
        }
    }
}

/// Result type alias for Kubernetes operations
pub type K8sResult<T> = std::result::Result<T, K8sError>;
