//! pvdash library
//!
//! Aggregates PersistentVolumes and PersistentVolumeClaims from a cluster once
//! at startup and serves them as an HTML dashboard.

// Core modules
pub mod config;
pub mod error;

// Cluster access and snapshot assembly
pub mod aggregator;
pub mod kubernetes;

// HTTP presentation
pub mod dashboard;

// Logging configuration
pub mod logging;

// Graceful shutdown handling
pub mod shutdown;
