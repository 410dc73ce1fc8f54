// Copyright (c) 2025 - Cowboy AI, Inc.
//! Cluster Context and Naming Rules

use serde::{Deserialize, Serialize};

/// Cluster-level values shared by every group composed into one cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterContext {
    /// Prefix for boxnames and hostnames; empty disables prefixing
    #[serde(default)]
    pub name: String,

    /// Domain appended to hostnames to form the FQDN; may be empty
    #[serde(default)]
    pub domain: String,

    /// Added to each node's local index to form its global index
    #[serde(default)]
    pub offset: i64,
}

impl ClusterContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// Same cluster, different offset
    pub fn at_offset(&self, offset: i64) -> Self {
        Self {
            offset,
            ..self.clone()
        }
    }

    pub fn prefixed(&self, candidate: &str) -> String {
        apply_prefix(&self.name, candidate)
    }

    pub fn fqdn(&self, hostname: &str) -> String {
        qualify(hostname, &self.domain)
    }

    /// `offset + local_index`, widened so any offset and group size fit
    pub fn global_index(&self, local_index: usize) -> i128 {
        i128::from(self.offset) + local_index as i128
    }
}

/// `cluster_name-candidate`, or `candidate` when the cluster is unnamed
pub fn apply_prefix(cluster_name: &str, candidate: &str) -> String {
    if cluster_name.is_empty() {
        candidate.to_string()
    } else {
        format!("{cluster_name}-{candidate}")
    }
}

/// `hostname.domain`, or `hostname` when the domain is empty
pub fn qualify(hostname: &str, domain: &str) -> String {
    if domain.is_empty() {
        hostname.to_string()
    } else {
        format!("{hostname}.{domain}")
    }
}
