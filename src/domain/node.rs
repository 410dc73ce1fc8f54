// Copyright (c) 2025 - Cowboy AI, Inc.
//! Composed Node Record

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Hostname, HostnameError};

/// Free-form per-node attributes
pub type NodeAttributes = BTreeMap<String, serde_json::Value>;

/// One fully resolved machine of a node group.
///
/// Produced by [`NodeGroup::compose`](crate::NodeGroup::compose) with every
/// attribute already evaluated; ownership moves to the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Base box image
    #[serde(rename = "box")]
    pub box_image: String,

    /// Machine name in the virtualization tool, cluster prefix applied
    pub boxname: String,

    /// Hostname, cluster prefix applied
    pub hostname: String,

    /// `hostname.domain`, or `hostname` when the cluster has no domain
    pub fqdn: String,

    /// Comma-joined alias list
    pub aliases: String,

    pub ip: String,

    pub cpus: u32,

    /// Memory in MiB
    pub memory: u64,

    pub ansible_groups: Vec<String>,

    #[serde(default)]
    pub attributes: NodeAttributes,

    /// Cluster-wide index, `cluster offset + local_index`.
    ///
    /// Wider than the offset so an offset near `i64::MAX` cannot overflow.
    pub index: i128,

    /// Position within the group
    pub local_index: usize,
}

impl Node {
    /// Aliases split back into a list; empty when there are none.
    ///
    /// This is not a round-trip of the resolved list: an alias containing `,`
    /// comes back as several entries, and empty aliases are only kept when
    /// they sit between other aliases.
    pub fn alias_list(&self) -> Vec<&str> {
        if self.aliases.is_empty() {
            return Vec::new();
        }
        self.aliases.split(',').collect()
    }

    /// The FQDN checked against RFC 1123
    pub fn qualified_hostname(&self) -> Result<Hostname, HostnameError> {
        Hostname::new(self.fqdn.clone())
    }

    pub fn in_ansible_group(&self, group: &str) -> bool {
        self.ansible_groups.iter().any(|g| g == group)
    }
}
