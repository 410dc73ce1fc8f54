// Copyright (c) 2025 - Cowboy AI, Inc.
//! Declarative Cluster Definitions
//!
//! JSON form of a [`Cluster`]. Slots left out keep the group defaults; name
//! slots may be a literal or a template, the ip slot may also be an address
//! sequence:
//!
//! ```json
//! {
//!   "name": "lab",
//!   "domain": "example.com",
//!   "groups": [
//!     {
//!       "name": "web",
//!       "instances": 2,
//!       "hostname": { "template": "www{node_number}" },
//!       "ip": { "sequence": "10.0.0.10/24" },
//!       "memory": 1024
//!     },
//!     { "name": "db", "instances": 1, "box": "centos/7" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::attribute::Attribute;
use crate::cluster::Cluster;
use crate::context::ClusterContext;
use crate::domain::NodeAttributes;
use crate::errors::{ComposeError, ComposeResult};
use crate::generators;
use crate::group::NodeGroup;

/// A name slot: fixed string or per-node template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NameDefinition {
    Template { template: String },
    Literal(String),
}

impl From<NameDefinition> for Attribute<String> {
    fn from(value: NameDefinition) -> Self {
        match value {
            NameDefinition::Template { template } => generators::template(template),
            NameDefinition::Literal(literal) => Attribute::Literal(literal),
        }
    }
}

/// The ip slot: fixed address, template, or consecutive addresses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IpDefinition {
    Template { template: String },
    Sequence { sequence: String },
    Literal(String),
}

/// One group of a cluster definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupDefinition {
    pub name: String,

    /// Signed so negative counts can be reported instead of failing to parse
    pub instances: i64,

    #[serde(rename = "box", default, skip_serializing_if = "Option::is_none")]
    pub box_image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boxname: Option<NameDefinition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<NameDefinition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<IpDefinition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpus: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ansible_groups: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<NodeAttributes>,
}

impl GroupDefinition {
    /// Build the group at position `index` of its cluster
    pub fn into_group(self, index: usize) -> ComposeResult<NodeGroup> {
        let mut group = NodeGroup::try_new(index, self.name, self.instances)?;

        if let Some(box_image) = self.box_image {
            group.box_image = box_image.into();
        }
        if let Some(boxname) = self.boxname {
            group.boxname = boxname.into();
        }
        if let Some(hostname) = self.hostname {
            group.hostname = hostname.into();
        }
        if let Some(aliases) = self.aliases {
            group.aliases = aliases.into();
        }
        if let Some(ip) = self.ip {
            let ip = match ip {
                IpDefinition::Template { template } => generators::template(template),
                IpDefinition::Sequence { sequence } => generators::ip_sequence(&sequence)
                    .map_err(|e| ComposeError::InvalidGroup {
                        group: group.name().to_string(),
                        reason: e.to_string(),
                    })?,
                IpDefinition::Literal(ip) => ip.into(),
            };
            group.ip = ip;
        }
        if let Some(cpus) = self.cpus {
            group.cpus = cpus.into();
        }
        if let Some(memory) = self.memory {
            group.memory = memory.into();
        }
        if let Some(ansible_groups) = self.ansible_groups {
            group.ansible_groups = ansible_groups.into();
        }
        if let Some(attributes) = self.attributes {
            group.attributes = attributes.into();
        }

        Ok(group)
    }
}

/// A whole cluster: context plus ordered groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterDefinition {
    #[serde(flatten)]
    pub context: ClusterContext,

    #[serde(default)]
    pub groups: Vec<GroupDefinition>,
}

impl ClusterDefinition {
    pub fn from_json(json: &str) -> ComposeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> ComposeResult<Self> {
        let path = path.as_ref();
        debug!("Loading cluster definition from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Build the cluster; group indices follow definition order
    pub fn into_cluster(self) -> ComposeResult<Cluster> {
        let mut cluster = Cluster::new(self.context);
        for (index, group) in self.groups.into_iter().enumerate() {
            cluster.push_group(group.into_group(index)?);
        }
        Ok(cluster)
    }
}
