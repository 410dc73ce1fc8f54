// Copyright (c) 2025 - Cowboy AI, Inc.
//! Node Group Composition
//!
//! A [`NodeGroup`] describes a set of similar machines: how many, and for each
//! of nine attributes either a literal or a generator. [`NodeGroup::compose`]
//! expands it into [`Node`]s, one per node index, in order:
//!
//! ```text
//! for node_index in 0..instances
//!     resolve box, boxname, hostname, aliases, ip, cpus, memory,
//!             ansible_groups, attributes
//!     boxname, hostname  ← cluster prefix applied
//!     fqdn               ← hostname[.domain]
//!     sink(Node { index: offset + node_index, local_index: node_index, .. })
//! ```
//!
//! The first generator failure stops the loop. Nodes already handed to the
//! sink stay with the caller.

use tracing::{debug, warn};

use crate::attribute::{Attribute, AttributeKind};
use crate::context::ClusterContext;
use crate::domain::{Node, NodeAttributes};
use crate::errors::{AttributeExpressionError, ComposeError, ComposeResult};
use crate::generators;

/// Box used when a group does not set one
pub const DEFAULT_BOX: &str = "ubuntu/trusty64";
pub const DEFAULT_CPUS: u32 = 1;
/// MiB
pub const DEFAULT_MEMORY: u64 = 256;
/// Boxname and hostname pattern, see [`generators::template`]
pub const DEFAULT_NAME_TEMPLATE: &str = "{group_name}{node_number}";

/// A group of machines sharing the same attribute rules
#[derive(Debug, Clone)]
pub struct NodeGroup {
    index: usize,
    name: String,
    instances: usize,

    pub box_image: Attribute<String>,
    pub boxname: Attribute<String>,
    pub hostname: Attribute<String>,
    pub aliases: Attribute<Vec<String>>,
    pub ip: Attribute<String>,
    pub cpus: Attribute<u32>,
    pub memory: Attribute<u64>,
    pub ansible_groups: Attribute<Vec<String>>,
    pub attributes: Attribute<NodeAttributes>,
}

impl NodeGroup {
    /// Create a group with default attribute rules:
    ///
    /// | attribute        | default                                    |
    /// |------------------|--------------------------------------------|
    /// | box              | `ubuntu/trusty64`                          |
    /// | boxname/hostname | `{group_name}{node_index + 1}`             |
    /// | aliases          | none                                       |
    /// | ip               | `172.31.{group_index}.{101 + node_index}`  |
    /// | cpus / memory    | `1` / `256`                                |
    /// | ansible_groups   | `[group_name]`                             |
    /// | attributes       | empty                                      |
    pub fn new(index: usize, name: impl Into<String>, instances: usize) -> Self {
        Self {
            index,
            name: name.into(),
            instances,
            box_image: Attribute::Literal(DEFAULT_BOX.to_string()),
            boxname: generators::template(DEFAULT_NAME_TEMPLATE),
            hostname: generators::template(DEFAULT_NAME_TEMPLATE),
            aliases: Attribute::Literal(Vec::new()),
            ip: Attribute::from_fn(|group_index, _, node_index| {
                format!("172.31.{}.{}", group_index, 100 + node_index + 1)
            }),
            cpus: Attribute::Literal(DEFAULT_CPUS),
            memory: Attribute::Literal(DEFAULT_MEMORY),
            ansible_groups: Attribute::from_fn(|_, group_name: &str, _| {
                vec![group_name.to_string()]
            }),
            attributes: Attribute::Literal(NodeAttributes::new()),
        }
    }

    /// Like [`NodeGroup::new`], for instance counts coming from untyped input.
    ///
    /// A negative count is rejected rather than treated as zero.
    pub fn try_new(
        index: usize,
        name: impl Into<String>,
        instances: i64,
    ) -> ComposeResult<Self> {
        let name = name.into();
        let instances = usize::try_from(instances).map_err(|_| ComposeError::InvalidGroup {
            group: name.clone(),
            reason: format!("instance count must not be negative, got {instances}"),
        })?;
        Ok(Self::new(index, name, instances))
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instances(&self) -> usize {
        self.instances
    }

    pub fn with_box(mut self, value: impl Into<Attribute<String>>) -> Self {
        self.box_image = value.into();
        self
    }

    pub fn with_boxname(mut self, value: impl Into<Attribute<String>>) -> Self {
        self.boxname = value.into();
        self
    }

    pub fn with_hostname(mut self, value: impl Into<Attribute<String>>) -> Self {
        self.hostname = value.into();
        self
    }

    pub fn with_aliases(mut self, value: impl Into<Attribute<Vec<String>>>) -> Self {
        self.aliases = value.into();
        self
    }

    pub fn with_ip(mut self, value: impl Into<Attribute<String>>) -> Self {
        self.ip = value.into();
        self
    }

    pub fn with_cpus(mut self, value: impl Into<Attribute<u32>>) -> Self {
        self.cpus = value.into();
        self
    }

    pub fn with_memory(mut self, value: impl Into<Attribute<u64>>) -> Self {
        self.memory = value.into();
        self
    }

    pub fn with_ansible_groups(mut self, value: impl Into<Attribute<Vec<String>>>) -> Self {
        self.ansible_groups = value.into();
        self
    }

    pub fn with_attributes(mut self, value: impl Into<Attribute<NodeAttributes>>) -> Self {
        self.attributes = value.into();
        self
    }

    /// Expand the group, handing each node to `sink` in `local_index` order.
    ///
    /// Calling this again, with the same or another cluster context, starts
    /// over at node 0 and produces an independent sequence.
    pub fn compose<F>(
        &self,
        cluster: &ClusterContext,
        sink: F,
    ) -> Result<(), AttributeExpressionError>
    where
        F: FnMut(Node),
    {
        self.compose_from(cluster, cluster.global_index(0), sink)
    }

    /// Like [`NodeGroup::compose`], with global indices counted from `first_index`
    pub(crate) fn compose_from<F>(
        &self,
        cluster: &ClusterContext,
        first_index: i128,
        mut sink: F,
    ) -> Result<(), AttributeExpressionError>
    where
        F: FnMut(Node),
    {
        debug!(
            "Composing group {} ({} instances, first index {})",
            self.name, self.instances, first_index
        );

        for node_index in 0..self.instances {
            let node = self
                .compose_node(cluster, first_index, node_index)
                .map_err(|e| {
                    warn!("{}", e);
                    e
                })?;
            debug!(
                "Composed node {} (index {}) of group {}",
                node.boxname, node.index, self.name
            );
            sink(node);
        }

        debug!("Group {} composed", self.name);
        Ok(())
    }

    /// Expand the group into a vector
    pub fn compose_nodes(
        &self,
        cluster: &ClusterContext,
    ) -> Result<Vec<Node>, AttributeExpressionError> {
        let mut nodes = Vec::with_capacity(self.instances);
        self.compose(cluster, |node| nodes.push(node))?;
        Ok(nodes)
    }

    fn compose_node(
        &self,
        cluster: &ClusterContext,
        first_index: i128,
        node_index: usize,
    ) -> Result<Node, AttributeExpressionError> {
        let box_image = self.resolve(&self.box_image, AttributeKind::Box, node_index)?;
        let boxname = self.resolve(&self.boxname, AttributeKind::Boxname, node_index)?;
        let hostname = self.resolve(&self.hostname, AttributeKind::Hostname, node_index)?;
        let aliases = self.resolve(&self.aliases, AttributeKind::Aliases, node_index)?;
        let ip = self.resolve(&self.ip, AttributeKind::Ip, node_index)?;
        let cpus = self.resolve(&self.cpus, AttributeKind::Cpus, node_index)?;
        let memory = self.resolve(&self.memory, AttributeKind::Memory, node_index)?;
        let ansible_groups =
            self.resolve(&self.ansible_groups, AttributeKind::AnsibleGroups, node_index)?;
        let attributes = self.resolve(&self.attributes, AttributeKind::Attributes, node_index)?;

        let boxname = cluster.prefixed(&boxname);
        let hostname = cluster.prefixed(&hostname);
        let fqdn = cluster.fqdn(&hostname);

        Ok(Node {
            box_image,
            boxname,
            hostname,
            fqdn,
            aliases: aliases.join(","),
            ip,
            cpus,
            memory,
            ansible_groups,
            attributes,
            index: first_index + node_index as i128,
            local_index: node_index,
        })
    }

    fn resolve<T: Clone>(
        &self,
        slot: &Attribute<T>,
        attribute: AttributeKind,
        node_index: usize,
    ) -> Result<T, AttributeExpressionError> {
        slot.resolve(attribute, self.index, &self.name, node_index)
    }
}
