// Copyright (c) 2025 - Cowboy AI, Inc.
//! Multi-group Cluster Composition
//!
//! A [`Cluster`] owns its groups and composes them one after another. Each
//! group starts where the previous one ended, so global node indices are
//! contiguous across the whole cluster:
//!
//! ```text
//! offset = 10, groups: web ×2, db ×1
//!
//! web1 → 10   web2 → 11   db1 → 12
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::context::ClusterContext;
use crate::domain::Node;
use crate::errors::AttributeExpressionError;
use crate::group::NodeGroup;

/// Ansible group name → boxnames of its members, in node order
pub type Inventory = BTreeMap<String, Vec<String>>;

/// A named set of node groups
#[derive(Debug, Clone, Default)]
pub struct Cluster {
    context: ClusterContext,
    groups: Vec<NodeGroup>,
}

impl Cluster {
    pub fn new(context: ClusterContext) -> Self {
        Self {
            context,
            groups: Vec::new(),
        }
    }

    pub fn context(&self) -> &ClusterContext {
        &self.context
    }

    pub fn groups(&self) -> &[NodeGroup] {
        &self.groups
    }

    /// Add a group with default attribute rules and return it for configuration.
    ///
    /// The group index is its position in the cluster.
    pub fn add_group(&mut self, name: impl Into<String>, instances: usize) -> &mut NodeGroup {
        let index = self.groups.len();
        self.groups.push(NodeGroup::new(index, name, instances));
        &mut self.groups[index]
    }

    /// Add a group built elsewhere.
    ///
    /// Its own index is kept as-is; indices are not required to match
    /// positions.
    pub fn push_group(&mut self, group: NodeGroup) {
        self.groups.push(group);
    }

    /// Total number of nodes across all groups
    pub fn instances(&self) -> usize {
        self.groups.iter().map(NodeGroup::instances).sum()
    }

    /// Compose every group in order, handing nodes to `sink`
    pub fn compose_with<F>(&self, mut sink: F) -> Result<(), AttributeExpressionError>
    where
        F: FnMut(Node),
    {
        let mut first_index = self.context.global_index(0);
        for group in &self.groups {
            group.compose_from(&self.context, first_index, &mut sink)?;
            first_index += group.instances() as i128;
        }
        Ok(())
    }

    /// Compose every group and build the ansible inventory
    pub fn compose(&self) -> Result<ComposedCluster, AttributeExpressionError> {
        let mut nodes = Vec::with_capacity(self.instances());
        self.compose_with(|node| nodes.push(node))?;

        let composed = ComposedCluster::from_nodes(nodes);
        info!(
            "Composed cluster {:?}: {} nodes in {} groups",
            self.context.name,
            composed.nodes.len(),
            self.groups.len()
        );
        Ok(composed)
    }
}

/// Result of composing a whole cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedCluster {
    pub nodes: Vec<Node>,
    pub inventory: Inventory,
}

impl ComposedCluster {
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        let mut inventory = Inventory::new();
        for node in &nodes {
            for group in &node.ansible_groups {
                inventory
                    .entry(group.clone())
                    .or_default()
                    .push(node.boxname.clone());
            }
        }
        Self { nodes, inventory }
    }

    pub fn node(&self, boxname: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.boxname == boxname)
    }
}
