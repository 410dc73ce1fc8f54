// Copyright (c) 2025 - Cowboy AI, Inc.
//! Declarative node group composition for CIM virtual clusters
//!
//! A [`NodeGroup`] says how many machines a group has and, per attribute,
//! either a literal value or a generator of `(group_index, group_name,
//! node_index)`. Composing the group with a [`ClusterContext`] yields fully
//! resolved [`Node`]s in order, ready for a provisioning backend.
//!
//! ```rust
//! use cim_compose::{generators, ClusterContext, NodeGroup};
//!
//! let group = NodeGroup::new(0, "web", 2)
//!     .with_hostname(generators::template("www{node_number}"))
//!     .with_memory(1024u64);
//!
//! let cluster = ClusterContext::new("lab").with_domain("example.com");
//! let mut fqdns = Vec::new();
//! group.compose(&cluster, |node| fqdns.push(node.fqdn)).unwrap();
//!
//! assert_eq!(fqdns, ["lab-www1.example.com", "lab-www2.example.com"]);
//! ```

pub mod attribute;
pub mod cluster;
pub mod config;
pub mod context;
pub mod definition;
pub mod domain;
pub mod errors;
pub mod generators;
pub mod group;

// Re-export commonly used types
pub use attribute::{Attribute, AttributeKind};
pub use cluster::{Cluster, ComposedCluster, Inventory};
pub use config::ComposeConfig;
pub use context::{apply_prefix, qualify, ClusterContext};
pub use definition::{ClusterDefinition, GroupDefinition};
pub use domain::{Hostname, Node, NodeAttributes};
pub use errors::{AttributeExpressionError, ComposeError, ComposeResult};
pub use group::NodeGroup;
