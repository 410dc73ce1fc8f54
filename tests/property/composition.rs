// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Node Group Composition

use cim_compose::{apply_prefix, qualify, ClusterContext, NodeGroup};
use proptest::prelude::*;

use crate::fixtures::{failing_ip, generated_group};

// ============================================================================
// Strategies
// ============================================================================

fn label() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,8}"
}

fn maybe_empty_label() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), label()]
}

fn cluster_context() -> impl Strategy<Value = ClusterContext> {
    (maybe_empty_label(), maybe_empty_label(), -1_000i64..1_000).prop_map(
        |(name, domain, offset)| ClusterContext {
            name,
            domain,
            offset,
        },
    )
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Exactly `instances` nodes, local indices 0..instances in order
    #[test]
    fn prop_node_count_and_order(instances in 0usize..40, ctx in cluster_context()) {
        let group = NodeGroup::new(0, "web", instances);
        let mut local = Vec::new();
        group.compose(&ctx, |node| local.push(node.local_index)).unwrap();

        prop_assert_eq!(local, (0..instances).collect::<Vec<_>>());
    }

    /// Global index is always offset + local index
    #[test]
    fn prop_global_index(instances in 0usize..20, ctx in cluster_context()) {
        let nodes = generated_group(1, "app", instances).compose_nodes(&ctx).unwrap();
        for node in nodes {
            prop_assert_eq!(node.index, ctx.global_index(node.local_index));
            prop_assert_eq!(node.index, i128::from(ctx.offset) + node.local_index as i128);
        }
    }

    /// Same group and context always produce byte-identical output
    #[test]
    fn prop_compose_is_deterministic(
        group_index in 0usize..8,
        name in label(),
        instances in 0usize..15,
        ctx in cluster_context(),
    ) {
        let group = generated_group(group_index, &name, instances);
        let first = serde_json::to_vec(&group.compose_nodes(&ctx).unwrap()).unwrap();
        let second = serde_json::to_vec(&group.compose_nodes(&ctx).unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Names follow the prefix rule, FQDN follows the domain rule
    #[test]
    fn prop_naming_rules(instances in 1usize..10, ctx in cluster_context()) {
        let group = NodeGroup::new(0, "node", instances);
        for node in group.compose_nodes(&ctx).unwrap() {
            let raw = format!("node{}", node.local_index + 1);
            prop_assert_eq!(&node.hostname, &apply_prefix(&ctx.name, &raw));
            prop_assert_eq!(&node.boxname, &node.hostname);
            prop_assert_eq!(&node.fqdn, &qualify(&node.hostname, &ctx.domain));
            if ctx.name.is_empty() {
                prop_assert_eq!(&node.hostname, &raw);
            }
        }
    }

    /// A failure at node k delivers exactly nodes 0..k and reports k
    #[test]
    fn prop_failure_delivers_prefix((instances, failing) in (1usize..20).prop_flat_map(|n| (Just(n), 0..n))) {
        let group = NodeGroup::new(0, "web", instances).with_ip(failing_ip(failing));
        let mut delivered = Vec::new();

        let err = group
            .compose(&ClusterContext::default(), |node| delivered.push(node.local_index))
            .unwrap_err();

        prop_assert_eq!(err.node_index, failing);
        prop_assert_eq!(delivered, (0..failing).collect::<Vec<_>>());
    }
}
