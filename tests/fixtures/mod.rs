// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cim-compose
//!
//! Deterministic node groups and generators shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::bail;
use cim_compose::{generators, Attribute, NodeAttributes, NodeGroup};
use serde_json::json;

/// A group with every slot driven by a generator
pub fn generated_group(index: usize, name: &str, instances: usize) -> NodeGroup {
    NodeGroup::new(index, name, instances)
        .with_box(generators::template("box-{group_index}"))
        .with_boxname(generators::template("{group_name}-vm{node_number}"))
        .with_hostname(generators::sequence_name(name))
        .with_aliases(Attribute::from_fn(|_, group_name: &str, node_index| {
            vec![group_name.to_string(), format!("alias{node_index}")]
        }))
        .with_ip(generators::template("10.{group_index}.0.{node_number}"))
        .with_cpus(Attribute::from_fn(|_, _, node_index| 1 + node_index as u32 % 4))
        .with_memory(Attribute::from_fn(|_, _, node_index| 512 * (1 + node_index as u64)))
        .with_ansible_groups(Attribute::from_fn(|_, group_name: &str, node_index| {
            let parity = if node_index % 2 == 0 { "even" } else { "odd" };
            vec![group_name.to_string(), parity.to_string()]
        }))
        .with_attributes(Attribute::from_fn(|group_index, _, node_index| {
            NodeAttributes::from([
                ("group_index".to_string(), json!(group_index)),
                ("primary".to_string(), json!(node_index == 0)),
            ])
        }))
}

/// An ip generator failing for `failing_index`
pub fn failing_ip(failing_index: usize) -> Attribute<String> {
    Attribute::generator(move |_, _, node_index| {
        if node_index == failing_index {
            bail!("address pool exhausted at node {node_index}");
        }
        Ok(format!("192.168.0.{}", node_index + 10))
    })
}

/// Records every `(group_index, group_name, node_index)` a generator sees
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<(usize, String, usize)>>>);

impl CallLog {
    pub fn hostname_generator(&self) -> Attribute<String> {
        let calls = Arc::clone(&self.0);
        Attribute::from_fn(move |group_index, group_name: &str, node_index| {
            calls
                .lock()
                .unwrap()
                .push((group_index, group_name.to_string(), node_index));
            format!("h{node_index}")
        })
    }

    pub fn calls(&self) -> Vec<(usize, String, usize)> {
        self.0.lock().unwrap().clone()
    }
}

/// Counts invocations of a cpus generator
pub fn counting_cpus(counter: Arc<AtomicUsize>) -> Attribute<u32> {
    Attribute::from_fn(move |_, _, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        2
    })
}
