// Copyright (c) 2025 - Cowboy AI, Inc.
//! Attribute Slots and Resolution
//!
//! Every per-node attribute of a [`NodeGroup`](crate::NodeGroup) is either a
//! literal, reused as-is for every node, or a generator computing the value
//! from the node's identity:
//!
//! ```text
//! (group_index, group_name, node_index) → value
//! ```
//!
//! Resolution is the single place where generator failures are caught. Both
//! `Err` results and panics are turned into an
//! [`AttributeExpressionError`] carrying the attribute, node index and group.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::errors::AttributeExpressionError;

/// Generator signature: `(group_index, group_name, node_index) -> value`
pub type GeneratorFn<T> = dyn Fn(usize, &str, usize) -> anyhow::Result<T> + Send + Sync;

/// Identifies one of the nine attribute slots of a node group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    /// Base box image
    Box,
    /// Machine name shown by the virtualization tool
    Boxname,
    Hostname,
    Aliases,
    Ip,
    Cpus,
    Memory,
    /// Orchestration (ansible) group membership
    AnsibleGroups,
    /// Free-form attribute map
    Attributes,
}

impl AttributeKind {
    /// All attribute kinds, in resolution order
    pub const ALL: [AttributeKind; 9] = [
        AttributeKind::Box,
        AttributeKind::Boxname,
        AttributeKind::Hostname,
        AttributeKind::Aliases,
        AttributeKind::Ip,
        AttributeKind::Cpus,
        AttributeKind::Memory,
        AttributeKind::AnsibleGroups,
        AttributeKind::Attributes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKind::Box => "box",
            AttributeKind::Boxname => "boxname",
            AttributeKind::Hostname => "hostname",
            AttributeKind::Aliases => "aliases",
            AttributeKind::Ip => "ip",
            AttributeKind::Cpus => "cpus",
            AttributeKind::Memory => "memory",
            AttributeKind::AnsibleGroups => "ansible_groups",
            AttributeKind::Attributes => "attributes",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A literal value or a generator for one attribute slot
pub enum Attribute<T> {
    /// Same value for every node of the group
    Literal(T),
    /// Value computed per node
    Generator(Arc<GeneratorFn<T>>),
}

impl<T> Attribute<T> {
    /// Wrap a fallible generator
    pub fn generator<F>(f: F) -> Self
    where
        F: Fn(usize, &str, usize) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        Attribute::Generator(Arc::new(f))
    }

    /// Wrap a generator that cannot fail
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(usize, &str, usize) -> T + Send + Sync + 'static,
    {
        Attribute::generator(move |group_index, group_name: &str, node_index| {
            Ok(f(group_index, group_name, node_index))
        })
    }

    pub fn is_generator(&self) -> bool {
        matches!(self, Attribute::Generator(_))
    }
}

impl<T: Clone> Attribute<T> {
    /// Resolve this slot for one node.
    ///
    /// Literals are cloned. Generators are invoked with
    /// `(group_index, group_name, node_index)`; an error or a panic inside the
    /// generator becomes an [`AttributeExpressionError`].
    pub fn resolve(
        &self,
        attribute: AttributeKind,
        group_index: usize,
        group_name: &str,
        node_index: usize,
    ) -> Result<T, AttributeExpressionError> {
        let generator = match self {
            Attribute::Literal(value) => return Ok(value.clone()),
            Attribute::Generator(generator) => generator,
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            generator(group_index, group_name, node_index)
        }));

        let message = match outcome {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(err)) => err.to_string(),
            Err(payload) => panic_message(payload.as_ref()),
        };

        Err(AttributeExpressionError::new(
            message, attribute, node_index, group_name,
        ))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "generator panicked".to_string()
    }
}

impl<T> From<T> for Attribute<T> {
    fn from(value: T) -> Self {
        Attribute::Literal(value)
    }
}

impl From<&str> for Attribute<String> {
    fn from(value: &str) -> Self {
        Attribute::Literal(value.to_string())
    }
}

impl<T> Clone for Attribute<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        match self {
            Attribute::Literal(value) => Attribute::Literal(value.clone()),
            Attribute::Generator(generator) => Attribute::Generator(Arc::clone(generator)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Attribute<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Attribute::Generator(_) => f.write_str("Generator(..)"),
        }
    }
}
