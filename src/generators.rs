// Copyright (c) 2025 - Cowboy AI, Inc.
//! Ready-made Generators
//!
//! Common per-node value rules, usable anywhere an [`Attribute`] is expected.

use anyhow::Context;

use crate::attribute::Attribute;
use crate::domain::IpAddressWithCidr;

/// `{prefix}{node_index + 1}`: `web1`, `web2`, ...
pub fn sequence_name(prefix: impl Into<String>) -> Attribute<String> {
    let prefix = prefix.into();
    Attribute::from_fn(move |_, _, node_index| format!("{}{}", prefix, node_index + 1))
}

/// Fill a pattern from the node's identity.
///
/// Placeholders: `{group_index}`, `{group_name}`, `{node_index}` (0-based) and
/// `{node_number}` (1-based). Anything else is copied verbatim.
///
/// ```rust
/// use cim_compose::attribute::AttributeKind;
/// use cim_compose::generators::template;
///
/// let name = template("{group_name}-{node_number}");
/// assert_eq!(name.resolve(AttributeKind::Hostname, 0, "db", 1).unwrap(), "db-2");
/// ```
pub fn template(pattern: impl Into<String>) -> Attribute<String> {
    let pattern = pattern.into();
    Attribute::from_fn(move |group_index, group_name: &str, node_index| {
        render(&pattern, group_index, group_name, node_index)
    })
}

const PLACEHOLDERS: [&str; 4] = ["{group_index}", "{group_name}", "{node_index}", "{node_number}"];

/// One left-to-right pass; substituted text is never scanned again
fn render(
    pattern: &str,
    group_index: usize,
    group_name: &str,
    node_index: usize,
) -> String {
    let mut out = String::with_capacity(pattern.len() + group_name.len());
    let mut rest = pattern;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        match PLACEHOLDERS.iter().find(|p| tail.starts_with(**p)) {
            Some(&placeholder) => {
                match placeholder {
                    "{group_index}" => out.push_str(&group_index.to_string()),
                    "{group_name}" => out.push_str(group_name),
                    "{node_index}" => out.push_str(&node_index.to_string()),
                    _ => out.push_str(&(node_index + 1).to_string()),
                }
                rest = &tail[placeholder.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Consecutive addresses starting at `base` (`address` or `address/prefix`).
///
/// The base is parsed when the generator is built; running past the end of
/// the address space fails for that node.
pub fn ip_sequence(base: &str) -> Result<Attribute<String>, crate::domain::NetworkError> {
    let base = IpAddressWithCidr::new(base)?;
    Ok(Attribute::generator(move |_, _, node_index| {
        let address = base
            .offset_by(node_index as u128)
            .with_context(|| format!("no address for node {node_index} after {base}"))?;
        Ok(address.to_string())
    }))
}
