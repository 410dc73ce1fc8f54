// Copyright (c) 2025 - Cowboy AI, Inc.
//! Compose Preview
//!
//! Loads a cluster definition, composes every node group and prints the
//! resulting nodes and ansible inventory as JSON on stdout.
//!
//! Run with: cargo run --bin compose-preview
//!
//! Configuration comes from the environment:
//! - `CIM_COMPOSE_DEFINITION` definition file (default: `cluster.json`)
//! - `CIM_COMPOSE_CLUSTER_NAME`, `CIM_COMPOSE_CLUSTER_DOMAIN`,
//!   `CIM_COMPOSE_CLUSTER_OFFSET` override the definition's cluster values

use anyhow::{Context, Result};
use cim_compose::{ClusterDefinition, ComposeConfig};
use tracing::{info, warn};

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = ComposeConfig::from_env().context("Invalid compose configuration")?;
    info!(
        "Loading cluster definition from {}",
        config.definition_path.display()
    );

    let mut definition = ClusterDefinition::load(&config.definition_path).with_context(|| {
        format!(
            "Failed to load cluster definition {}",
            config.definition_path.display()
        )
    })?;
    definition.context = config.apply(definition.context);

    let cluster = definition
        .into_cluster()
        .context("Invalid cluster definition")?;
    info!(
        "Composing cluster {:?} ({} groups, {} nodes)",
        cluster.context().name,
        cluster.groups().len(),
        cluster.instances()
    );

    let composed = cluster.compose().context("Failed to compose cluster")?;

    for node in &composed.nodes {
        if let Err(e) = node.qualified_hostname() {
            warn!("Node {} has an invalid FQDN {:?}: {}", node.boxname, node.fqdn, e);
        }
    }

    let json = serde_json::to_string_pretty(&composed).context("Failed to serialize nodes")?;
    println!("{json}");

    Ok(())
}
