// Copyright (c) 2025 - Cowboy AI, Inc.
//! Integration tests for cluster composition and JSON definitions

mod fixtures;

use std::io::Write;

use cim_compose::{
    AttributeKind, Cluster, ClusterContext, ClusterDefinition, ComposeConfig, ComposeError,
};
use pretty_assertions::assert_eq;
use serde_json::json;

use fixtures::{failing_ip, generated_group};

const LAB_DEFINITION: &str = r#"{
    "name": "lab",
    "domain": "example.com",
    "offset": 1,
    "groups": [
        {
            "name": "web",
            "instances": 2,
            "hostname": { "template": "www{node_number}" },
            "aliases": ["frontend"],
            "ip": { "sequence": "10.0.0.10/24" },
            "memory": 1024,
            "attributes": { "tier": "edge" }
        },
        {
            "name": "db",
            "instances": 1,
            "box": "centos/7",
            "ip": "10.0.1.5",
            "cpus": 4,
            "ansible_groups": ["db", "backup"]
        }
    ]
}"#;

#[test]
fn test_definition_composes_cluster() {
    let cluster = ClusterDefinition::from_json(LAB_DEFINITION)
        .unwrap()
        .into_cluster()
        .unwrap();
    let composed = cluster.compose().unwrap();

    let summary: Vec<_> = composed
        .nodes
        .iter()
        .map(|n| (n.boxname.as_str(), n.fqdn.as_str(), n.ip.as_str(), n.index))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("lab-web1", "lab-www1.example.com", "10.0.0.10/24", 1),
            ("lab-web2", "lab-www2.example.com", "10.0.0.11/24", 2),
            ("lab-db1", "lab-db1.example.com", "10.0.1.5", 3),
        ]
    );

    let web = composed.node("lab-web1").unwrap();
    assert_eq!(web.aliases, "frontend");
    assert_eq!(web.memory, 1024);
    assert_eq!(web.cpus, 1);
    assert_eq!(web.attributes["tier"], json!("edge"));

    let db = composed.node("lab-db1").unwrap();
    assert_eq!(db.box_image, "centos/7");
    assert_eq!(db.cpus, 4);

    assert_eq!(composed.inventory["web"], vec!["lab-web1", "lab-web2"]);
    assert_eq!(composed.inventory["backup"], vec!["lab-db1"]);
}

#[test]
fn test_definition_loaded_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(LAB_DEFINITION.as_bytes()).unwrap();

    let definition = ClusterDefinition::load(file.path()).unwrap();
    assert_eq!(definition.context.name, "lab");
    assert_eq!(definition.groups.len(), 2);
}

#[test]
fn test_missing_definition_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ClusterDefinition::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ComposeError::Io(_)));
}

#[test]
fn test_config_overrides_definition_context() {
    let config = ComposeConfig::from_vars([
        ("CIM_COMPOSE_CLUSTER_NAME", "staging"),
        ("CIM_COMPOSE_CLUSTER_OFFSET", "100"),
    ])
    .unwrap();

    let mut definition = ClusterDefinition::from_json(LAB_DEFINITION).unwrap();
    definition.context = config.apply(definition.context);
    let composed = definition.into_cluster().unwrap().compose().unwrap();

    assert_eq!(composed.nodes[0].fqdn, "staging-www1.example.com");
    assert_eq!(composed.nodes[0].index, 100);
    assert_eq!(composed.nodes[2].index, 102);
}

#[test]
fn test_cluster_failure_reports_group() {
    let mut cluster = Cluster::new(ClusterContext::new("lab"));
    cluster.push_group(generated_group(0, "app", 2));
    cluster.add_group("cache", 3).ip = failing_ip(1);

    let mut delivered = Vec::new();
    let err = cluster
        .compose_with(|node| delivered.push(node.boxname))
        .unwrap_err();

    assert_eq!(err.group_name, "cache");
    assert_eq!(err.node_index, 1);
    assert_eq!(err.attribute, AttributeKind::Ip);
    assert_eq!(delivered, vec!["lab-app-vm1", "lab-app-vm2", "lab-cache1"]);
}

#[test]
fn test_composed_cluster_serializes() {
    let mut cluster = Cluster::new(ClusterContext::new("lab"));
    cluster.add_group("web", 1);
    let value = serde_json::to_value(cluster.compose().unwrap()).unwrap();

    assert_eq!(value["nodes"][0]["box"], json!("ubuntu/trusty64"));
    assert_eq!(value["nodes"][0]["hostname"], json!("lab-web1"));
    assert_eq!(value["inventory"], json!({ "web": ["lab-web1"] }));
}
