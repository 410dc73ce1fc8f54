// Copyright (c) 2025 - Cowboy AI, Inc.
//! Composition configuration
//!
//! Environment variables:
//!
//! | variable                      | meaning                           |
//! |-------------------------------|-----------------------------------|
//! | `CIM_COMPOSE_CLUSTER_NAME`    | cluster name (naming prefix)      |
//! | `CIM_COMPOSE_CLUSTER_DOMAIN`  | cluster domain (FQDN suffix)      |
//! | `CIM_COMPOSE_CLUSTER_OFFSET`  | first global node index           |
//! | `CIM_COMPOSE_DEFINITION`      | path to a cluster definition file |
//!
//! Unset variables leave the corresponding value to the definition file.

use std::collections::HashMap;
use std::env::{self, VarError};
use std::path::PathBuf;

use crate::context::ClusterContext;
use crate::errors::{ComposeError, ComposeResult};

pub const ENV_CLUSTER_NAME: &str = "CIM_COMPOSE_CLUSTER_NAME";
pub const ENV_CLUSTER_DOMAIN: &str = "CIM_COMPOSE_CLUSTER_DOMAIN";
pub const ENV_CLUSTER_OFFSET: &str = "CIM_COMPOSE_CLUSTER_OFFSET";
pub const ENV_DEFINITION: &str = "CIM_COMPOSE_DEFINITION";

/// Default definition file name
pub const DEFAULT_DEFINITION: &str = "cluster.json";

/// Cluster overrides and definition location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeConfig {
    pub cluster_name: Option<String>,
    pub cluster_domain: Option<String>,
    pub cluster_offset: Option<i64>,
    pub definition_path: PathBuf,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            cluster_name: None,
            cluster_domain: None,
            cluster_offset: None,
            definition_path: PathBuf::from(DEFAULT_DEFINITION),
        }
    }
}

impl ComposeConfig {
    /// Load configuration from the process environment.
    ///
    /// Only the `CIM_COMPOSE_*` variables are read; anything else in the
    /// environment, valid UTF-8 or not, is ignored.
    pub fn from_env() -> ComposeResult<Self> {
        let mut vars = Vec::new();
        for key in [
            ENV_CLUSTER_NAME,
            ENV_CLUSTER_DOMAIN,
            ENV_CLUSTER_OFFSET,
            ENV_DEFINITION,
        ] {
            match env::var(key) {
                Ok(value) => vars.push((key, value)),
                Err(VarError::NotPresent) => {}
                Err(VarError::NotUnicode(raw)) => {
                    return Err(ComposeError::Configuration(format!(
                        "{key} is not valid UTF-8: {raw:?}"
                    )));
                }
            }
        }
        Self::from_vars(vars)
    }

    /// Load configuration from an explicit set of variables; unknown keys are
    /// ignored
    pub fn from_vars<I, K, V>(vars: I) -> ComposeResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let cluster_offset = vars
            .get(ENV_CLUSTER_OFFSET)
            .map(|raw| {
                raw.trim().parse::<i64>().map_err(|e| {
                    ComposeError::Configuration(format!(
                        "{ENV_CLUSTER_OFFSET} must be an integer, got {raw:?}: {e}"
                    ))
                })
            })
            .transpose()?;

        Ok(Self {
            cluster_name: vars.get(ENV_CLUSTER_NAME).cloned(),
            cluster_domain: vars.get(ENV_CLUSTER_DOMAIN).cloned(),
            cluster_offset,
            definition_path: vars
                .get(ENV_DEFINITION)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DEFINITION)),
        })
    }

    /// Apply the overrides on top of `base`
    pub fn apply(&self, base: ClusterContext) -> ClusterContext {
        ClusterContext {
            name: self.cluster_name.clone().unwrap_or(base.name),
            domain: self.cluster_domain.clone().unwrap_or(base.domain),
            offset: self.cluster_offset.unwrap_or(base.offset),
        }
    }

    /// Cluster context from the overrides alone
    pub fn context(&self) -> ClusterContext {
        self.apply(ClusterContext::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let config = ComposeConfig::from_vars(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config, ComposeConfig::default());
        assert_eq!(config.context(), ClusterContext::default());
    }

    #[test]
    fn test_reads_all_variables() {
        let config = ComposeConfig::from_vars([
            (ENV_CLUSTER_NAME, "lab"),
            (ENV_CLUSTER_DOMAIN, "example.com"),
            (ENV_CLUSTER_OFFSET, " -4 "),
            (ENV_DEFINITION, "/etc/cim/lab.json"),
        ])
        .unwrap();

        assert_eq!(
            config.context(),
            ClusterContext::new("lab").with_domain("example.com").with_offset(-4)
        );
        assert_eq!(config.definition_path, PathBuf::from("/etc/cim/lab.json"));
    }

    #[test]
    fn test_bad_offset() {
        let err = ComposeConfig::from_vars([(ENV_CLUSTER_OFFSET, "ten")]).unwrap_err();
        assert!(matches!(err, ComposeError::Configuration(ref msg) if msg.contains("ten")));
    }

    #[test]
    fn test_unrelated_variables_are_ignored() {
        let config = ComposeConfig::from_vars([
            ("PATH", "/usr/bin"),
            (ENV_CLUSTER_NAME, "lab"),
            ("CIM_COMPOSE_UNUSED", "x"),
        ])
        .unwrap();
        assert_eq!(config.cluster_name.as_deref(), Some("lab"));
        assert_eq!(config.cluster_domain, None);
    }

    #[cfg(unix)]
    #[test]
    fn test_from_env_ignores_foreign_non_utf8_variable() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        env::set_var(
            "CIM_COMPOSE_TEST_FOREIGN_BYTES",
            OsStr::from_bytes(b"\xff\xfe"),
        );
        let config = ComposeConfig::from_env();
        env::remove_var("CIM_COMPOSE_TEST_FOREIGN_BYTES");

        assert!(config.is_ok());
    }

    #[test]
    fn test_overrides_only_set_values() {
        let config = ComposeConfig::from_vars([(ENV_CLUSTER_DOMAIN, "")]).unwrap();
        let base = ClusterContext::new("lab").with_domain("lan").with_offset(3);
        assert_eq!(config.apply(base), ClusterContext::new("lab").with_offset(3));
    }
}
