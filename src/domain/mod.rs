// Copyright (c) 2025 - Cowboy AI, Inc.
//! Node Domain Models
//!
//! - [`Node`] - a fully resolved machine produced by composition
//! - [`Hostname`] - RFC 1123 host name, for optional checks on composed nodes
//! - [`IpAddressWithCidr`] - IPv4/IPv6 address with optional prefix, used by
//!   address sequences

pub mod hostname;
pub mod network;
pub mod node;

pub use hostname::{Hostname, HostnameError};
pub use network::{IpAddressWithCidr, NetworkError};
pub use node::{Node, NodeAttributes};
