// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Address Value Object
//!
//! Backs the [`ip_sequence`](crate::generators::ip_sequence) generator: a base
//! address, optionally with a prefix length, advanced once per node.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use thiserror::Error;

/// Network validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Invalid IP address format: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid CIDR notation: {0}")]
    InvalidCidr(String),

    #[error("Invalid prefix length: {0} (must be 0-32 for IPv4, 0-128 for IPv6)")]
    InvalidPrefixLength(u8),

    #[error("Address space exhausted: {base} + {offset}")]
    AddressExhausted { base: IpAddr, offset: u128 },
}

/// IPv4 or IPv6 address with an optional prefix length.
///
/// ```rust
/// use cim_compose::domain::IpAddressWithCidr;
///
/// let base = IpAddressWithCidr::new("172.31.1.101/24").unwrap();
/// assert_eq!(base.offset_by(2).unwrap().to_string(), "172.31.1.103/24");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IpAddressWithCidr {
    address: IpAddr,
    prefix_length: Option<u8>,
}

impl IpAddressWithCidr {
    /// Parse `address` or `address/prefix`
    pub fn new(cidr: impl AsRef<str>) -> Result<Self, NetworkError> {
        let cidr = cidr.as_ref();

        let (addr_str, prefix_length) = match cidr.split_once('/') {
            Some((addr_str, prefix_str)) => {
                let prefix = prefix_str
                    .parse::<u8>()
                    .map_err(|_| NetworkError::InvalidCidr(cidr.to_string()))?;
                (addr_str, Some(prefix))
            }
            None => (cidr, None),
        };

        let address = IpAddr::from_str(addr_str)
            .map_err(|_| NetworkError::InvalidIpAddress(addr_str.to_string()))?;

        Self::from_parts(address, prefix_length)
    }

    pub fn from_parts(address: IpAddr, prefix_length: Option<u8>) -> Result<Self, NetworkError> {
        if let Some(prefix) = prefix_length {
            if prefix > Self::max_prefix(&address) {
                return Err(NetworkError::InvalidPrefixLength(prefix));
            }
        }

        Ok(Self {
            address,
            prefix_length,
        })
    }

    fn max_prefix(address: &IpAddr) -> u8 {
        match address {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        }
    }

    pub fn address(&self) -> IpAddr {
        self.address
    }

    pub fn prefix_length(&self) -> Option<u8> {
        self.prefix_length
    }

    pub fn is_ipv4(&self) -> bool {
        self.address.is_ipv4()
    }

    /// The address `offset` steps after this one, keeping the prefix length.
    ///
    /// Fails when the result would leave the address family's range. The
    /// prefix is not treated as a boundary.
    pub fn offset_by(&self, offset: u128) -> Result<Self, NetworkError> {
        let exhausted = || NetworkError::AddressExhausted {
            base: self.address,
            offset,
        };

        let address = match self.address {
            IpAddr::V4(v4) => {
                let offset = u32::try_from(offset).map_err(|_| exhausted())?;
                let next = u32::from(v4).checked_add(offset).ok_or_else(exhausted)?;
                IpAddr::V4(Ipv4Addr::from(next))
            }
            IpAddr::V6(v6) => {
                let next = u128::from(v6).checked_add(offset).ok_or_else(exhausted)?;
                IpAddr::V6(Ipv6Addr::from(next))
            }
        };

        Ok(Self {
            address,
            prefix_length: self.prefix_length,
        })
    }

    /// `address/prefix`, or the bare address when no prefix was given
    pub fn as_cidr(&self) -> String {
        match self.prefix_length {
            Some(prefix) => format!("{}/{}", self.address, prefix),
            None => self.address.to_string(),
        }
    }
}

impl fmt::Display for IpAddressWithCidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_cidr())
    }
}

impl FromStr for IpAddressWithCidr {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
