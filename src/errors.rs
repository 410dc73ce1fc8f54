// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for node group composition

use thiserror::Error;

use crate::attribute::AttributeKind;

/// A generator failed while resolving an attribute of a node.
///
/// This is the only error produced by attribute resolution and group
/// composition. Whatever the generator returned (or panicked with) is
/// reduced to its message; the original error type is not kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Failed to evaluate attribute `{attribute}` for node {node_index} of group `{group_name}`: {message}"
)]
pub struct AttributeExpressionError {
    /// Message of the underlying failure
    pub message: String,
    /// Attribute being resolved
    pub attribute: AttributeKind,
    /// Index of the node within its group
    pub node_index: usize,
    /// Name of the group being composed
    pub group_name: String,
}

impl AttributeExpressionError {
    pub fn new(
        message: impl Into<String>,
        attribute: AttributeKind,
        node_index: usize,
        group_name: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            attribute,
            node_index,
            group_name: group_name.into(),
        }
    }
}

/// Errors that can occur around composition: configuration, definitions,
/// group validation
#[derive(Debug, Error)]
pub enum ComposeError {
    /// Generator failure during composition
    #[error(transparent)]
    AttributeExpression(#[from] AttributeExpressionError),

    /// Group shape rejected before composition
    #[error("Invalid node group `{group}`: {reason}")]
    InvalidGroup { group: String, reason: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// I/O error while reading a definition
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for composition-adjacent operations
pub type ComposeResult<T> = Result<T, ComposeError>;

impl From<serde_json::Error> for ComposeError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            ComposeError::Deserialization(err.to_string())
        } else {
            ComposeError::Serialization(err.to_string())
        }
    }
}
