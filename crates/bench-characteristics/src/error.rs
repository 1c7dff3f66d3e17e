//! Error types for characteristic nodes
//!
//! Provides error handling for:
//! - Mutation of frozen nodes
//! - Ownership violations during attach/detach
//! - Type mismatches between values and characteristics
//! - Unresolved characteristics and schema mismatches
//!
//! All of these are deterministic programmer errors; none is retried.

use crate::value::ValueKind;

/// Errors raised by configuration nodes and resolvers
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CharacteristicError {
    /// Mutation attempted on a frozen root or on a node attached to one
    #[error("the node {node} is frozen; create a copy to modify it")]
    Frozen {
        /// Description of the frozen node
        node: String,
    },

    /// Operation is allowed for root nodes only
    #[error("the operation is allowed for root nodes only, but {node} is attached to {owner}")]
    NotRoot {
        /// Description of the attached node
        node: String,
        /// Description of its owner
        owner: String,
    },

    /// A node cannot be attached into its own tree
    #[error("the node {node} cannot be attached to itself")]
    SelfAttach {
        /// Description of the node
        node: String,
    },

    /// Property bags never take part in attach/detach
    #[error("the property bag {node} cannot be attached to or detached from another node")]
    PropertyBagOwnership {
        /// Description of the bag
        node: String,
    },

    /// Value is not assignable to the characteristic
    #[error("a value of kind {actual} is not assignable to {characteristic} ({expected})")]
    TypeMismatch {
        /// Characteristic full name
        characteristic: String,
        /// Declared kind
        expected: ValueKind,
        /// Kind of the rejected value
        actual: ValueKind,
    },

    /// Empty value passed for a child characteristic
    #[error("child characteristic {0} cannot be set to an empty value")]
    NullChild(String),

    /// Operation requires a child characteristic
    #[error("characteristic {0} is not a child characteristic")]
    NotAChild(String),

    /// No resolver could supply a value
    #[error("there is no default resolver for {0}")]
    Unresolved(String),

    /// Two nodes with different schemas were compared
    #[error("schema mismatch: cannot compare {left} with {right}")]
    SchemaMismatch {
        /// Left node type
        left: String,
        /// Right node type
        right: String,
    },

    /// Node is not of the requested type
    #[error("invalid node type: expected {expected}, got {actual}")]
    WrongNodeType {
        /// Expected node type name
        expected: String,
        /// Actual node type name
        actual: String,
    },
}

impl CharacteristicError {
    /// Create frozen-mutation error
    pub fn frozen(node: impl Into<String>) -> Self {
        Self::Frozen { node: node.into() }
    }

    /// Create ownership violation error
    pub fn not_root(node: impl Into<String>, owner: impl Into<String>) -> Self {
        Self::NotRoot {
            node: node.into(),
            owner: owner.into(),
        }
    }

    /// Create type mismatch error
    pub fn type_mismatch(
        characteristic: impl Into<String>,
        expected: ValueKind,
        actual: ValueKind,
    ) -> Self {
        Self::TypeMismatch {
            characteristic: characteristic.into(),
            expected,
            actual,
        }
    }

    /// Check if the error is a frozen-mutation error
    #[inline]
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        matches!(self, Self::Frozen { .. })
    }

    /// Check if the error is an ownership violation
    #[inline]
    #[must_use]
    pub fn is_ownership_violation(&self) -> bool {
        matches!(
            self,
            Self::NotRoot { .. } | Self::SelfAttach { .. } | Self::PropertyBagOwnership { .. }
        )
    }
}

/// Result type alias for characteristic operations
pub type Result<T> = std::result::Result<T, CharacteristicError>;
