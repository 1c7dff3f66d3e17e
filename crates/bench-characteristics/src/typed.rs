//! Typed node facade
//!
//! Concrete node types (run mode, environment mode, job, ...) are thin
//! wrappers around a [`ConfigNode`] of their static [`NodeType`]. The
//! [`TypedNode`] trait gives them typed versions of the generic node
//! operations, returning the concrete type where the generic API returns a
//! [`ConfigNode`].

use crate::characteristic::{Characteristic, CharacteristicRef};
use crate::error::{CharacteristicError, Result};
use crate::node::ConfigNode;
use crate::registry::NodeType;
use crate::value::CharacteristicValue;

/// Anything backed by a configuration node
pub trait AsConfigNode {
    /// Underlying node handle
    fn as_config_node(&self) -> &ConfigNode;
}

impl AsConfigNode for ConfigNode {
    fn as_config_node(&self) -> &ConfigNode {
        self
    }
}

/// A concrete, statically described node type
pub trait TypedNode: AsConfigNode + Clone + Send + Sync + Sized + 'static {
    /// Static descriptor of this type
    fn node_type() -> &'static NodeType;

    /// Wrap a node already known to be of [`Self::node_type`]
    fn from_node_unchecked(node: ConfigNode) -> Self;

    /// Frozen default instance
    fn default_preset() -> &'static Self;

    /// Wrap a node, checking its type
    fn try_from_node(node: ConfigNode) -> Result<Self> {
        if node.node_type() == Self::node_type() {
            Ok(Self::from_node_unchecked(node))
        } else {
            Err(CharacteristicError::WrongNodeType {
                expected: Self::node_type().name().to_string(),
                actual: node.node_type().name().to_string(),
            })
        }
    }

    /// Freeze this root and hand it back
    fn freeze(self) -> Result<Self> {
        self.as_config_node().freeze()?;
        Ok(self)
    }

    /// Unfrozen independent copy
    fn unfreeze_copy(&self) -> Result<Self> {
        self.as_config_node()
            .unfreeze_copy()
            .map(Self::from_node_unchecked)
    }

    /// Copy `source`'s non-sticky values into this node
    fn apply<S: AsConfigNode + ?Sized>(&self, source: &S) -> Result<&Self> {
        self.as_config_node().apply(source.as_config_node())?;
        Ok(self)
    }

    /// Apply each source in order
    fn apply_all(&self, sources: &[&dyn AsConfigNode]) -> Result<&Self> {
        let nodes: Vec<&ConfigNode> = sources.iter().map(|s| s.as_config_node()).collect();
        self.as_config_node().apply_all(&nodes)?;
        Ok(self)
    }

    /// Frozen flag of the owning root
    fn is_frozen(&self) -> bool {
        self.as_config_node().is_frozen()
    }

    /// Resolved id
    fn id(&self) -> String {
        self.as_config_node().id()
    }

    /// Whether the store holds a value for `c`
    fn has(&self, c: &CharacteristicRef) -> bool {
        self.as_config_node().has(c)
    }

    /// Typed value for `c`
    fn get<T: CharacteristicValue>(&self, c: &Characteristic<T>) -> Option<T> {
        self.as_config_node().get(c)
    }

    /// Set a typed value
    fn set<T: CharacteristicValue>(&self, c: &Characteristic<T>, value: T) -> Result<()> {
        self.as_config_node().set(c, value)
    }

    /// Typed child under `c`; empty slots are filled with a default instance
    fn child<N: TypedNode>(&self, c: &Characteristic<N>) -> N {
        self.as_config_node()
            .child_or_default(c)
            .map_or_else(|| N::from_node_unchecked(N::node_type().create()), N::from_node_unchecked)
    }
}

/// Implement [`CharacteristicValue`] for a [`TypedNode`] wrapper
///
/// Lets the type be the value type of a child characteristic.
#[macro_export]
macro_rules! impl_node_value {
    ($ty:ty) => {
        impl $crate::value::CharacteristicValue for $ty {
            fn kind() -> $crate::value::ValueKind {
                $crate::value::ValueKind::Node(<$ty as $crate::typed::TypedNode>::node_type())
            }

            fn into_value(self) -> $crate::value::Value {
                $crate::value::Value::Node(
                    $crate::typed::AsConfigNode::as_config_node(&self).clone(),
                )
            }

            fn from_value(value: &$crate::value::Value) -> Option<Self> {
                value.as_node().and_then(|node| {
                    <$ty as $crate::typed::TypedNode>::try_from_node(node.clone()).ok()
                })
            }
        }
    };
}
