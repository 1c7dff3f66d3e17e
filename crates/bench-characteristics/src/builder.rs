//! Infallible construction of fresh nodes
//!
//! A node under construction is an unfrozen, unshared root, so none of the
//! mutation checks can fail. [`NodeBuilder`] exploits that for presets and
//! derived copies, which are built inside `Lazy` statics and other places
//! where no error can be reported.

use crate::base::ID;
use crate::characteristic::{Characteristic, CharacteristicRef};
use crate::node::ConfigNode;
use crate::registry::NodeType;
use crate::typed::{AsConfigNode, TypedNode};
use crate::value::{CharacteristicValue, Value};

/// Builder for fresh root nodes
#[must_use]
#[derive(Debug)]
pub struct NodeBuilder {
    node: ConfigNode,
}

impl NodeBuilder {
    /// Start from a default instance of `node_type`
    pub fn new(node_type: &'static NodeType) -> Self {
        Self {
            node: node_type.create(),
        }
    }

    /// Start from a default instance of `N`
    pub fn of<N: TypedNode>() -> Self {
        Self::new(N::node_type())
    }

    /// Explicit id
    pub fn id(self, id: impl Into<String>) -> Self {
        self.node.put_leaf(&ID, Some(Value::Text(id.into())));
        self
    }

    /// Typed leaf value
    ///
    /// Child characteristics are ignored here; use [`merge`](Self::merge)
    /// with a source node instead.
    pub fn value<T: CharacteristicValue>(self, c: &Characteristic<T>, value: T) -> Self {
        if c.is_child() {
            tracing::warn!("Ignoring child characteristic {} in node builder", c.full_name());
            return self;
        }
        self.node.put_leaf(c, Some(value.into_value()));
        self
    }

    /// Untyped leaf value; values of the wrong kind are ignored
    pub fn raw_value(self, c: &CharacteristicRef, value: Value) -> Self {
        if c.is_child() || !c.accepts(&value) {
            tracing::warn!("Ignoring incompatible value for {} in node builder", c.full_name());
            return self;
        }
        self.node.put_leaf(c, Some(value));
        self
    }

    /// Apply every non-sticky value of `source`
    pub fn merge<S: AsConfigNode + ?Sized>(self, source: &S) -> Self {
        self.node.apply_core(source.as_config_node());
        self
    }

    /// Finish as an unfrozen root
    #[must_use]
    pub fn build(self) -> ConfigNode {
        self.node
    }

    /// Finish as a frozen root
    #[must_use]
    pub fn freeze(self) -> ConfigNode {
        self.node.mark_frozen();
        self.node
    }

    /// Finish as an unfrozen typed root
    #[must_use]
    pub fn build_as<N: TypedNode>(self) -> N {
        N::from_node_unchecked(self.node)
    }

    /// Finish as a frozen typed root
    #[must_use]
    pub fn freeze_as<N: TypedNode>(self) -> N {
        N::from_node_unchecked(self.freeze())
    }
}
