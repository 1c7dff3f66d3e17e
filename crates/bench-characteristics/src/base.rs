//! Base node type and the `Id` characteristic every node type inherits

use once_cell::sync::Lazy;

use crate::characteristic::{Characteristic, CharacteristicRef};
use crate::node::ConfigNode;
use crate::presenter::SetPresenter;
use crate::registry::NodeType;
use crate::value::Value;

/// Id reported by nodes without an explicit id and without presentable values
pub const DEFAULT_ID: &str = "Default";

/// Node type declaring the inherited base characteristics
pub static BASE_NODE_TYPE: NodeType = NodeType::new("ConfigNode", base_characteristics, create_base);

/// Node id; sticky, so apply never copies it
///
/// Reads resolve to the explicit id unless it is empty or `Default`, then to
/// the display presentation of the node's values, then to `Default`.
pub static ID: Lazy<Characteristic<String>> = Lazy::new(|| {
    Characteristic::builder("Id", &BASE_NODE_TYPE)
        .derived(resolve_id)
        .sticky()
        .build()
});

/// Characteristics inherited into every non-bag node type
pub fn base_characteristics() -> Vec<CharacteristicRef> {
    vec![ID.erased()]
}

fn create_base() -> ConfigNode {
    ConfigNode::with_children(&BASE_NODE_TYPE)
}

fn resolve_id(node: &ConfigNode, raw: Option<Value>) -> Option<Value> {
    if let Some(Value::Text(id)) = &raw {
        if !id.is_empty() && id != DEFAULT_ID {
            return raw;
        }
    }
    let presentation = SetPresenter::Display.present(node);
    if presentation.is_empty() {
        Some(Value::Text(DEFAULT_ID.to_string()))
    } else {
        Some(Value::Text(presentation))
    }
}
