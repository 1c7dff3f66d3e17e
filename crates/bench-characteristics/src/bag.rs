//! Flat property bags
//!
//! A bag accepts any characteristic, has no declared schema and enumerates
//! its stored characteristics ordered by name. Bags are the interchange form
//! of a node tree: flatten a tree into a bag, reparse a bag into a tree.
//! Bags never take part in attach/detach.

use once_cell::sync::Lazy;

use crate::characteristic::{Characteristic, CharacteristicRef};
use crate::error::Result;
use crate::node::ConfigNode;
use crate::registry::NodeType;
use crate::typed::{AsConfigNode, TypedNode};
use crate::value::{CharacteristicValue, Value};

/// Node type of every property bag
pub static PROPERTY_BAG_TYPE: NodeType = NodeType::property_bag("PropertyBag", create_bag);

static EMPTY: Lazy<PropertyBag> = Lazy::new(|| {
    let bag = PropertyBag::new();
    bag.0.mark_frozen();
    bag
});

fn create_bag() -> ConfigNode {
    ConfigNode::new(&PROPERTY_BAG_TYPE)
}

/// Schema-less node holding any characteristic
#[derive(Debug, Clone)]
pub struct PropertyBag(ConfigNode);

impl PropertyBag {
    /// Empty bag
    #[must_use]
    pub fn new() -> Self {
        Self(create_bag())
    }

    /// Bag holding every non-sticky value of `sources`, later sources win
    pub fn from_sources(sources: &[&dyn AsConfigNode]) -> Result<Self> {
        let bag = Self::new();
        bag.apply_all(sources)?;
        Ok(bag)
    }

    /// Add a typed value, builder style
    pub fn with<T: CharacteristicValue>(self, c: &Characteristic<T>, value: T) -> Result<Self> {
        self.0.set(c, value)?;
        Ok(self)
    }

    /// Stored characteristics ordered by name
    #[must_use]
    pub fn characteristics(&self) -> Vec<CharacteristicRef> {
        self.0.stored_characteristics()
    }

    /// Stored leaf values ordered by characteristic name
    #[must_use]
    pub fn values(&self) -> Vec<(CharacteristicRef, Value)> {
        self.characteristics()
            .into_iter()
            .filter(|c| !c.is_child())
            .filter_map(|c| self.0.explicit_value(&c).map(|value| (c, value)))
            .collect()
    }

    /// Stored child slots ordered by characteristic name, with their node type
    #[must_use]
    pub fn child_slots(&self) -> Vec<(CharacteristicRef, &'static NodeType)> {
        self.characteristics()
            .into_iter()
            .filter_map(|c| c.child_type().map(|node_type| (c, node_type)))
            .collect()
    }

    /// Number of stored characteristics
    #[must_use]
    pub fn len(&self) -> usize {
        self.characteristics().len()
    }

    /// Whether nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PropertyBag {
    fn default() -> Self {
        Self::new()
    }
}

impl AsConfigNode for PropertyBag {
    fn as_config_node(&self) -> &ConfigNode {
        &self.0
    }
}

impl TypedNode for PropertyBag {
    fn node_type() -> &'static NodeType {
        &PROPERTY_BAG_TYPE
    }

    fn from_node_unchecked(node: ConfigNode) -> Self {
        Self(node)
    }

    fn default_preset() -> &'static Self {
        &EMPTY
    }
}

impl PartialEq for PropertyBag {
    fn eq(&self, other: &Self) -> bool {
        self.values() == other.values() && self.child_slots() == other.child_slots()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::BASE_NODE_TYPE;

    static COLOR: Lazy<Characteristic<String>> =
        Lazy::new(|| Characteristic::declare("Color", &BASE_NODE_TYPE));
    static AMOUNT: Lazy<Characteristic<i32>> =
        Lazy::new(|| Characteristic::declare("Amount", &BASE_NODE_TYPE));

    #[test]
    fn enumerates_sorted_by_name() {
        let bag = PropertyBag::new()
            .with(&COLOR, "red".to_string())
            .unwrap()
            .with(&AMOUNT, 2)
            .unwrap();
        let names: Vec<_> = bag.characteristics().iter().map(CharacteristicRef::name).collect();
        assert_eq!(names, vec!["Amount", "Color"]);
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn equality_by_values() {
        let a = PropertyBag::new().with(&AMOUNT, 1).unwrap();
        let b = PropertyBag::new().with(&AMOUNT, 1).unwrap();
        let c = PropertyBag::new().with(&AMOUNT, 2).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn default_preset_is_frozen_and_empty() {
        let preset = PropertyBag::default_preset();
        assert!(preset.is_frozen());
        assert!(preset.is_empty());
        let copy = preset.unfreeze_copy().unwrap();
        assert!(!copy.is_frozen());
    }

    #[test]
    fn bag_copies_into_bag() {
        let source = PropertyBag::new().with(&COLOR, "blue".to_string()).unwrap();
        let target = PropertyBag::from_sources(&[&source]).unwrap();
        assert_eq!(target, source);
    }
}
