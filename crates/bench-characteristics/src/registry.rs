//! Node type descriptors and characteristic enumeration
//!
//! Every configuration node type is described by a static [`NodeType`]. The
//! descriptor knows which characteristics the type declares and caches the
//! two orderings the rest of the crate relies on:
//!
//! - declared: leaves first by name, then children by name
//! - all: depth-first over the declared ordering, each characteristic once
//!
//! Base characteristics (the node `Id`) are inherited by every non-bag type.

use std::collections::HashSet;
use std::fmt;

use once_cell::sync::OnceCell;

use crate::base;
use crate::characteristic::{CharacteristicId, CharacteristicRef};
use crate::node::ConfigNode;

/// Static descriptor of a configuration node type
pub struct NodeType {
    name: &'static str,
    property_bag: bool,
    declare: fn() -> Vec<CharacteristicRef>,
    create: fn() -> ConfigNode,
    declared: OnceCell<Vec<CharacteristicRef>>,
    all: OnceCell<Vec<CharacteristicRef>>,
    closure: OnceCell<HashSet<CharacteristicId>>,
}

impl NodeType {
    /// Describe a node type
    ///
    /// `declare` lists the characteristics the type declares itself;
    /// `create` builds a fresh default instance with its children attached.
    #[must_use]
    pub const fn new(
        name: &'static str,
        declare: fn() -> Vec<CharacteristicRef>,
        create: fn() -> ConfigNode,
    ) -> Self {
        Self {
            name,
            property_bag: false,
            declare,
            create,
            declared: OnceCell::new(),
            all: OnceCell::new(),
            closure: OnceCell::new(),
        }
    }

    /// Describe a property bag type: no declared schema, any characteristic
    #[must_use]
    pub const fn property_bag(name: &'static str, create: fn() -> ConfigNode) -> Self {
        Self {
            name,
            property_bag: true,
            declare: Vec::new,
            create,
            declared: OnceCell::new(),
            all: OnceCell::new(),
            closure: OnceCell::new(),
        }
    }

    /// Type name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether instances accept characteristics of any type
    #[inline]
    #[must_use]
    pub fn is_property_bag(&self) -> bool {
        self.property_bag
    }

    /// Fresh default instance
    #[must_use]
    pub fn create(&self) -> ConfigNode {
        (self.create)()
    }

    /// Characteristics declared by (or inherited into) this type
    ///
    /// Leaves come first ordered by name, then children ordered by name.
    pub fn declared_characteristics(&self) -> &[CharacteristicRef] {
        self.declared.get_or_init(|| {
            let mut seen = HashSet::new();
            let mut declared: Vec<CharacteristicRef> = Vec::new();
            if !self.property_bag {
                declared.extend(base::base_characteristics());
            }
            declared.extend((self.declare)());
            declared.retain(|c| seen.insert(c.id()));
            declared.sort_by(|a, b| {
                a.is_child()
                    .cmp(&b.is_child())
                    .then_with(|| a.name().cmp(b.name()))
            });
            declared
        })
    }

    /// Every characteristic reachable from this type, depth-first
    ///
    /// Leaves of a type precede its children; each child is followed by its
    /// own subtree. Every characteristic appears once.
    pub fn all_characteristics(&self) -> &[CharacteristicRef] {
        self.all.get_or_init(|| {
            let mut visited = HashSet::new();
            let mut all = Vec::new();
            collect(self, &mut all, &mut visited);
            all
        })
    }

    /// Characteristics eligible for presentation
    #[must_use]
    pub fn presentable_characteristics(&self, include_sticky: bool) -> Vec<CharacteristicRef> {
        self.all_characteristics()
            .iter()
            .filter(|c| c.is_presentable(include_sticky))
            .cloned()
            .collect()
    }

    /// Whether `characteristic` is reachable from this type
    pub fn contains(&self, characteristic: &CharacteristicRef) -> bool {
        self.closure
            .get_or_init(|| self.all_characteristics().iter().map(CharacteristicRef::id).collect())
            .contains(&characteristic.id())
    }
}

fn collect(
    node_type: &NodeType,
    out: &mut Vec<CharacteristicRef>,
    visited: &mut HashSet<CharacteristicId>,
) {
    let declared = node_type.declared_characteristics();
    for c in declared.iter().filter(|c| !c.is_child()) {
        if visited.insert(c.id()) {
            out.push(c.clone());
        }
    }
    for c in declared.iter().filter(|c| c.is_child()) {
        if visited.insert(c.id()) {
            out.push(c.clone());
            if let Some(child_type) = c.child_type() {
                collect(child_type, out, visited);
            }
        }
    }
}

impl PartialEq for NodeType {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for NodeType {}

impl fmt::Debug for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeType")
            .field("name", &self.name)
            .field("property_bag", &self.property_bag)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::ID;
    use crate::characteristic::Characteristic;
    use once_cell::sync::Lazy;

    static INNER: NodeType = NodeType::new("Inner", declare_inner, create_inner);
    static OUTER: NodeType = NodeType::new("Outer", declare_outer, create_outer);

    static DEPTH: Lazy<Characteristic<i32>> = Lazy::new(|| Characteristic::declare("Depth", &INNER));
    static ALPHA: Lazy<Characteristic<i32>> = Lazy::new(|| Characteristic::declare("Alpha", &INNER));
    static ZETA: Lazy<Characteristic<String>> = Lazy::new(|| Characteristic::declare("Zeta", &OUTER));
    static BETA: Lazy<Characteristic<bool>> = Lazy::new(|| Characteristic::declare("Beta", &OUTER));
    static COUNT: Lazy<Characteristic<i64>> = Lazy::new(|| Characteristic::declare("Count", &OUTER));

    fn declare_inner() -> Vec<CharacteristicRef> {
        vec![DEPTH.erased(), ALPHA.erased()]
    }

    fn declare_outer() -> Vec<CharacteristicRef> {
        vec![ZETA.erased(), BETA.erased(), COUNT.erased()]
    }

    fn create_inner() -> ConfigNode {
        ConfigNode::with_children(&INNER)
    }

    fn create_outer() -> ConfigNode {
        ConfigNode::with_children(&OUTER)
    }

    fn names(list: &[CharacteristicRef]) -> Vec<&'static str> {
        list.iter().map(CharacteristicRef::name).collect()
    }

    #[test]
    fn declared_sorted_with_inherited_id() {
        assert_eq!(names(INNER.declared_characteristics()), vec!["Alpha", "Depth", "Id"]);
    }

    #[test]
    fn all_visits_each_once() {
        let all = OUTER.all_characteristics();
        assert_eq!(names(all), vec!["Beta", "Count", "Id", "Zeta"]);
        let ids: HashSet<_> = all.iter().map(CharacteristicRef::id).collect();
        assert_eq!(ids.len(), all.len());
        assert!(OUTER.contains(&ID.erased()));
        assert!(!OUTER.contains(&DEPTH.erased()));
    }

    #[test]
    fn presentable_excludes_sticky_id() {
        let presentable = OUTER.presentable_characteristics(false);
        assert!(presentable.iter().all(|c| c.name() != "Id"));
        let with_sticky = OUTER.presentable_characteristics(true);
        assert!(with_sticky.iter().any(|c| c.name() == "Id"));
    }

    #[test]
    fn identity_equality() {
        assert_eq!(&INNER, &INNER);
        assert_ne!(&INNER, &OUTER);
    }
}
