//! Configuration nodes over a shared flat store
//!
//! A tree of nodes shares one store keyed by characteristic identity:
//!
//! - A root owns its store; every attached node aliases its root's store
//! - Child slots hold only weak views; dead views are rebuilt on demand
//! - Freezing is a root-only flag; attached nodes read it through the root
//! - Attach moves a node's private values into the root's store
//! - Detach moves the node's non-sticky closure back into a private store
//!
//! Locks are never held across calls into other node operations.

use std::fmt;
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::base::{DEFAULT_ID, ID};
use crate::characteristic::{Characteristic, CharacteristicId, CharacteristicRef};
use crate::error::{CharacteristicError, Result};
use crate::registry::NodeType;
use crate::resolver::Resolver;
use crate::value::{CharacteristicValue, Value};

type SharedStore = Arc<RwLock<IndexMap<CharacteristicId, Entry>>>;

fn new_store() -> SharedStore {
    Arc::new(RwLock::new(IndexMap::new()))
}

#[derive(Debug, Clone)]
struct Entry {
    characteristic: CharacteristicRef,
    slot: Slot,
}

impl Entry {
    fn leaf(characteristic: CharacteristicRef, value: Value) -> Self {
        Self {
            characteristic,
            slot: Slot::Leaf(value),
        }
    }

    fn child(characteristic: CharacteristicRef, node_type: &'static NodeType) -> Self {
        Self {
            characteristic,
            slot: Slot::Child {
                node_type,
                view: Weak::new(),
            },
        }
    }

    fn is_child(&self) -> bool {
        matches!(self.slot, Slot::Child { .. })
    }
}

#[derive(Debug, Clone)]
enum Slot {
    Leaf(Value),
    Child {
        node_type: &'static NodeType,
        view: Weak<NodeCell>,
    },
}

struct NodeCell {
    node_type: &'static NodeType,
    state: RwLock<NodeState>,
}

struct NodeState {
    owner: Option<ConfigNode>,
    store: SharedStore,
    frozen: bool,
}

/// Handle to a configuration node
///
/// Cloning the handle does not copy the node; use
/// [`unfreeze_copy`](Self::unfreeze_copy) for an independent copy.
#[derive(Clone)]
pub struct ConfigNode(Arc<NodeCell>);

impl ConfigNode {
    /// Empty root node of the given type
    #[must_use]
    pub fn new(node_type: &'static NodeType) -> Self {
        Self::from_parts(node_type, None, new_store())
    }

    /// Root node with a fresh default instance in every child slot
    #[must_use]
    pub fn with_children(node_type: &'static NodeType) -> Self {
        let node = Self::new(node_type);
        let store = node.shared_store();
        let mut map = store.write();
        for c in node_type.all_characteristics() {
            if let Some(child_type) = c.child_type() {
                map.insert(c.id(), Entry::child(c.clone(), child_type));
            }
        }
        drop(map);
        node
    }

    fn from_parts(node_type: &'static NodeType, owner: Option<ConfigNode>, store: SharedStore) -> Self {
        Self(Arc::new(NodeCell {
            node_type,
            state: RwLock::new(NodeState {
                owner,
                store,
                frozen: false,
            }),
        }))
    }

    /// Node type descriptor
    #[inline]
    #[must_use]
    pub fn node_type(&self) -> &'static NodeType {
        self.0.node_type
    }

    /// Whether this node is a property bag
    #[inline]
    #[must_use]
    pub fn is_property_bag(&self) -> bool {
        self.0.node_type.is_property_bag()
    }

    /// Whether both handles refer to the same node
    #[inline]
    #[must_use]
    pub fn same_node(&self, other: &ConfigNode) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Root this node is attached to, `None` for roots
    #[must_use]
    pub fn owner(&self) -> Option<ConfigNode> {
        self.0.state.read().owner.clone()
    }

    /// Whether this node owns its store
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.state.read().owner.is_none()
    }

    /// Frozen flag of the root this node belongs to
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        let (owner, frozen) = {
            let state = self.0.state.read();
            (state.owner.clone(), state.frozen)
        };
        match owner {
            Some(owner) => owner.0.state.read().frozen,
            None => frozen,
        }
    }

    fn root(&self) -> ConfigNode {
        self.owner().unwrap_or_else(|| self.clone())
    }

    fn shared_store(&self) -> SharedStore {
        self.0.state.read().store.clone()
    }

    fn describe(&self) -> String {
        format!("{}({})", self.node_type().name(), self.id())
    }

    /// Resolved node id
    #[must_use]
    pub fn id(&self) -> String {
        self.value(&ID)
            .and_then(|value| value.as_text().map(str::to_string))
            .unwrap_or_else(|| DEFAULT_ID.to_string())
    }

    // ---- reads ----

    /// Whether the store holds a value for `c`
    #[must_use]
    pub fn has(&self, c: &CharacteristicRef) -> bool {
        self.shared_store().read().contains_key(&c.id())
    }

    /// Stored value for `c` without resolution
    #[must_use]
    pub fn explicit_value(&self, c: &CharacteristicRef) -> Option<Value> {
        if c.is_child() {
            return self.child(c).map(Value::Node);
        }
        let store = self.shared_store();
        let map = store.read();
        match map.get(&c.id()) {
            Some(Entry {
                slot: Slot::Leaf(value),
                ..
            }) => Some(value.clone()),
            _ => None,
        }
    }

    /// Value for `c` after its resolution strategy
    #[must_use]
    pub fn value(&self, c: &CharacteristicRef) -> Option<Value> {
        c.resolve_raw(self, self.explicit_value(c))
    }

    /// Typed value for `c`
    #[must_use]
    pub fn get<T: CharacteristicValue>(&self, c: &Characteristic<T>) -> Option<T> {
        self.value(c).as_ref().and_then(T::from_value)
    }

    /// Child node stored under `c`
    ///
    /// Returns `None` when `c` is not a child characteristic or the slot is
    /// empty. A dropped view is rebuilt over the same store.
    #[must_use]
    pub fn child(&self, c: &CharacteristicRef) -> Option<ConfigNode> {
        let store = self.shared_store();
        {
            let map = store.read();
            match map.get(&c.id()) {
                Some(Entry {
                    slot: Slot::Child { view, .. },
                    ..
                }) => {
                    if let Some(cell) = view.upgrade() {
                        return Some(ConfigNode(cell));
                    }
                }
                _ => return None,
            }
        }
        let root = self.root();
        let mut map = store.write();
        let Some(Entry {
            slot: Slot::Child { node_type, view },
            ..
        }) = map.get_mut(&c.id())
        else {
            return None;
        };
        if let Some(cell) = view.upgrade() {
            return Some(ConfigNode(cell));
        }
        let node = ConfigNode::from_parts(*node_type, Some(root), store.clone());
        *view = Arc::downgrade(&node.0);
        Some(node)
    }

    /// Child node under `c`, inserting a default one when the slot is empty
    ///
    /// Frozen nodes are left untouched and get a detached default instead.
    #[must_use]
    pub fn child_or_default(&self, c: &CharacteristicRef) -> Option<ConfigNode> {
        let child_type = c.child_type()?;
        if let Some(child) = self.child(c) {
            return Some(child);
        }
        if self.is_frozen() {
            return Some(child_type.create());
        }
        self.shared_store()
            .write()
            .entry(c.id())
            .or_insert_with(|| Entry::child(c.clone(), child_type));
        self.child(c)
    }

    /// Characteristics stored in this node's store, ordered by name
    #[must_use]
    pub fn stored_characteristics(&self) -> Vec<CharacteristicRef> {
        let store = self.shared_store();
        let mut list: Vec<CharacteristicRef> = store
            .read()
            .values()
            .map(|entry| entry.characteristic.clone())
            .collect();
        list.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(&b.id())));
        list
    }

    /// Characteristics with a value, in enumeration order
    ///
    /// Property bags report their stored characteristics ordered by name.
    #[must_use]
    pub fn characteristics_with_values(&self) -> Vec<CharacteristicRef> {
        if self.is_property_bag() {
            return self.stored_characteristics();
        }
        let store = self.shared_store();
        let map = store.read();
        self.node_type()
            .all_characteristics()
            .iter()
            .filter(|c| map.contains_key(&c.id()))
            .cloned()
            .collect()
    }

    /// Whether any presentable, non-sticky characteristic has a value
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.characteristics_with_values()
            .iter()
            .any(|c| c.is_presentable(false))
    }

    /// Value supplied by `resolver`, explicit values first
    pub fn resolve_value(&self, c: &CharacteristicRef, resolver: &dyn Resolver) -> Result<Value> {
        resolver.resolve(self, c)
    }

    /// Value supplied by `resolver`, or `default` when nothing applies
    #[must_use]
    pub fn resolve_value_or(
        &self,
        c: &CharacteristicRef,
        resolver: &dyn Resolver,
        default: Value,
    ) -> Value {
        resolver.resolve_or(self, c, default)
    }

    /// Typed value supplied by `resolver`
    pub fn resolve<T: CharacteristicValue>(
        &self,
        c: &Characteristic<T>,
        resolver: &dyn Resolver,
    ) -> Result<T> {
        let value = resolver.resolve(self, c)?;
        T::from_value(&value)
            .ok_or_else(|| CharacteristicError::type_mismatch(c.full_name(), c.kind(), value.kind()))
    }

    /// Explicit value, or `default` run through the characteristic's own resolution
    #[must_use]
    pub fn resolve_or<T: CharacteristicValue + Clone>(&self, c: &Characteristic<T>, default: T) -> T {
        let raw = if self.has(c) {
            self.explicit_value(c)
        } else {
            Some(default.clone().into_value())
        };
        c.resolve_raw(self, raw)
            .as_ref()
            .and_then(T::from_value)
            .unwrap_or(default)
    }

    // ---- writes ----

    /// Set a typed value
    pub fn set<T: CharacteristicValue>(&self, c: &Characteristic<T>, value: T) -> Result<()> {
        self.set_value(c, Some(value.into_value()))
    }

    /// Remove the value for a leaf characteristic
    pub fn remove(&self, c: &CharacteristicRef) -> Result<()> {
        self.set_value(c, None)
    }

    /// Set or clear a value
    ///
    /// `None` removes a leaf value and is rejected for child characteristics.
    /// Setting a child attaches the given root node to this node's root and
    /// detaches the previous occupant.
    pub fn set_value(&self, c: &CharacteristicRef, value: Option<Value>) -> Result<()> {
        self.ensure_mutable()?;
        if let Some(value) = &value {
            if !c.accepts(value) {
                return Err(CharacteristicError::type_mismatch(
                    c.full_name(),
                    c.kind(),
                    value.kind(),
                ));
            }
        }
        if !c.is_child() {
            self.put_leaf(c, value);
            return Ok(());
        }
        let Some(Value::Node(child)) = value else {
            return Err(CharacteristicError::NullChild(c.full_name()));
        };
        let previous = self.child(c);
        if previous.as_ref().is_some_and(|p| p.same_node(&child)) {
            return Ok(());
        }
        let root = self.root();
        child.ensure_attachable(&root)?;
        if let Some(previous) = previous {
            previous.detach_core(c);
        }
        child.attach_core(&root, c);
        Ok(())
    }

    /// Detach the child under `c` into a standalone root
    ///
    /// The detached node takes every non-sticky value of its closure with
    /// it. Returns `None` when the slot is empty.
    pub fn detach(&self, c: &CharacteristicRef) -> Result<Option<ConfigNode>> {
        if !c.is_child() {
            return Err(CharacteristicError::NotAChild(c.full_name()));
        }
        self.ensure_mutable()?;
        let Some(child) = self.child(c) else {
            return Ok(None);
        };
        child.detach_core(c);
        Ok(Some(child))
    }

    /// Freeze this root; idempotent
    pub fn freeze(&self) -> Result<()> {
        self.ensure_root()?;
        let newly_frozen = {
            let mut state = self.0.state.write();
            !std::mem::replace(&mut state.frozen, true)
        };
        if newly_frozen {
            tracing::debug!("Froze {}", self.node_type().name());
        }
        Ok(())
    }

    /// Unfrozen independent copy of this root
    pub fn unfreeze_copy(&self) -> Result<ConfigNode> {
        self.ensure_root()?;
        let copy = self.node_type().create();
        copy.apply_core(self);
        tracing::debug!("Created unfrozen copy of {}", self.node_type().name());
        Ok(copy)
    }

    /// Copy `source`'s non-sticky values into this node
    ///
    /// Leaves overwrite, child slots are only added where missing. Across
    /// different node types only characteristics this type knows are copied.
    pub fn apply(&self, source: &ConfigNode) -> Result<()> {
        self.ensure_mutable()?;
        self.apply_core(source);
        Ok(())
    }

    /// Apply each source in order; later sources win
    pub fn apply_all(&self, sources: &[&ConfigNode]) -> Result<()> {
        self.ensure_mutable()?;
        for source in sources {
            self.apply_core(source);
        }
        Ok(())
    }

    // ---- internals ----

    fn ensure_mutable(&self) -> Result<()> {
        if self.is_frozen() {
            return Err(CharacteristicError::frozen(self.describe()));
        }
        Ok(())
    }

    fn ensure_root(&self) -> Result<()> {
        match self.owner() {
            Some(owner) => Err(CharacteristicError::not_root(
                self.describe(),
                owner.describe(),
            )),
            None => Ok(()),
        }
    }

    fn ensure_attachable(&self, root: &ConfigNode) -> Result<()> {
        if self.is_property_bag() {
            return Err(CharacteristicError::PropertyBagOwnership {
                node: self.describe(),
            });
        }
        if self.same_node(root) {
            return Err(CharacteristicError::SelfAttach {
                node: self.describe(),
            });
        }
        self.ensure_root()?;
        self.ensure_mutable()
    }

    pub(crate) fn put_leaf(&self, c: &CharacteristicRef, value: Option<Value>) {
        let store = self.shared_store();
        let mut map = store.write();
        match value {
            Some(value) => {
                map.insert(c.id(), Entry::leaf(c.clone(), value));
            }
            None => {
                map.shift_remove(&c.id());
            }
        }
    }

    pub(crate) fn mark_frozen(&self) {
        self.0.state.write().frozen = true;
    }

    fn rehome(&self, owner: Option<ConfigNode>, store: SharedStore) {
        let mut state = self.0.state.write();
        state.owner = owner;
        state.store = store;
        state.frozen = false;
    }

    fn attach_core(&self, root: &ConfigNode, c: &CharacteristicRef) {
        let private = self.shared_store();
        let entries: Vec<Entry> = private.read().values().cloned().collect();
        let root_store = root.shared_store();
        self.rehome(Some(root.clone()), root_store.clone());
        root_store.write().insert(
            c.id(),
            Entry {
                characteristic: c.clone(),
                slot: Slot::Child {
                    node_type: self.node_type(),
                    view: Arc::downgrade(&self.0),
                },
            },
        );

        let (children, leaves): (Vec<Entry>, Vec<Entry>) =
            entries.into_iter().partition(Entry::is_child);
        for entry in children {
            if let Some(occupant) = root.child(&entry.characteristic) {
                occupant.detach_core(&entry.characteristic);
            }
            if let Slot::Child { view, .. } = &entry.slot {
                if let Some(cell) = view.upgrade() {
                    ConfigNode(cell).rehome(Some(root.clone()), root_store.clone());
                }
            }
            root_store.write().insert(entry.characteristic.id(), entry);
        }
        let mut map = root_store.write();
        for entry in leaves {
            map.insert(entry.characteristic.id(), entry);
        }
        drop(map);
        tracing::debug!(
            "Attached {} as {} of {}",
            self.node_type().name(),
            c.full_name(),
            root.node_type().name()
        );
    }

    fn detach_core(&self, c: &CharacteristicRef) {
        let shared = self.shared_store();
        let private = new_store();
        self.rehome(None, private.clone());
        let moved: Vec<Entry> = {
            let mut map = shared.write();
            map.shift_remove(&c.id());
            self.node_type()
                .all_characteristics()
                .iter()
                .filter(|x| !x.is_sticky())
                .filter_map(|x| map.shift_remove(&x.id()))
                .collect()
        };
        for entry in &moved {
            if let Slot::Child { view, .. } = &entry.slot {
                if let Some(cell) = view.upgrade() {
                    ConfigNode(cell).rehome(Some(self.clone()), private.clone());
                }
            }
        }
        let mut map = private.write();
        for entry in moved {
            map.insert(entry.characteristic.id(), entry);
        }
        drop(map);
        tracing::debug!("Detached {} from {}", self.node_type().name(), c.full_name());
    }

    fn characteristics_to_apply(&self, source: &ConfigNode) -> Vec<CharacteristicRef> {
        let mut list = if source.is_property_bag() {
            source.stored_characteristics()
        } else {
            source.node_type().all_characteristics().to_vec()
        };
        list.retain(|c| !c.is_sticky());
        if self.node_type() != source.node_type() && !self.is_property_bag() {
            list.retain(|c| self.node_type().contains(c));
        }
        list
    }

    pub(crate) fn apply_core(&self, source: &ConfigNode) {
        if self.same_node(source) {
            return;
        }
        let characteristics = self.characteristics_to_apply(source);
        let slots: Vec<(CharacteristicRef, Slot)> = {
            let store = source.shared_store();
            let map = store.read();
            characteristics
                .into_iter()
                .filter_map(|c| map.get(&c.id()).map(|entry| (c, entry.slot.clone())))
                .collect()
        };
        let target = self.shared_store();
        let mut map = target.write();
        for (c, slot) in slots {
            match slot {
                Slot::Leaf(value) => {
                    map.insert(c.id(), Entry::leaf(c, value));
                }
                Slot::Child { node_type, .. } => {
                    map.entry(c.id())
                        .or_insert_with(|| Entry::child(c, node_type));
                }
            }
        }
        drop(map);
        tracing::trace!(
            "Applied {} onto {}",
            source.node_type().name(),
            self.node_type().name()
        );
    }
}

impl fmt::Debug for ConfigNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigNode")
            .field("type", &self.node_type().name())
            .field("root", &self.is_root())
            .field("frozen", &self.is_frozen())
            .finish()
    }
}

impl fmt::Display for ConfigNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;

    static PART: NodeType = NodeType::new("Part", declare_part, create_part);
    static WHOLE: NodeType = NodeType::new("Whole", declare_whole, create_whole);

    static SIZE: Lazy<Characteristic<i32>> = Lazy::new(|| Characteristic::with_fallback("Size", &PART, 4));
    static LABEL: Lazy<Characteristic<String>> = Lazy::new(|| Characteristic::declare("Label", &WHOLE));
    static PART_SLOT: Lazy<Characteristic<Part>> = Lazy::new(|| Characteristic::declare("Part", &WHOLE));

    fn declare_part() -> Vec<CharacteristicRef> {
        vec![SIZE.erased()]
    }

    fn declare_whole() -> Vec<CharacteristicRef> {
        vec![LABEL.erased(), PART_SLOT.erased()]
    }

    fn create_part() -> ConfigNode {
        ConfigNode::with_children(&PART)
    }

    fn create_whole() -> ConfigNode {
        ConfigNode::with_children(&WHOLE)
    }

    #[derive(Clone)]
    struct Part(ConfigNode);

    impl CharacteristicValue for Part {
        fn kind() -> crate::value::ValueKind {
            crate::value::ValueKind::Node(&PART)
        }

        fn into_value(self) -> Value {
            Value::Node(self.0)
        }

        fn from_value(value: &Value) -> Option<Self> {
            value.as_node().cloned().map(Part)
        }
    }

    #[test]
    fn children_share_root_store() {
        let whole = create_whole();
        let part = whole.child(&PART_SLOT).unwrap();
        assert!(!part.is_root());
        part.set(&SIZE, 9).unwrap();
        assert!(whole.has(&SIZE));
        assert_eq!(whole.get(&SIZE), Some(9));
    }

    #[test]
    fn fallback_applies_to_absent_values() {
        let part = create_part();
        assert!(!part.has(&SIZE));
        assert_eq!(part.get(&SIZE), Some(4));
    }

    #[test]
    fn frozen_rejects_writes_through_children() {
        let whole = create_whole();
        let part = whole.child(&PART_SLOT).unwrap();
        whole.freeze().unwrap();
        whole.freeze().unwrap();
        assert!(part.is_frozen());
        assert!(part.set(&SIZE, 1).unwrap_err().is_frozen());
        assert!(part.freeze().is_err());
    }

    #[test]
    fn dropped_views_are_rebuilt() {
        let whole = create_whole();
        whole.child(&PART_SLOT).unwrap().set(&SIZE, 3).unwrap();
        let again = whole.child(&PART_SLOT).unwrap();
        assert_eq!(again.get(&SIZE), Some(3));
        assert!(again.owner().unwrap().same_node(&whole));
    }

    #[test]
    fn detach_takes_closure_values() {
        let whole = create_whole();
        whole.set(&LABEL, "w".to_string()).unwrap();
        whole.child(&PART_SLOT).unwrap().set(&SIZE, 2).unwrap();
        let part = whole.detach(&PART_SLOT).unwrap().unwrap();
        assert!(part.is_root());
        assert_eq!(part.get(&SIZE), Some(2));
        assert!(!whole.has(&SIZE));
        assert!(!whole.has(&PART_SLOT));
        assert!(whole.has(&LABEL));
    }

    #[test]
    fn attach_moves_private_values() {
        let whole = create_whole();
        let part = create_part();
        part.set(&SIZE, 7).unwrap();
        whole.set(&PART_SLOT, Part(part.clone())).unwrap();
        assert!(!part.is_root());
        assert_eq!(whole.get(&SIZE), Some(7));
        assert!(whole.child(&PART_SLOT).unwrap().same_node(&part));
    }

    #[test]
    fn attached_nodes_cannot_be_attached_again() {
        let first = create_whole();
        let second = create_whole();
        let part = first.child(&PART_SLOT).unwrap();
        let err = second.set(&PART_SLOT, Part(part)).unwrap_err();
        assert!(err.is_ownership_violation());
    }

    #[test]
    fn null_child_is_rejected() {
        let whole = create_whole();
        assert_eq!(
            whole.set_value(&PART_SLOT, None),
            Err(CharacteristicError::NullChild("Whole.Part".to_string()))
        );
    }

    #[test]
    fn apply_copies_leaves_and_skips_sticky() {
        let source = create_whole();
        source.set(&ID, "Source".to_string()).unwrap();
        source.set(&LABEL, "l".to_string()).unwrap();
        source.child(&PART_SLOT).unwrap().set(&SIZE, 5).unwrap();
        let target = create_whole();
        target.apply(&source).unwrap();
        assert_eq!(target.get(&LABEL), Some("l".to_string()));
        assert_eq!(target.get(&SIZE), Some(5));
        assert!(!target.has(&ID));
    }

    #[test]
    fn id_falls_back_to_presentation() {
        let whole = create_whole();
        assert_eq!(whole.id(), "Default");
        whole.set(&LABEL, "x".to_string()).unwrap();
        assert_eq!(whole.id(), "Label=x");
        whole.set(&ID, "Named".to_string()).unwrap();
        assert_eq!(whole.id(), "Named");
    }
}
