//! Characteristic declarations
//!
//! A characteristic is a named, typed, declared property of a node type.
//! Characteristics are declared once, usually in `once_cell::sync::Lazy`
//! statics, and compared by identity: two declarations with the same name on
//! the same node type are still different characteristics.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::node::ConfigNode;
use crate::registry::NodeType;
use crate::value::{CharacteristicValue, Value, ValueKind};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a declared characteristic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CharacteristicId(u64);

impl CharacteristicId {
    fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Derivation hook: receives the node and the raw stored value
pub type DeriveFn = fn(&ConfigNode, Option<Value>) -> Option<Value>;

/// Whether a value converts into the declared Rust type
type CheckFn = fn(&Value) -> bool;

fn converts<T: CharacteristicValue>(value: &Value) -> bool {
    T::from_value(value).is_some()
}

/// How an absent or raw value becomes the value a reader sees
#[derive(Debug, Clone, Default)]
pub enum Resolution {
    /// The stored value, nothing when absent
    #[default]
    Plain,
    /// The stored value, or the given constant when absent
    Fallback(Value),
    /// Always computed from the node and the raw stored value
    Derived(DeriveFn),
}

#[derive(Debug)]
struct Definition {
    id: CharacteristicId,
    name: &'static str,
    declaring: &'static NodeType,
    kind: ValueKind,
    check: CheckFn,
    resolution: Resolution,
    sticky: bool,
    hidden: bool,
}

/// Untyped handle to a declared characteristic
///
/// Cheap to clone. Equality and hashing use the declaration identity only.
#[derive(Clone)]
pub struct CharacteristicRef(Arc<Definition>);

impl CharacteristicRef {
    /// Declaration identity
    #[inline]
    #[must_use]
    pub fn id(&self) -> CharacteristicId {
        self.0.id
    }

    /// Short name, e.g. `LaunchCount`
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.0.name
    }

    /// Declaring node type
    #[inline]
    #[must_use]
    pub fn declaring_type(&self) -> &'static NodeType {
        self.0.declaring
    }

    /// Qualified name, e.g. `RunMode.LaunchCount`
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.0.declaring.name(), self.0.name)
    }

    /// Declared value kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.0.kind
    }

    /// Whether values of this characteristic are nested nodes
    #[inline]
    #[must_use]
    pub fn is_child(&self) -> bool {
        matches!(self.0.kind, ValueKind::Node(_))
    }

    /// Node type of the nested node, for child characteristics
    #[must_use]
    pub fn child_type(&self) -> Option<&'static NodeType> {
        match self.0.kind {
            ValueKind::Node(node_type) => Some(node_type),
            _ => None,
        }
    }

    /// Sticky characteristics are never copied by apply
    #[inline]
    #[must_use]
    pub fn is_sticky(&self) -> bool {
        self.0.sticky
    }

    /// Hidden characteristics are never presented
    #[inline]
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.0.hidden
    }

    /// Resolution strategy
    #[inline]
    #[must_use]
    pub fn resolution(&self) -> &Resolution {
        &self.0.resolution
    }

    /// Static fallback value, if any
    #[must_use]
    pub fn fallback(&self) -> Option<&Value> {
        match &self.0.resolution {
            Resolution::Fallback(value) => Some(value),
            _ => None,
        }
    }

    /// Presentable: a visible leaf, and not sticky unless `include_sticky`
    #[must_use]
    pub fn is_presentable(&self, include_sticky: bool) -> bool {
        !self.is_child() && !self.is_hidden() && (include_sticky || !self.is_sticky())
    }

    /// Whether `value` may be stored under this characteristic
    ///
    /// The kind must match and the value must convert into the declared type:
    /// list elements are checked one by one and integers must fit the width.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        value.kind() == self.0.kind && (self.0.check)(value)
    }

    /// Apply the resolution strategy to a raw stored value
    pub(crate) fn resolve_raw(&self, node: &ConfigNode, raw: Option<Value>) -> Option<Value> {
        match &self.0.resolution {
            Resolution::Plain => raw,
            Resolution::Fallback(fallback) => raw.or_else(|| Some(fallback.clone())),
            Resolution::Derived(derive) => derive(node, raw),
        }
    }
}

impl PartialEq for CharacteristicRef {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for CharacteristicRef {}

impl std::hash::Hash for CharacteristicRef {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for CharacteristicRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Characteristic({}#{})", self.full_name(), self.0.id.0)
    }
}

impl fmt::Display for CharacteristicRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.name)
    }
}

/// Typed handle to a declared characteristic
pub struct Characteristic<T> {
    inner: CharacteristicRef,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Characteristic<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Characteristic<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl<T> Deref for Characteristic<T> {
    type Target = CharacteristicRef;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T> AsRef<CharacteristicRef> for Characteristic<T> {
    fn as_ref(&self) -> &CharacteristicRef {
        &self.inner
    }
}

impl<T: CharacteristicValue> Characteristic<T> {
    /// Start a declaration
    #[must_use]
    pub fn builder(name: &'static str, declaring: &'static NodeType) -> CharacteristicBuilder<T> {
        CharacteristicBuilder {
            name,
            declaring,
            resolution: Resolution::Plain,
            sticky: false,
            hidden: false,
            _marker: PhantomData,
        }
    }

    /// Declare a plain characteristic without fallback
    #[must_use]
    pub fn declare(name: &'static str, declaring: &'static NodeType) -> Self {
        Self::builder(name, declaring).build()
    }

    /// Declare a characteristic with a static fallback value
    #[must_use]
    pub fn with_fallback(name: &'static str, declaring: &'static NodeType, fallback: T) -> Self {
        Self::builder(name, declaring).fallback(fallback).build()
    }

    /// Untyped handle
    #[must_use]
    pub fn erased(&self) -> CharacteristicRef {
        self.inner.clone()
    }
}

/// Builder for [`Characteristic`] declarations
#[must_use]
pub struct CharacteristicBuilder<T> {
    name: &'static str,
    declaring: &'static NodeType,
    resolution: Resolution,
    sticky: bool,
    hidden: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T: CharacteristicValue> CharacteristicBuilder<T> {
    /// Static fallback for absent values
    pub fn fallback(mut self, value: T) -> Self {
        self.resolution = Resolution::Fallback(value.into_value());
        self
    }

    /// Derivation hook, invoked on every read
    pub fn derived(mut self, derive: DeriveFn) -> Self {
        self.resolution = Resolution::Derived(derive);
        self
    }

    /// Never copied by apply
    pub fn sticky(mut self) -> Self {
        self.sticky = true;
        self
    }

    /// Never presented
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Finish the declaration, minting a fresh identity
    #[must_use]
    pub fn build(self) -> Characteristic<T> {
        let definition = Definition {
            id: CharacteristicId::next(),
            name: self.name,
            declaring: self.declaring,
            kind: T::kind(),
            check: converts::<T>,
            resolution: self.resolution,
            sticky: self.sticky,
            hidden: self.hidden,
        };
        tracing::trace!(
            "Declared characteristic {}.{}",
            self.declaring.name(),
            self.name
        );
        Characteristic {
            inner: CharacteristicRef(Arc::new(definition)),
            _marker: PhantomData,
        }
    }
}
