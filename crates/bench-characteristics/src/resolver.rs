//! Pluggable default-value resolvers
//!
//! A resolver supplies values for characteristics a node leaves empty.
//! Explicit values always win: a resolver is only consulted when the node
//! has no value of its own.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::characteristic::{Characteristic, CharacteristicId, CharacteristicRef};
use crate::error::{CharacteristicError, Result};
use crate::node::ConfigNode;
use crate::value::{CharacteristicValue, Value};

/// Supplies values for absent characteristics
pub trait Resolver: Send + Sync + fmt::Debug {
    /// Whether this resolver can supply `c`
    fn can_resolve(&self, c: &CharacteristicRef) -> bool;

    /// Explicit value of `node`, else this resolver's default for `c`
    fn resolve(&self, node: &ConfigNode, c: &CharacteristicRef) -> Result<Value>;

    /// Like [`resolve`](Self::resolve), with `default` when nothing applies
    fn resolve_or(&self, node: &ConfigNode, c: &CharacteristicRef, default: Value) -> Value {
        if node.has(c) {
            return node.value(c).unwrap_or(default);
        }
        if self.can_resolve(c) {
            return self.resolve(node, c).unwrap_or(default);
        }
        default
    }
}

/// Default supplied by a [`TableResolver`] entry
#[derive(Clone)]
pub enum DefaultValue {
    /// Fixed value
    Constant(Value),
    /// Pure function of the node being resolved
    Derived(fn(&ConfigNode) -> Value),
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Self::Derived(_) => f.write_str("Derived"),
        }
    }
}

/// Resolver backed by a table of per-characteristic defaults
#[derive(Debug, Clone, Default)]
pub struct TableResolver {
    name: &'static str,
    entries: HashMap<CharacteristicId, (CharacteristicRef, DefaultValue)>,
}

impl TableResolver {
    /// Empty table
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: HashMap::new(),
        }
    }

    /// Register a constant default
    #[must_use]
    pub fn with<T: CharacteristicValue>(mut self, c: &Characteristic<T>, value: T) -> Self {
        self.entries.insert(
            c.id(),
            (c.erased(), DefaultValue::Constant(value.into_value())),
        );
        self
    }

    /// Register a default derived from the node being resolved
    #[must_use]
    pub fn with_derived(mut self, c: &CharacteristicRef, derive: fn(&ConfigNode) -> Value) -> Self {
        self.entries
            .insert(c.id(), (c.clone(), DefaultValue::Derived(derive)));
        self
    }

    /// Resolver name, used in diagnostics
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of registered defaults
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no default is registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Resolver for TableResolver {
    fn can_resolve(&self, c: &CharacteristicRef) -> bool {
        self.entries.contains_key(&c.id())
    }

    fn resolve(&self, node: &ConfigNode, c: &CharacteristicRef) -> Result<Value> {
        if node.has(c) {
            return node
                .value(c)
                .ok_or_else(|| CharacteristicError::Unresolved(c.full_name()));
        }
        match self.entries.get(&c.id()) {
            Some((_, DefaultValue::Constant(value))) => Ok(value.clone()),
            Some((_, DefaultValue::Derived(derive))) => Ok(derive(node)),
            None => {
                tracing::debug!("Resolver {} has no default for {}", self.name, c.full_name());
                Err(CharacteristicError::Unresolved(c.full_name()))
            }
        }
    }
}

/// Ordered chain of resolvers; the first one claiming a characteristic wins
#[derive(Debug, Clone, Default)]
pub struct CompositeResolver {
    resolvers: Vec<Arc<dyn Resolver>>,
}

impl CompositeResolver {
    /// Chain the given resolvers in order
    #[must_use]
    pub fn new(resolvers: Vec<Arc<dyn Resolver>>) -> Self {
        Self { resolvers }
    }

    /// Append a resolver at the end of the chain
    #[must_use]
    pub fn with(mut self, resolver: impl Resolver + 'static) -> Self {
        self.resolvers.push(Arc::new(resolver));
        self
    }

    /// Number of chained resolvers
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    /// Whether the chain is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

impl Resolver for CompositeResolver {
    fn can_resolve(&self, c: &CharacteristicRef) -> bool {
        self.resolvers.iter().any(|r| r.can_resolve(c))
    }

    fn resolve(&self, node: &ConfigNode, c: &CharacteristicRef) -> Result<Value> {
        if node.has(c) {
            return node
                .value(c)
                .ok_or_else(|| CharacteristicError::Unresolved(c.full_name()));
        }
        match self.resolvers.iter().find(|r| r.can_resolve(c)) {
            Some(resolver) => resolver.resolve(node, c),
            None => {
                tracing::debug!("No resolver in chain claims {}", c.full_name());
                Err(CharacteristicError::Unresolved(c.full_name()))
            }
        }
    }
}
