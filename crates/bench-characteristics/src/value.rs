//! Values carried by characteristics
//!
//! A [`Value`] is what a node stores for a characteristic. Leaf characteristics
//! hold plain data; child characteristics hold a [`ConfigNode`]. Every
//! characteristic declares a [`ValueKind`]; a value is assignable when it has
//! that kind and converts into the characteristic's Rust type.

use std::fmt;
use std::time::Duration;

use crate::node::ConfigNode;
use crate::registry::NodeType;

/// A named member of a closed enumeration (platform, jit, run strategy, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
    kind: &'static str,
    name: &'static str,
}

impl Symbol {
    /// Create a symbol of the given enumeration
    #[must_use]
    pub const fn new(kind: &'static str, name: &'static str) -> Self {
        Self { kind, name }
    }

    /// Name of the enumeration
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.kind
    }

    /// Name of the member
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Declared kind of a characteristic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Boolean flag
    Bool,
    /// Signed integer
    Int,
    /// Floating point number
    Float,
    /// Free text
    Text,
    /// Time span
    Duration,
    /// Member of the named enumeration
    Symbol(&'static str),
    /// Ordered list of values
    List,
    /// Nested node of the given type
    Node(&'static NodeType),
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::Text => f.write_str("text"),
            Self::Duration => f.write_str("duration"),
            Self::Symbol(kind) => f.write_str(kind),
            Self::List => f.write_str("list"),
            Self::Node(node_type) => f.write_str(node_type.name()),
        }
    }
}

/// A characteristic value
#[derive(Debug, Clone)]
pub enum Value {
    /// Boolean flag
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Free text
    Text(String),
    /// Time span
    Duration(Duration),
    /// Enumeration member
    Symbol(Symbol),
    /// Ordered list
    List(Vec<Value>),
    /// Nested node
    Node(ConfigNode),
}

impl Value {
    /// Kind of this value
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Text(_) => ValueKind::Text,
            Self::Duration(_) => ValueKind::Duration,
            Self::Symbol(symbol) => ValueKind::Symbol(symbol.kind()),
            Self::List(_) => ValueKind::List,
            Self::Node(node) => ValueKind::Node(node.node_type()),
        }
    }

    /// Nested node, if this is a node value
    #[inline]
    #[must_use]
    pub fn as_node(&self) -> Option<&ConfigNode> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Text content, if this is a text value
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Duration(a), Self::Duration(b)) => a == b,
            (Self::Symbol(a), Self::Symbol(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Node(a), Self::Node(b)) => a.same_node(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
            Self::Duration(duration) => write!(f, "{}", format_duration(*duration)),
            Self::Symbol(symbol) => write!(f, "{symbol}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Node(node) => f.write_str(&node.id()),
        }
    }
}

/// Compact time span rendering: whole units collapse to `500ms`, `2s`, `150us`
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        "0s".to_string()
    } else if nanos % 1_000_000_000 == 0 {
        format!("{}s", nanos / 1_000_000_000)
    } else if nanos % 1_000_000 == 0 {
        format!("{}ms", nanos / 1_000_000)
    } else if nanos % 1_000 == 0 {
        format!("{}us", nanos / 1_000)
    } else {
        format!("{nanos}ns")
    }
}

/// Conversion between Rust types and [`Value`]
///
/// Implemented for the primitive kinds here; typed nodes implement it through
/// [`impl_node_value!`](crate::impl_node_value) and symbol enums in downstream
/// crates implement it by hand.
pub trait CharacteristicValue: Sized {
    /// Kind every value of this type has
    fn kind() -> ValueKind;

    /// Wrap into a [`Value`]
    fn into_value(self) -> Value;

    /// Unwrap from a [`Value`], `None` on kind mismatch
    fn from_value(value: &Value) -> Option<Self>;
}

impl CharacteristicValue for bool {
    fn kind() -> ValueKind {
        ValueKind::Bool
    }

    fn into_value(self) -> Value {
        Value::Bool(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl CharacteristicValue for i64 {
    fn kind() -> ValueKind {
        ValueKind::Int
    }

    fn into_value(self) -> Value {
        Value::Int(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl CharacteristicValue for i32 {
    fn kind() -> ValueKind {
        ValueKind::Int
    }

    fn into_value(self) -> Value {
        Value::Int(i64::from(self))
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => i32::try_from(*i).ok(),
            _ => None,
        }
    }
}

impl CharacteristicValue for f64 {
    fn kind() -> ValueKind {
        ValueKind::Float
    }

    fn into_value(self) -> Value {
        Value::Float(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl CharacteristicValue for String {
    fn kind() -> ValueKind {
        ValueKind::Text
    }

    fn into_value(self) -> Value {
        Value::Text(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_text().map(str::to_string)
    }
}

impl CharacteristicValue for Duration {
    fn kind() -> ValueKind {
        ValueKind::Duration
    }

    fn into_value(self) -> Value {
        Value::Duration(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Duration(d) => Some(*d),
            _ => None,
        }
    }
}

impl<T: CharacteristicValue> CharacteristicValue for Vec<T> {
    fn kind() -> ValueKind {
        ValueKind::List
    }

    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(T::into_value).collect())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::List(items) => items.iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Duration> for Value {
    fn from(value: Duration) -> Self {
        Self::Duration(value)
    }
}

impl From<Symbol> for Value {
    fn from(value: Symbol) -> Self {
        Self::Symbol(value)
    }
}

impl From<ConfigNode> for Value {
    fn from(value: ConfigNode) -> Self {
        Self::Node(value)
    }
}
