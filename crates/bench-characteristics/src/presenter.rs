//! Rendering of values and whole nodes
//!
//! Value presenters render one characteristic value; set presenters render
//! every presentable characteristic with a value, in enumeration order.
//!
//! | Set presenter | Item            | Separator |
//! |---------------|-----------------|-----------|
//! | Default       | `Name=value`    | `&`       |
//! | Display       | `Name=value`    | `, `      |
//! | Folder        | `Name-value`    | `_`       |
//! | SourceCode    | `Type.Name = v` | `; `      |

use std::time::Duration;

use crate::characteristic::CharacteristicRef;
use crate::node::ConfigNode;
use crate::value::Value;

/// Rendering of values that are absent
pub const DEFAULT_PRESENTATION: &str = "Default";

const INVALID_FOLDER_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*', ' '];

/// Renders a single characteristic value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValuePresenter {
    /// Plain rendering; `Default` when absent
    Default,
    /// Like `Default` with characters unsafe in paths replaced by `_`
    Folder,
    /// Compact rendering for summary tables
    Summary,
    /// Rust source literal
    SourceCode,
}

impl ValuePresenter {
    /// Render the value of `c` in `node`
    #[must_use]
    pub fn present(self, node: &ConfigNode, c: &CharacteristicRef) -> String {
        if !node.has(c) {
            return DEFAULT_PRESENTATION.to_string();
        }
        match node.value(c) {
            Some(value) => self.present_value(&value),
            None => DEFAULT_PRESENTATION.to_string(),
        }
    }

    /// Render a standalone value
    #[must_use]
    pub fn present_value(self, value: &Value) -> String {
        match self {
            Self::Default => value.to_string(),
            Self::Folder => value
                .to_string()
                .chars()
                .map(|ch| {
                    if ch.is_control() || INVALID_FOLDER_CHARS.contains(&ch) {
                        '_'
                    } else {
                        ch
                    }
                })
                .collect(),
            Self::Summary => match value {
                Value::List(items) => items
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(","),
                other => other.to_string(),
            },
            Self::SourceCode => source_literal(value),
        }
    }
}

fn source_literal(value: &Value) -> String {
    match value {
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => format!("{f:?}"),
        Value::Text(text) => format!("{text:?}"),
        Value::Duration(duration) => duration_literal(*duration),
        Value::Symbol(symbol) => format!("{}::{}", symbol.kind(), symbol.name()),
        Value::List(items) => format!(
            "vec![{}]",
            items.iter().map(source_literal).collect::<Vec<_>>().join(", ")
        ),
        Value::Node(node) => format!("{}::default()", node.node_type().name()),
    }
}

fn duration_literal(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos % 1_000_000_000 == 0 {
        format!("Duration::from_secs({})", duration.as_secs())
    } else if nanos % 1_000_000 == 0 {
        format!("Duration::from_millis({})", duration.as_millis())
    } else if nanos % 1_000 == 0 {
        format!("Duration::from_micros({})", duration.as_micros())
    } else {
        format!("Duration::from_nanos({nanos})")
    }
}

/// Renders every presentable characteristic of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetPresenter {
    /// `Name=value` joined by `&`
    Default,
    /// `Name=value` joined by `, `
    Display,
    /// `Name-value` joined by `_`, safe for paths
    Folder,
    /// `Type.Name = literal` joined by `; `, sticky characteristics included
    SourceCode,
}

impl SetPresenter {
    /// Render `node`; empty when nothing presentable has a value
    #[must_use]
    pub fn present(self, node: &ConfigNode) -> String {
        let include_sticky = matches!(self, Self::SourceCode);
        let items: Vec<String> = node
            .characteristics_with_values()
            .iter()
            .filter(|c| c.is_presentable(include_sticky))
            .map(|c| self.item(node, c))
            .collect();
        items.join(self.separator())
    }

    fn item(self, node: &ConfigNode, c: &CharacteristicRef) -> String {
        match self {
            Self::Default => format!("{}={}", c.name(), ValuePresenter::Default.present(node, c)),
            Self::Display => format!("{}={}", c.name(), ValuePresenter::Summary.present(node, c)),
            Self::Folder => format!("{}-{}", c.name(), ValuePresenter::Folder.present(node, c)),
            Self::SourceCode => format!(
                "{}.{} = {}",
                c.declaring_type().name(),
                c.name(),
                ValuePresenter::SourceCode.present(node, c)
            ),
        }
    }

    fn separator(self) -> &'static str {
        match self {
            Self::Default => "&",
            Self::Display => ", ",
            Self::Folder => "_",
            Self::SourceCode => "; ",
        }
    }
}
