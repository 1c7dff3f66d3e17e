//! Bench Characteristics
//!
//! Typed, layered configuration nodes for describing benchmark runs.
//!
//! # Model
//!
//! - [`Characteristic`]: a declared, typed, named property of a node type
//! - [`NodeType`]: static descriptor enumerating a type's characteristics
//! - [`ConfigNode`]: a node over a store shared by its whole tree
//! - [`PropertyBag`]: a schema-less node holding any characteristic
//! - [`Resolver`]: supplies defaults for characteristics left empty
//!
//! # Tenets
//!
//! 1. Explicit values always win over resolved defaults
//! 2. Frozen roots are immutable; copies are cheap and independent
//! 3. A node belongs to at most one tree at a time
//! 4. Apply never copies sticky characteristics
//!
//! # Example
//!
//! ```ignore
//! use bench_characteristics::prelude::*;
//!
//! let copy = preset.unfreeze_copy()?;
//! copy.set(&LAUNCH_COUNT, 3)?;
//! assert_eq!(copy.id(), "LaunchCount=3");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod bag;
pub mod base;
pub mod builder;
pub mod characteristic;
pub mod error;
pub mod node;
pub mod presenter;
pub mod registry;
pub mod resolver;
pub mod typed;
pub mod value;

pub use bag::{PropertyBag, PROPERTY_BAG_TYPE};
pub use base::{BASE_NODE_TYPE, DEFAULT_ID, ID};
pub use builder::NodeBuilder;
pub use characteristic::{
    Characteristic, CharacteristicBuilder, CharacteristicId, CharacteristicRef, DeriveFn,
    Resolution,
};
pub use error::{CharacteristicError, Result};
pub use node::ConfigNode;
pub use presenter::{SetPresenter, ValuePresenter, DEFAULT_PRESENTATION};
pub use registry::NodeType;
pub use resolver::{CompositeResolver, DefaultValue, Resolver, TableResolver};
pub use typed::{AsConfigNode, TypedNode};
pub use value::{CharacteristicValue, Symbol, Value, ValueKind};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for common imports
pub mod prelude {
    pub use crate::bag::PropertyBag;
    pub use crate::builder::NodeBuilder;
    pub use crate::characteristic::{Characteristic, CharacteristicRef};
    pub use crate::error::{CharacteristicError, Result};
    pub use crate::node::ConfigNode;
    pub use crate::presenter::{SetPresenter, ValuePresenter};
    pub use crate::registry::NodeType;
    pub use crate::resolver::{CompositeResolver, Resolver, TableResolver};
    pub use crate::typed::{AsConfigNode, TypedNode};
    pub use crate::value::{CharacteristicValue, Symbol, Value, ValueKind};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
