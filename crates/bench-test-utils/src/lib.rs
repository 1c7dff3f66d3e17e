//! Testing utilities for the bench characteristics workspace
//!
//! Shared fixtures, tracing setup and presentation assertions.

#![allow(missing_docs)]

use bench_characteristics::prelude::*;
use bench_characteristics::{impl_node_value, CharacteristicRef};
use once_cell::sync::Lazy;

/// Install a test subscriber once; honours `RUST_LOG`
pub fn init_tracing() {
    static INIT: Lazy<()> = Lazy::new(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
    Lazy::force(&INIT);
}

/// Assert the display presentation of a node
pub fn assert_presentation(node: &impl AsConfigNode, expected: &str) {
    pretty_assertions::assert_eq!(
        SetPresenter::Display.present(node.as_config_node()),
        expected
    );
}

// ---- leaf fixture ----

pub static TEST_LEAF_TYPE: NodeType = NodeType::new("TestLeafMode", declare_leaf, create_leaf);

pub static ALPHA: Lazy<Characteristic<i32>> =
    Lazy::new(|| Characteristic::declare("Alpha", &TEST_LEAF_TYPE));
pub static BETA: Lazy<Characteristic<String>> =
    Lazy::new(|| Characteristic::with_fallback("Beta", &TEST_LEAF_TYPE, "beta".to_string()));
pub static GAMMA: Lazy<Characteristic<bool>> =
    Lazy::new(|| Characteristic::declare("Gamma", &TEST_LEAF_TYPE));

fn declare_leaf() -> Vec<CharacteristicRef> {
    vec![ALPHA.erased(), BETA.erased(), GAMMA.erased()]
}

fn create_leaf() -> ConfigNode {
    ConfigNode::with_children(&TEST_LEAF_TYPE)
}

static LEAF_DEFAULT: Lazy<TestLeafMode> = Lazy::new(|| NodeBuilder::of::<TestLeafMode>().freeze_as());

/// Node with three leaves
#[derive(Debug, Clone)]
pub struct TestLeafMode(ConfigNode);

impl TestLeafMode {
    pub fn new() -> Self {
        Self(create_leaf())
    }

    pub fn with_alpha(alpha: i32) -> Self {
        NodeBuilder::of::<Self>().value(&ALPHA, alpha).build_as()
    }
}

impl Default for TestLeafMode {
    fn default() -> Self {
        Self::new()
    }
}

impl AsConfigNode for TestLeafMode {
    fn as_config_node(&self) -> &ConfigNode {
        &self.0
    }
}

impl TypedNode for TestLeafMode {
    fn node_type() -> &'static NodeType {
        &TEST_LEAF_TYPE
    }

    fn from_node_unchecked(node: ConfigNode) -> Self {
        Self(node)
    }

    fn default_preset() -> &'static Self {
        &LEAF_DEFAULT
    }
}

impl_node_value!(TestLeafMode);

// ---- parent fixture ----

pub static TEST_PARENT_TYPE: NodeType = NodeType::new("TestParentMode", declare_parent, create_parent);

pub static NAME: Lazy<Characteristic<String>> =
    Lazy::new(|| Characteristic::declare("Name", &TEST_PARENT_TYPE));
pub static PINNED: Lazy<Characteristic<i32>> =
    Lazy::new(|| Characteristic::builder("Pinned", &TEST_PARENT_TYPE).sticky().build());
pub static SECRET: Lazy<Characteristic<String>> =
    Lazy::new(|| Characteristic::builder("Secret", &TEST_PARENT_TYPE).hidden().build());
pub static LEAF: Lazy<Characteristic<TestLeafMode>> =
    Lazy::new(|| Characteristic::declare("Leaf", &TEST_PARENT_TYPE));

fn declare_parent() -> Vec<CharacteristicRef> {
    vec![NAME.erased(), PINNED.erased(), SECRET.erased(), LEAF.erased()]
}

fn create_parent() -> ConfigNode {
    ConfigNode::with_children(&TEST_PARENT_TYPE)
}

static PARENT_DEFAULT: Lazy<TestParentMode> =
    Lazy::new(|| NodeBuilder::of::<TestParentMode>().freeze_as());

/// Node with leaves of every flavour and one child
#[derive(Debug, Clone)]
pub struct TestParentMode(ConfigNode);

impl TestParentMode {
    pub fn new() -> Self {
        Self(create_parent())
    }

    pub fn leaf(&self) -> TestLeafMode {
        self.child(&LEAF)
    }
}

impl Default for TestParentMode {
    fn default() -> Self {
        Self::new()
    }
}

impl AsConfigNode for TestParentMode {
    fn as_config_node(&self) -> &ConfigNode {
        &self.0
    }
}

impl TypedNode for TestParentMode {
    fn node_type() -> &'static NodeType {
        &TEST_PARENT_TYPE
    }

    fn from_node_unchecked(node: ConfigNode) -> Self {
        Self(node)
    }

    fn default_preset() -> &'static Self {
        &PARENT_DEFAULT
    }
}

impl_node_value!(TestParentMode);
