//! Declaration macros shared by the mode modules

/// Closed enumeration stored as a [`Symbol`](bench_characteristics::Symbol)
macro_rules! symbol_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $( $(#[$vmeta:meta])* $variant:ident ),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every member, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Stored form
            #[must_use]
            pub const fn symbol(self) -> bench_characteristics::Symbol {
                match self {
                    $( $name::$variant => bench_characteristics::Symbol::new(
                        stringify!($name),
                        stringify!($variant),
                    ) ),+
                }
            }

            /// Member named by `symbol`, if it belongs to this enumeration
            #[must_use]
            pub fn from_symbol(symbol: &bench_characteristics::Symbol) -> Option<Self> {
                if symbol.kind() != stringify!($name) {
                    return None;
                }
                Self::ALL
                    .iter()
                    .copied()
                    .find(|member| member.symbol().name() == symbol.name())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.symbol().name())
            }
        }

        impl bench_characteristics::CharacteristicValue for $name {
            fn kind() -> bench_characteristics::ValueKind {
                bench_characteristics::ValueKind::Symbol(stringify!($name))
            }

            fn into_value(self) -> bench_characteristics::Value {
                bench_characteristics::Value::Symbol(self.symbol())
            }

            fn from_value(value: &bench_characteristics::Value) -> Option<Self> {
                match value {
                    bench_characteristics::Value::Symbol(symbol) => Self::from_symbol(symbol),
                    _ => None,
                }
            }
        }
    };
}

/// Typed wrapper around a node of a static node type
///
/// Generates the wrapper struct, its `NodeType` static, the frozen default
/// preset and the `TypedNode` plumbing.
macro_rules! config_node {
    (
        $(#[$meta:meta])*
        $name:ident, $node_type:ident, $type_name:literal, $declare:path
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name(bench_characteristics::ConfigNode);

        #[doc = concat!("Node type of [`", stringify!($name), "`]")]
        pub static $node_type: bench_characteristics::NodeType =
            bench_characteristics::NodeType::new($type_name, $declare, create_node);

        fn create_node() -> bench_characteristics::ConfigNode {
            bench_characteristics::ConfigNode::with_children(&$node_type)
        }

        static DEFAULT_PRESET: once_cell::sync::Lazy<$name> = once_cell::sync::Lazy::new(|| {
            bench_characteristics::NodeBuilder::of::<$name>().freeze_as()
        });

        impl $name {
            /// Fresh instance with default children
            #[must_use]
            pub fn new() -> Self {
                Self(create_node())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl bench_characteristics::AsConfigNode for $name {
            fn as_config_node(&self) -> &bench_characteristics::ConfigNode {
                &self.0
            }
        }

        impl bench_characteristics::TypedNode for $name {
            fn node_type() -> &'static bench_characteristics::NodeType {
                &$node_type
            }

            fn from_node_unchecked(node: bench_characteristics::ConfigNode) -> Self {
                Self(node)
            }

            fn default_preset() -> &'static Self {
                &DEFAULT_PRESET
            }
        }

        bench_characteristics::impl_node_value!($name);
    };
}

/// Typed getter/setter pairs for leaf characteristics
macro_rules! accessors {
    (
        $ty:ident {
            $( $getter:ident, $setter:ident => $characteristic:ident : $value:ty; )+
        }
    ) => {
        impl $ty {
            $(
                #[doc = concat!("Value of `", stringify!($characteristic), "`")]
                #[must_use]
                pub fn $getter(&self) -> Option<$value> {
                    bench_characteristics::TypedNode::get(self, &$characteristic)
                }

                #[doc = concat!("Set `", stringify!($characteristic), "`")]
                pub fn $setter(&self, value: $value) -> bench_characteristics::Result<()> {
                    bench_characteristics::TypedNode::set(self, &$characteristic, value)
                }
            )+
        }
    };
}
