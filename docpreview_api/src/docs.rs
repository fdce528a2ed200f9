//! Documentation manifest shapes as emitted by the compiler's docs JSON output.

use serde::{Deserialize, Serialize};

/// Ordered sequence of modules describing one build's public API.
pub type DocsSnapshot = Vec<DocumentedModule>;

/// Public surface of a single compiled module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentedModule {
    /// Dotted module name (e.g. `Json.Decode`).
    pub name: String,
    /// Module-level doc comment.
    #[serde(default)]
    pub comment: String,
    /// Custom (sum) types.
    #[serde(default)]
    pub unions: Vec<Union>,
    /// Type aliases.
    #[serde(default)]
    pub aliases: Vec<Alias>,
    /// Functions and constants.
    #[serde(default)]
    pub values: Vec<Value>,
    /// Infix operators.
    #[serde(default)]
    pub binops: Vec<Binop>,
}

impl DocumentedModule {
    /// Construct an empty module with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: String::new(),
            unions: Vec::new(),
            aliases: Vec::new(),
            values: Vec::new(),
            binops: Vec::new(),
        }
    }
}

/// A custom type with its constructors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Union {
    /// Type name.
    pub name: String,
    /// Doc comment attached to the declaration.
    #[serde(default)]
    pub comment: String,
    /// Ordered type parameter names.
    #[serde(default)]
    pub args: Vec<String>,
    /// Constructors as `(name, argument types)` pairs, encoded as 2-element arrays.
    #[serde(default)]
    pub cases: Vec<(String, Vec<String>)>,
}

/// A type alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    /// Alias name.
    pub name: String,
    /// Doc comment attached to the declaration.
    #[serde(default)]
    pub comment: String,
    /// Ordered type parameter names.
    #[serde(default)]
    pub args: Vec<String>,
    /// Rendered right-hand side.
    #[serde(rename = "type")]
    pub tipe: String,
}

/// A documented function or constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Value {
    /// Value name.
    pub name: String,
    /// Doc comment attached to the declaration.
    #[serde(default)]
    pub comment: String,
    /// Rendered type signature.
    #[serde(rename = "type")]
    pub tipe: String,
}

/// A documented infix operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binop {
    /// Operator symbol.
    pub name: String,
    /// Doc comment attached to the declaration.
    #[serde(default)]
    pub comment: String,
    /// Rendered type signature.
    #[serde(rename = "type")]
    pub tipe: String,
    /// Operator associativity.
    #[serde(default)]
    pub associativity: Associativity,
    /// Operator precedence.
    #[serde(default)]
    pub precedence: u8,
}

/// Associativity of an infix operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Associativity {
    /// Groups to the left.
    Left,
    /// Does not associate.
    #[default]
    Non,
    /// Groups to the right.
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCS_JSON: &str = r#"[
        {
            "name": "Basics.Extra",
            "comment": " Helpers.\n\n@docs Pair, Tree, swap, (|>>)\n",
            "unions": [
                {
                    "name": "Tree",
                    "comment": " A tree. ",
                    "args": ["a"],
                    "cases": [["Leaf", []], ["Node", ["Basics.Extra.Tree a", "a", "Basics.Extra.Tree a"]]]
                }
            ],
            "aliases": [
                { "name": "Pair", "comment": "", "args": ["a", "b"], "type": "( a, b )" }
            ],
            "values": [
                { "name": "swap", "comment": " Swap. ", "type": "( a, b ) -> ( b, a )" }
            ],
            "binops": [
                {
                    "name": "|>>",
                    "comment": " Pipe twice. ",
                    "type": "a -> (a -> b) -> b",
                    "associativity": "left",
                    "precedence": 0
                }
            ]
        }
    ]"#;

    #[test]
    fn decodes_compiler_docs_json() {
        let snapshot: DocsSnapshot = serde_json::from_str(DOCS_JSON).expect("decode docs");
        assert_eq!(snapshot.len(), 1);
        let module = &snapshot[0];
        assert_eq!(module.name, "Basics.Extra");

        let tree = &module.unions[0];
        assert_eq!(tree.args, vec!["a".to_string()]);
        assert_eq!(tree.cases[0], ("Leaf".to_string(), Vec::new()));
        assert_eq!(tree.cases[1].1.len(), 3);

        assert_eq!(module.aliases[0].tipe, "( a, b )");
        assert_eq!(module.values[0].tipe, "( a, b ) -> ( b, a )");
        assert_eq!(module.binops[0].associativity, Associativity::Left);
    }

    #[test]
    fn union_cases_encode_as_pairs() {
        let union = Union {
            name: "Msg".into(),
            comment: String::new(),
            args: vec![],
            cases: vec![("Click".into(), vec!["Int".into()])],
        };
        let json = serde_json::to_value(&union).expect("encode union");
        assert_eq!(json["cases"], serde_json::json!([["Click", ["Int"]]]));
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let module: DocumentedModule =
            serde_json::from_str(r#"{ "name": "Empty", "comment": "" }"#).expect("decode");
        assert_eq!(module, DocumentedModule::new("Empty"));
    }
}
