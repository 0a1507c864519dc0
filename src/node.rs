use std::collections::BTreeMap;

use serde::Deserialize;

/// Untyped nested-sequence form of a calc program.
///
/// Programs are supplied pre-built as nested sequences, not textual syntax:
/// `["calc", ["set", "a", 7], ["print", "a"]]`. A later revision of the
/// format used tagged maps instead (`{"type": "set", "var": "a", "expr": 7}`);
/// both load into this one value type and go through [`crate::decode`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Int(i64),
    Word(String),
    Seq(Vec<Node>),
    Map(BTreeMap<String, Node>),
}

impl Node {
    pub fn as_word(&self) -> Option<&str> {
        match self {
            Node::Word(word) => Some(word),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Node]> {
        match self {
            Node::Seq(items) => Some(items),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_sequence_form() {
        let node: Node = serde_json::from_str(r#"["calc", ["set", "a", 7]]"#).expect("valid JSON");
        assert_eq!(
            node,
            Node::Seq(vec![
                Node::Word("calc".to_string()),
                Node::Seq(vec![
                    Node::Word("set".to_string()),
                    Node::Word("a".to_string()),
                    Node::Int(7),
                ]),
            ])
        );
    }

    #[test]
    fn deserializes_map_form() {
        let node: Node =
            serde_json::from_str(r#"{"type": "read", "var": "n"}"#).expect("valid JSON");
        let Node::Map(fields) = node else {
            panic!("expected map node");
        };
        assert_eq!(fields.get("type").and_then(Node::as_word), Some("read"));
        assert_eq!(fields.get("var").and_then(Node::as_word), Some("n"));
    }

    #[test]
    fn deserializes_negative_integers() {
        let node: Node = serde_json::from_str("-3").expect("valid JSON");
        assert_eq!(node, Node::Int(-3));
    }
}
