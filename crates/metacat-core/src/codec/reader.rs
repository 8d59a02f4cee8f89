//! Lenient access to document nodes.
//!
//! Optional leaves go through [`Node::optional`], which falls back to the
//! type's default. Structurally required leaves go through
//! [`Node::required`], which fails with [`Error::MissingRequiredField`].

use super::blob::decode_blob;
use crate::error::Error;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// A scalar that can be read from a document leaf.
pub(crate) trait Leaf: Default + Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

impl Leaf for String {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl Leaf for bool {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.as_str() {
                "1" | "true" | "True" => Some(true),
                "0" | "false" | "False" | "" => Some(false),
                _ => None,
            },
            Value::Number(n) => n.as_i64().map(|n| n != 0),
            _ => None,
        }
    }
}

impl Leaf for i32 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl Leaf for u32 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// An object node of the document, with its location for error messages.
pub(crate) struct Node<'a> {
    map: &'a Map<String, Value>,
    path: String,
}

impl<'a> Node<'a> {
    pub fn new(value: &'a Value, path: impl Into<String>) -> Result<Self, Error> {
        let path = path.into();
        match value {
            Value::Object(map) => Ok(Self { map, path }),
            _ => Err(Error::Deserialization(format!(
                "{path}: expected an object"
            ))),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a String> {
        self.map.keys()
    }

    /// Read a leaf that must be present.
    pub fn required<T: Leaf>(&self, key: &'static str) -> Result<T, Error> {
        self.map
            .get(key)
            .and_then(T::from_value)
            .ok_or_else(|| Error::MissingRequiredField {
                path: self.path.clone(),
                field: key,
            })
    }

    /// Read a leaf, defaulting when absent or unreadable.
    pub fn optional<T: Leaf>(&self, key: &str) -> T {
        self.map
            .get(key)
            .and_then(T::from_value)
            .unwrap_or_default()
    }

    /// Read a blob leaf.
    pub fn blob(&self, key: &str) -> String {
        self.map.get(key).map(decode_blob).unwrap_or_default()
    }

    /// Nested object, if present.
    pub fn child(&self, key: &str) -> Result<Option<Node<'a>>, Error> {
        match self.map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Node::new(value, format!("{}.{}", self.path, key)).map(Some),
        }
    }

    /// Array of objects; absent means empty.
    pub fn children(&self, key: &str) -> Result<Vec<Node<'a>>, Error> {
        match self.map.get(key) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| Node::new(item, format!("{}.{}[{}]", self.path, key, i)))
                .collect(),
            Some(_) => Err(Error::Deserialization(format!(
                "{}.{}: expected an array",
                self.path, key
            ))),
        }
    }

    /// Array of strings; absent means empty. Non-string items are skipped.
    pub fn strings(&self, key: &str) -> Vec<String> {
        self.map
            .get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Object of string values, in document order; absent means empty.
    pub fn string_map(&self, key: &str) -> IndexMap<String, String> {
        self.map
            .get(key)
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .filter_map(|(k, v)| String::from_value(v).map(|v| (k.clone(), v)))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_optional_defaults() {
        let value = json!({ "Name": "Item", "AutoNum": "1", "Size": 12 });
        let node = Node::new(&value, "Directories[0]").unwrap();

        assert!(node.optional::<bool>("AutoNum"));
        assert!(!node.optional::<bool>("VersionsHistory"));
        assert_eq!(node.optional::<u32>("Size"), 12);
        assert_eq!(node.optional::<String>("Desc"), "");
        assert!(node.children("Fields").unwrap().is_empty());
    }

    #[test]
    fn test_required_missing() {
        let value = json!({ "Desc": "no name" });
        let node = Node::new(&value, "Documents[3]").unwrap();

        let err = node.required::<String>("Name").unwrap_err();
        match err {
            Error::MissingRequiredField { path, field } => {
                assert_eq!(path, "Documents[3]");
                assert_eq!(field, "Name");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_children_paths() {
        let value = json!({ "Fields": [{ "Name": "A" }, { "Desc": "x" }] });
        let node = Node::new(&value, "Enums[0]").unwrap();
        let children = node.children("Fields").unwrap();

        assert_eq!(children[1].path(), "Enums[0].Fields[1]");
        assert!(children[1].required::<String>("Name").is_err());
    }

    #[test]
    fn test_wrong_shape_is_error() {
        let value = json!({ "Fields": "oops" });
        let node = Node::new(&value, "root").unwrap();
        assert!(matches!(
            node.children("Fields"),
            Err(Error::Deserialization(_))
        ));
        assert!(Node::new(&json!([1, 2]), "root").is_err());
    }

    #[test]
    fn test_string_collections() {
        let value = json!({
            "Allow": ["Stock", 1, "Sales"],
            "Query": { "02": "b", "01": "a" }
        });
        let node = Node::new(&value, "root").unwrap();

        assert_eq!(node.strings("Allow"), vec!["Stock", "Sales"]);
        let keys: Vec<_> = node.string_map("Query").keys().cloned().collect();
        assert_eq!(keys, vec!["02", "01"]);
    }
}
