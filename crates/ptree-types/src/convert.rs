//! Conversion between [`Node`] and `serde_json::Value`.
//!
//! JSON is the interchange format for updates coming from files or other
//! processes. Arrays must be homogeneous and one-dimensional:
//!
//! | JSON                        | Value          |
//! |-----------------------------|----------------|
//! | integer                     | `Int`          |
//! | other number                | `Double`       |
//! | boolean                     | `Int(0 \| 1)`  |
//! | array of booleans           | `IntArray`     |
//! | string                      | `String`       |
//! | object                      | `Node`         |
//! | array of integers           | `IntArray`     |
//! | array of numbers            | `DoubleArray`  |
//! | array of strings            | `StringArray`  |
//! | array of objects            | `NodeArray`    |
//! | empty array                 | `DoubleArray`  |

use serde_json::{Map, Number, Value as Json};

use crate::error::{TypeError, TypeResult};
use crate::node::{Node, NodeArray};
use crate::value::Value;

impl Node {
    /// Build a node from a JSON object.
    pub fn from_json(json: &Json) -> TypeResult<Self> {
        match json {
            Json::Object(map) => node_from_map(map),
            other => Err(TypeError::NotAnObject(json_kind(other).to_string())),
        }
    }

    /// Render the node as a JSON object.
    ///
    /// Bookkeeping is emitted as trailing `array_index` / `in_use` keys so
    /// dumps show the full state of the tree.
    pub fn to_json(&self) -> Json {
        let mut map = Map::new();
        for (key, value) in self.iter() {
            map.insert(key.to_string(), value.to_json());
        }
        if let Some(index) = self.array_index() {
            map.insert("array_index".into(), Json::from(index));
        }
        if let Some(in_use) = self.in_use() {
            map.insert("in_use".into(), Json::from(i64::from(in_use)));
        }
        Json::Object(map)
    }
}

impl Value {
    /// Convert a JSON value stored under `key`.
    pub fn from_json(key: &str, json: &Json) -> TypeResult<Self> {
        match json {
            Json::Null => Err(TypeError::NullValue {
                key: key.to_string(),
            }),
            Json::Bool(b) => Ok(Value::from(*b)),
            Json::Number(n) => Ok(number_to_value(n)),
            Json::String(s) => Ok(Value::String(s.clone())),
            Json::Object(map) => Ok(Value::Node(node_from_map(map)?)),
            Json::Array(items) => array_to_value(key, items),
        }
    }

    pub fn to_json(&self) -> Json {
        match self {
            Value::Int(i) => Json::from(*i),
            Value::Double(d) => double_to_json(*d),
            Value::String(s) => Json::String(s.clone()),
            Value::IntArray(v) => Json::Array(v.iter().map(|i| Json::from(*i)).collect()),
            Value::DoubleArray(v) => Json::Array(v.iter().map(|d| double_to_json(*d)).collect()),
            Value::StringArray(v) => Json::Array(v.iter().cloned().map(Json::String).collect()),
            Value::Node(n) => n.to_json(),
            Value::NodeArray(a) => Json::Array(a.iter().map(Node::to_json).collect()),
        }
    }
}

fn node_from_map(map: &Map<String, Json>) -> TypeResult<Node> {
    let mut node = Node::new();
    for (key, json) in map {
        node.insert(key.clone(), Value::from_json(key, json)?);
    }
    Ok(node)
}

fn number_to_value(n: &Number) -> Value {
    match n.as_i64() {
        Some(i) => Value::Int(i),
        None => Value::Double(n.as_f64().unwrap_or(f64::NAN)),
    }
}

fn double_to_json(d: f64) -> Json {
    Number::from_f64(d).map(Json::Number).unwrap_or(Json::Null)
}

fn array_to_value(key: &str, items: &[Json]) -> TypeResult<Value> {
    let Some(first) = items.first() else {
        return Ok(Value::DoubleArray(Vec::new()));
    };
    if items.iter().any(Json::is_array) {
        return Err(TypeError::NestedArray {
            key: key.to_string(),
        });
    }
    let mixed = || TypeError::MixedArray {
        key: key.to_string(),
    };

    match first {
        Json::Number(_) => {
            if items.iter().all(|j| j.as_i64().is_some()) {
                let ints = items.iter().filter_map(Json::as_i64).collect();
                return Ok(Value::IntArray(ints));
            }
            items
                .iter()
                .map(|j| j.as_f64().ok_or_else(mixed))
                .collect::<TypeResult<Vec<_>>>()
                .map(Value::DoubleArray)
        }
        Json::String(_) => items
            .iter()
            .map(|j| j.as_str().map(str::to_string).ok_or_else(mixed))
            .collect::<TypeResult<Vec<_>>>()
            .map(Value::StringArray),
        Json::Object(_) => items
            .iter()
            .map(|j| match j {
                Json::Object(map) => node_from_map(map),
                _ => Err(mixed()),
            })
            .collect::<TypeResult<Vec<_>>>()
            .map(|nodes| Value::NodeArray(NodeArray::from(nodes))),
        Json::Bool(_) => items
            .iter()
            .map(|j| j.as_bool().map(i64::from).ok_or_else(mixed))
            .collect::<TypeResult<Vec<_>>>()
            .map(Value::IntArray),
        Json::Null => Err(TypeError::NullValue {
            key: key.to_string(),
        }),
        Json::Array(_) => Err(TypeError::NestedArray {
            key: key.to_string(),
        }),
    }
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}
