//! Attribute values stored in a [`Node`].

use std::fmt;

use crate::node::{Node, NodeArray};

/// A typed attribute value.
///
/// The variant set is closed: consumers match exhaustively instead of
/// inspecting runtime type tags.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Double(f64),
    String(String),
    IntArray(Vec<i64>),
    DoubleArray(Vec<f64>),
    StringArray(Vec<String>),
    /// A single child node.
    Node(Node),
    /// An ordered sequence of child nodes.
    NodeArray(NodeArray),
}

/// The variant of a [`Value`] without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Double,
    String,
    IntArray,
    DoubleArray,
    StringArray,
    Node,
    NodeArray,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Int => "int",
            Self::Double => "double",
            Self::String => "string",
            Self::IntArray => "int array",
            Self::DoubleArray => "double array",
            Self::StringArray => "string array",
            Self::Node => "node",
            Self::NodeArray => "node array",
        };
        write!(f, "{s}")
    }
}

impl Value {
    /// The variant of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Int(_) => ValueKind::Int,
            Self::Double(_) => ValueKind::Double,
            Self::String(_) => ValueKind::String,
            Self::IntArray(_) => ValueKind::IntArray,
            Self::DoubleArray(_) => ValueKind::DoubleArray,
            Self::StringArray(_) => ValueKind::StringArray,
            Self::Node(_) => ValueKind::Node,
            Self::NodeArray(_) => ValueKind::NodeArray,
        }
    }

    /// Number of elements for array variants, `None` for scalars and nodes.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::IntArray(v) => Some(v.len()),
            Self::DoubleArray(v) => Some(v.len()),
            Self::StringArray(v) => Some(v.len()),
            Self::NodeArray(a) => Some(a.len()),
            Self::Int(_) | Self::Double(_) | Self::String(_) | Self::Node(_) => None,
        }
    }

    /// Returns `true` for array variants with no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value; integers widen to `f64`.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int_array(&self) -> Option<&[i64]> {
        match self {
            Self::IntArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_double_array(&self) -> Option<&[f64]> {
        match self {
            Self::DoubleArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_string_array(&self) -> Option<&[String]> {
        match self {
            Self::StringArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Self::Node(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_node_array(&self) -> Option<&NodeArray> {
        match self {
            Self::NodeArray(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_node_array_mut(&mut self) -> Option<&mut NodeArray> {
        match self {
            Self::NodeArray(a) => Some(a),
            _ => None,
        }
    }

    /// Interpret the value as a flag: non-zero integers are `true`.
    pub fn as_flag(&self) -> Option<bool> {
        self.as_int().map(|i| i != 0)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<i64>> for Value {
    fn from(v: Vec<i64>) -> Self {
        Self::IntArray(v)
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Self::DoubleArray(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Self::StringArray(v)
    }
}

impl From<Vec<&str>> for Value {
    fn from(v: Vec<&str>) -> Self {
        Self::StringArray(v.into_iter().map(str::to_string).collect())
    }
}

impl From<Node> for Value {
    fn from(v: Node) -> Self {
        Self::Node(v)
    }
}

impl From<NodeArray> for Value {
    fn from(v: NodeArray) -> Self {
        Self::NodeArray(v)
    }
}

impl From<Vec<Node>> for Value {
    fn from(v: Vec<Node>) -> Self {
        Self::NodeArray(NodeArray::from(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(Value::from(3).kind(), ValueKind::Int);
        assert_eq!(Value::from(0.5).kind(), ValueKind::Double);
        assert_eq!(Value::from("line").kind(), ValueKind::String);
        assert_eq!(Value::from(vec![1i64]).kind(), ValueKind::IntArray);
        assert_eq!(Value::from(vec!["a", "b"]).kind(), ValueKind::StringArray);
        assert_eq!(Value::from(Node::new()).kind(), ValueKind::Node);
        assert_eq!(Value::from(vec![Node::new()]).kind(), ValueKind::NodeArray);
    }

    #[test]
    fn len_only_for_arrays() {
        assert_eq!(Value::from(vec![1.0, 2.0]).len(), Some(2));
        assert_eq!(Value::from(vec![Node::new(), Node::new()]).len(), Some(2));
        assert_eq!(Value::from(7).len(), None);
        assert_eq!(Value::from(Node::new()).len(), None);
        assert!(Value::DoubleArray(Vec::new()).is_empty());
        assert!(!Value::from(7).is_empty());
    }

    #[test]
    fn as_double_widens_ints() {
        assert_eq!(Value::from(2).as_double(), Some(2.0));
        assert_eq!(Value::from(2.5).as_double(), Some(2.5));
        assert_eq!(Value::from("2").as_double(), None);
    }

    #[test]
    fn flags_are_nonzero_ints() {
        assert_eq!(Value::from(true).as_flag(), Some(true));
        assert_eq!(Value::from(0).as_flag(), Some(false));
        assert_eq!(Value::from(0.0).as_flag(), None);
    }

    #[test]
    fn kind_display() {
        assert_eq!(ValueKind::NodeArray.to_string(), "node array");
        assert_eq!(ValueKind::Int.to_string(), "int");
    }
}
