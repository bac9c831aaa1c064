use std::fmt;

use indexmap::IndexMap;

use crate::datetime::{Date, DateTime, Offset, Time};
use crate::parse::{ArrayNode, Node, TableNode};

/// An insertion-ordered TOML table.
pub type Table = IndexMap<String, Value>;

/// A decoded TOML value. The tree owns all of its data; nothing borrows
/// from the parsed input.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    OffsetDateTime(Date, Time, Offset),
    LocalDateTime(Date, Time),
    LocalDate(Date),
    LocalTime(Time),
    Array(Vec<Value>),
    Table(Table),
}

impl Value {
    /// Gets the type of the value as a string.
    pub fn type_str(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Bool(_) => "boolean",
            Value::OffsetDateTime(..) => "offset date-time",
            Value::LocalDateTime(..) => "local date-time",
            Value::LocalDate(_) => "local date",
            Value::LocalTime(_) => "local time",
            Value::Array(_) => "array",
            Value::Table(_) => "table",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }
}

/// Canonical textual rendering, for diagnostics and tests only. Date-times
/// are RFC 3339, floats round-trip, strings are written raw.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v:?}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::OffsetDateTime(date, time, offset) => write!(f, "{date}T{time}{offset}"),
            Value::LocalDateTime(date, time) => write!(f, "{date}T{time}"),
            Value::LocalDate(date) => date.fmt(f),
            Value::LocalTime(time) => time.fmt(f),
            Value::Array(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    value.fmt(f)?;
                }
                f.write_str("]")
            }
            Value::Table(table) => {
                if table.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                for (i, (key, value)) in table.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                f.write_str(" }")
            }
        }
    }
}

/// Copies the intermediate tree out of the scratch arena. Every key and
/// string is duplicated; the returned table owns all of its memory.
pub(crate) fn table_from_node(node: &TableNode<'_>) -> Table {
    let mut table = Table::with_capacity(node.entries.len());
    for entry in node.entries.iter() {
        table.insert(entry.key.to_string(), value_from_node(&entry.node));
    }
    table
}

fn array_from_node(node: &ArrayNode<'_>) -> Vec<Value> {
    node.elems.iter().map(value_from_node).collect()
}

fn value_from_node(node: &Node<'_>) -> Value {
    match node {
        Node::Table(t) => Value::Table(table_from_node(t)),
        Node::Array(a) => Value::Array(array_from_node(a)),
        Node::String(s) => Value::String((*s).to_string()),
        Node::Integer(v) => Value::Integer(*v),
        Node::Float(v) => Value::Float(*v),
        Node::Bool(v) => Value::Bool(*v),
        Node::DateTime(DateTime::OffsetDateTime(date, time, offset)) => {
            Value::OffsetDateTime(*date, *time, *offset)
        }
        Node::DateTime(DateTime::LocalDateTime(date, time)) => {
            Value::LocalDateTime(*date, *time)
        }
        Node::DateTime(DateTime::LocalDate(date)) => Value::LocalDate(*date),
        Node::DateTime(DateTime::LocalTime(time)) => Value::LocalTime(*time),
    }
}
