//! Dynamic protobuf values.
//!
//! Generated instances are not Rust structs produced by a code generator:
//! they are [`DynamicMessage`]s, built through
//! [`MessageDescriptor::new_message`](crate::schema::MessageDescriptor::new_message),
//! holding one [`Value`] per populated field. Unset fields are simply absent.

use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Bytes(Vec<u8>),
    /// Enum values are carried by number, as on the wire.
    Enum(i32),
    Message(DynamicMessage),
    List(Vec<Value>),
    /// Map entries with pairwise distinct keys, in draw order.
    Map(Vec<(Value, Value)>),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Any integral value (including enum numbers) widened to `i128`.
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Value::I32(v) | Value::Enum(v) => Some(*v as i128),
            Value::I64(v) => Some(*v as i128),
            Value::U32(v) => Some(*v as i128),
            Value::U64(v) => Some(*v as i128),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F32(v) => Some(*v as f64),
            Value::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&DynamicMessage> {
        match self {
            Value::Message(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

/// An instance of a message type: its fully-qualified type name and the
/// fields that were populated, keyed by local field name.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicMessage {
    full_name: String,
    fields: BTreeMap<String, Value>,
}

impl DynamicMessage {
    pub(crate) fn new(full_name: String, fields: BTreeMap<String, Value>) -> DynamicMessage {
        DynamicMessage { full_name, fields }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn get(&self, field_name: &str) -> Option<&Value> {
        self.fields.get(field_name)
    }

    pub fn has_field(&self, field_name: &str) -> bool {
        self.fields.contains_key(field_name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Deepest chain of nested messages below this one, counting this one.
    pub fn nesting_depth(&self) -> usize {
        fn depth_of(value: &Value) -> usize {
            match value {
                Value::Message(m) => m.nesting_depth(),
                Value::List(items) => items.iter().map(depth_of).max().unwrap_or(0),
                Value::Map(entries) => entries.iter().map(|(_, v)| depth_of(v)).max().unwrap_or(0),
                _ => 0,
            }
        }
        1 + self.fields.values().map(depth_of).max().unwrap_or(0)
    }
}

impl fmt::Display for DynamicMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.full_name)?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, " {}: {:?}", name, value)?;
        }
        write!(f, " }}")
    }
}
