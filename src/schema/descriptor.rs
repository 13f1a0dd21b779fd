use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::value::{DynamicMessage, Value};

/// The protobuf scalar field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    Double,
    Float,
    Int32,
    Int64,
    UInt32,
    UInt64,
    SInt32,
    SInt64,
    Fixed32,
    Fixed64,
    SFixed32,
    SFixed64,
    Bool,
    String,
    Bytes,
}

impl ScalarKind {
    /// Whether protobuf allows this kind as a `map<K, V>` key.
    pub fn is_valid_map_key(self) -> bool {
        !matches!(self, ScalarKind::Double | ScalarKind::Float | ScalarKind::Bytes)
    }

    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Double => "double",
            ScalarKind::Float => "float",
            ScalarKind::Int32 => "int32",
            ScalarKind::Int64 => "int64",
            ScalarKind::UInt32 => "uint32",
            ScalarKind::UInt64 => "uint64",
            ScalarKind::SInt32 => "sint32",
            ScalarKind::SInt64 => "sint64",
            ScalarKind::Fixed32 => "fixed32",
            ScalarKind::Fixed64 => "fixed64",
            ScalarKind::SFixed32 => "sfixed32",
            ScalarKind::SFixed64 => "sfixed64",
            ScalarKind::Bool => "bool",
            ScalarKind::String => "string",
            ScalarKind::Bytes => "bytes",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a field holds. Enum and message references are fully-qualified type names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Scalar(ScalarKind),
    Enum(String),
    Message(String),
    Map { key: ScalarKind, value: Box<FieldKind> },
}

impl FieldKind {
    fn qualify(&mut self, package: &str) {
        match self {
            FieldKind::Scalar(_) => {}
            FieldKind::Enum(name) | FieldKind::Message(name) => *name = qualify_reference(package, name),
            FieldKind::Map { value, .. } => value.qualify(package),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// Exactly one value (proto3 implicit presence, proto2 `required`).
    #[default]
    Singular,
    /// Explicit presence: the field may be unset.
    Optional,
    Repeated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    name: String,
    #[serde(default)]
    full_name: String,
    number: u32,
    #[serde(rename = "type")]
    kind: FieldKind,
    #[serde(default, rename = "label")]
    cardinality: Cardinality,
    #[serde(default)]
    oneof: Option<String>,
    #[serde(default)]
    deprecated: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, number: u32, kind: FieldKind) -> FieldDescriptor {
        let name = name.into();
        FieldDescriptor {
            full_name: name.clone(),
            name,
            number,
            kind,
            cardinality: Cardinality::Singular,
            oneof: None,
            deprecated: false,
        }
    }

    pub fn repeated(mut self) -> FieldDescriptor {
        self.cardinality = Cardinality::Repeated;
        self
    }

    pub fn optional(mut self) -> FieldDescriptor {
        self.cardinality = Cardinality::Optional;
        self
    }

    pub fn in_oneof(mut self, group: impl Into<String>) -> FieldDescriptor {
        self.oneof = Some(group.into());
        self
    }

    pub fn deprecated(mut self) -> FieldDescriptor {
        self.deprecated = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `package.Message.field`
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn oneof(&self) -> Option<&str> {
        self.oneof.as_deref()
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDescriptor {
    name: String,
    #[serde(default)]
    full_name: String,
    #[serde(default)]
    fields: Vec<FieldDescriptor>,
    #[serde(default)]
    nested_messages: Vec<MessageDescriptor>,
    #[serde(default)]
    nested_enums: Vec<EnumDescriptor>,
}

impl MessageDescriptor {
    pub fn new(name: impl Into<String>) -> MessageDescriptor {
        let name = name.into();
        MessageDescriptor {
            full_name: name.clone(),
            name,
            fields: Vec::new(),
            nested_messages: Vec::new(),
            nested_enums: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> MessageDescriptor {
        self.fields.push(field);
        self
    }

    pub fn with_nested_message(mut self, message: MessageDescriptor) -> MessageDescriptor {
        self.nested_messages.push(message);
        self
    }

    pub fn with_nested_enum(mut self, enumeration: EnumDescriptor) -> MessageDescriptor {
        self.nested_enums.push(enumeration);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `package.Message`
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn nested_messages(&self) -> &[MessageDescriptor] {
        &self.nested_messages
    }

    pub fn nested_enums(&self) -> &[EnumDescriptor] {
        &self.nested_enums
    }

    /// An owned handle on this type's builder API.
    pub fn factory(&self) -> MessageFactory {
        MessageFactory {
            full_name: self.full_name.clone(),
            field_names: self.fields.iter().map(|f| f.name.clone()).collect(),
        }
    }

    /// Construct an instance from field values keyed by local field name.
    pub fn new_message(&self, fields: BTreeMap<String, Value>) -> DynamicMessage {
        self.factory().build(fields)
    }

    pub(crate) fn qualify(&mut self, package: &str) {
        self.full_name = join_name(package, &self.name);
        for field in &mut self.fields {
            field.full_name = join_name(&self.full_name, &field.name);
            field.kind.qualify(package);
        }
        for nested in &mut self.nested_messages {
            nested.qualify(&self.full_name);
        }
        for nested in &mut self.nested_enums {
            nested.qualify(&self.full_name);
        }
    }
}

/// Builds [`DynamicMessage`]s of one message type without borrowing its descriptor.
#[derive(Debug, Clone)]
pub struct MessageFactory {
    full_name: String,
    field_names: Vec<String>,
}

impl MessageFactory {
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn build(&self, fields: BTreeMap<String, Value>) -> DynamicMessage {
        debug_assert!(fields.keys().all(|k| self.field_names.contains(k)));
        DynamicMessage::new(self.full_name.clone(), fields)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDescriptor {
    name: String,
    #[serde(default)]
    full_name: String,
    #[serde(default)]
    values: Vec<EnumValue>,
}

impl EnumDescriptor {
    pub fn new(name: impl Into<String>) -> EnumDescriptor {
        let name = name.into();
        EnumDescriptor {
            full_name: name.clone(),
            name,
            values: Vec::new(),
        }
    }

    pub fn with_value(mut self, name: impl Into<String>, number: i32) -> EnumDescriptor {
        self.values.push(EnumValue {
            name: name.into(),
            number,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn values(&self) -> &[EnumValue] {
        &self.values
    }

    /// Declared numbers, duplicates (aliases) removed, in declaration order.
    pub fn numbers(&self) -> Vec<i32> {
        let mut numbers: Vec<i32> = Vec::with_capacity(self.values.len());
        for value in &self.values {
            if !numbers.contains(&value.number) {
                numbers.push(value.number);
            }
        }
        numbers
    }

    pub(crate) fn qualify(&mut self, scope: &str) {
        self.full_name = join_name(scope, &self.name);
    }
}

fn join_name(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", scope, name)
    }
}

/// Descriptor sets write references as `.package.Type`; bare names are
/// taken relative to the module package.
fn qualify_reference(package: &str, name: &str) -> String {
    let name = name.strip_prefix('.').unwrap_or(name);
    if name.contains('.') {
        name.to_string()
    } else {
        join_name(package, name)
    }
}
