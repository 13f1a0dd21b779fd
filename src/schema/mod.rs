//! # Schema descriptors
//!
//! Read-only metadata describing the message and enum types of a protobuf
//! schema module: what the compiler walks to build strategies. Descriptors
//! are plain data. They can be assembled with the builder methods below, or
//! loaded from a JSON document with [`SchemaModule::from_json`]:
//!
//! ```json
//! {
//!   "package": "im",
//!   "messages": [
//!     { "name": "User",
//!       "fields": [
//!         { "name": "id", "number": 1, "type": { "scalar": "uint64" } },
//!         { "name": "friends", "number": 2, "type": { "message": "im.User" },
//!           "label": "repeated" }
//!       ] }
//!   ],
//!   "enums": [
//!     { "name": "Client", "values": [ { "name": "CLIENT_UNKNOWN", "number": 0 } ] }
//!   ]
//! }
//! ```
//!
//! Fully-qualified names (`package.Message`, `package.Message.field`) are
//! filled in when a type is added to a module, so a descriptor obtained from
//! [`SchemaModule::message`] always carries them.

mod descriptor;

pub use self::descriptor::{
    Cardinality, EnumDescriptor, EnumValue, FieldDescriptor, FieldKind, MessageDescriptor, MessageFactory,
    ScalarKind,
};

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaModule {
    /// Source file name, informational only.
    #[serde(default)]
    name: String,
    #[serde(default)]
    package: String,
    #[serde(default)]
    messages: Vec<MessageDescriptor>,
    #[serde(default)]
    enums: Vec<EnumDescriptor>,
}

impl SchemaModule {
    pub fn new(package: impl Into<String>) -> SchemaModule {
        SchemaModule {
            name: String::new(),
            package: package.into(),
            messages: Vec::new(),
            enums: Vec::new(),
        }
    }

    /// Parse a module from JSON and qualify every name in it.
    pub fn from_json(json: &str) -> Result<SchemaModule, SchemaError> {
        let mut module: SchemaModule = serde_json::from_str(json)?;
        module.qualify();
        Ok(module)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> SchemaModule {
        self.name = name.into();
        self
    }

    pub fn with_message(mut self, mut message: MessageDescriptor) -> SchemaModule {
        message.qualify(&self.package);
        self.messages.push(message);
        self
    }

    pub fn with_enum(mut self, mut enumeration: EnumDescriptor) -> SchemaModule {
        enumeration.qualify(&self.package);
        self.enums.push(enumeration);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn messages(&self) -> &[MessageDescriptor] {
        &self.messages
    }

    pub fn enums(&self) -> &[EnumDescriptor] {
        &self.enums
    }

    /// Look up a top-level message by its local name.
    pub fn message(&self, name: &str) -> Option<&MessageDescriptor> {
        self.messages.iter().find(|m| m.name() == name)
    }

    /// Look up a top-level enum by its local name.
    pub fn enumeration(&self, name: &str) -> Option<&EnumDescriptor> {
        self.enums.iter().find(|e| e.name() == name)
    }

    fn qualify(&mut self) {
        for message in &mut self.messages {
            message.qualify(&self.package);
        }
        for enumeration in &mut self.enums {
            enumeration.qualify(&self.package);
        }
    }
}
