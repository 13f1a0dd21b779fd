//! Name lookup over the top-level types of the modules being compiled.

use std::collections::{HashMap, HashSet};

use crate::error::SchemaError;
use crate::schema::{EnumDescriptor, MessageDescriptor, SchemaModule};

#[derive(Debug, Default)]
pub(crate) struct TypeIndex<'a> {
    messages: HashMap<&'a str, &'a MessageDescriptor>,
    enums: HashMap<&'a str, &'a EnumDescriptor>,
    fields: HashSet<&'a str>,
}

impl<'a> TypeIndex<'a> {
    /// Index every top-level type, rejecting nested definitions,
    /// duplicate names and enums without values.
    pub fn build(modules: &'a [SchemaModule]) -> Result<TypeIndex<'a>, SchemaError> {
        let mut index = TypeIndex::default();
        for module in modules {
            for enumeration in module.enums() {
                if enumeration.values().is_empty() {
                    return Err(SchemaError::unsupported(enumeration.full_name(), "enum declares no values"));
                }
                index.claim(enumeration.full_name())?;
                index.enums.insert(enumeration.full_name(), enumeration);
            }
            for message in module.messages() {
                if let Some(nested) = message.nested_messages().first() {
                    return Err(SchemaError::unsupported(
                        nested.full_name(),
                        "nested message types are not supported",
                    ));
                }
                if let Some(nested) = message.nested_enums().first() {
                    return Err(SchemaError::unsupported(nested.full_name(), "nested enum types are not supported"));
                }
                index.claim(message.full_name())?;
                index.messages.insert(message.full_name(), message);
                index.fields.extend(message.fields().iter().map(|f| f.full_name()));
            }
        }
        Ok(index)
    }

    fn claim(&self, full_name: &str) -> Result<(), SchemaError> {
        if self.messages.contains_key(full_name) || self.enums.contains_key(full_name) {
            return Err(SchemaError::DuplicateType {
                type_name: full_name.to_string(),
            });
        }
        Ok(())
    }

    pub fn message(&self, full_name: &str) -> Option<&'a MessageDescriptor> {
        self.messages.get(full_name).copied()
    }

    pub fn enumeration(&self, full_name: &str) -> Option<&'a EnumDescriptor> {
        self.enums.get(full_name).copied()
    }

    /// Whether `name` is a valid override key: a field or an enum type.
    pub fn is_overridable(&self, name: &str) -> bool {
        self.fields.contains(name) || self.enums.contains_key(name)
    }
}
