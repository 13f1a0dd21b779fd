//! # Field overrides
//!
//! Callers constrain generation for a specific field (or for every field of
//! an enum type) by registering an [`Override`] under the fully-qualified
//! name of the field or enum. There are three shapes:
//!
//! - [`Override::Replace`]: the given strategy replaces the default outright.
//! - [`Override::Optional`], built with [`optional`]: each draw comes from
//!   either the given strategy or the default, with a fair choice.
//! - [`Override::Transform`]: a function receives the default strategy and
//!   returns the one to use, e.g. to filter or map it.
//!
//! For repeated and map fields the override applies to the element (map
//! value) strategy; the collection wrapping is kept.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::SchemaError;
use crate::schema::MessageDescriptor;
use crate::strategy::{self, Strategy};
use crate::value::Value;

pub type TransformFn = dyn Fn(Strategy<Value>) -> Strategy<Value> + Send + Sync;

#[derive(Clone)]
pub enum Override {
    Replace(Strategy<Value>),
    Optional(Strategy<Value>),
    Transform(Arc<TransformFn>),
}

impl Override {
    pub fn replace(strategy: Strategy<Value>) -> Override {
        Override::Replace(strategy)
    }

    pub fn transform<F>(f: F) -> Override
    where
        F: Fn(Strategy<Value>) -> Strategy<Value> + Send + Sync + 'static,
    {
        Override::Transform(Arc::new(f))
    }
}

impl From<Strategy<Value>> for Override {
    fn from(strategy: Strategy<Value>) -> Self {
        Override::Replace(strategy)
    }
}

impl fmt::Debug for Override {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Override::Replace(_) => write!(f, "Override::Replace"),
            Override::Optional(_) => write!(f, "Override::Optional"),
            Override::Transform(_) => write!(f, "Override::Transform"),
        }
    }
}

/// Mark `strategy` as an alternative to the default rather than a replacement.
pub fn optional(strategy: Strategy<Value>) -> Override {
    Override::Optional(strategy)
}

/// Canonical override key for a field of `message`.
pub fn full_field_name(message: &MessageDescriptor, field_name: &str) -> String {
    debug_assert!(
        message.field(field_name).is_some(),
        "{} has no field {}",
        message.full_name(),
        field_name
    );
    format!("{}.{}", message.full_name(), field_name)
}

/// Apply `spec` to the default strategy for one field or enum.
pub fn resolve_override(spec: &Override, default: Strategy<Value>) -> Strategy<Value> {
    match spec {
        Override::Replace(replacement) => replacement.clone(),
        Override::Optional(alternative) => strategy::one_of(vec![alternative.clone(), default]),
        Override::Transform(f) => f(default),
    }
}

/// Overrides as supplied by the caller, in registration order.
#[derive(Debug, Clone, Default)]
pub struct FieldOverrides {
    entries: Vec<(String, Override)>,
}

impl FieldOverrides {
    pub fn new() -> FieldOverrides {
        FieldOverrides::default()
    }

    pub fn with(mut self, key: impl Into<String>, spec: impl Into<Override>) -> FieldOverrides {
        self.insert(key, spec);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, spec: impl Into<Override>) {
        self.entries.push((key.into(), spec.into()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check every key and freeze the overrides into a lookup table.
    ///
    /// `is_known` says whether a key names a field or enum of the modules
    /// being compiled. Unknown keys are an error unless `ignore_unknown`.
    pub(crate) fn validate<F>(&self, is_known: F, ignore_unknown: bool) -> Result<OverrideTable, SchemaError>
    where
        F: Fn(&str) -> bool,
    {
        let mut by_name = HashMap::with_capacity(self.entries.len());
        for (key, spec) in &self.entries {
            check_key(key)?;
            if by_name.contains_key(key) {
                return Err(SchemaError::invalid_override(key, "registered more than once"));
            }
            if !is_known(key) {
                if ignore_unknown {
                    log::warn!("Ignoring override for unknown name {}", key);
                    continue;
                }
                return Err(SchemaError::UnknownOverride { key: key.clone() });
            }
            by_name.insert(key.clone(), spec.clone());
        }
        Ok(OverrideTable { by_name })
    }
}

fn check_key(key: &str) -> Result<(), SchemaError> {
    if key.is_empty() {
        return Err(SchemaError::invalid_override(key, "empty name"));
    }
    if !key.contains('.') {
        return Err(SchemaError::invalid_override(key, "expected a fully-qualified name"));
    }
    if key.split('.').any(str::is_empty) {
        return Err(SchemaError::invalid_override(key, "empty name segment"));
    }
    Ok(())
}

/// Validated overrides keyed by fully-qualified name.
#[derive(Debug, Clone, Default)]
pub(crate) struct OverrideTable {
    by_name: HashMap<String, Override>,
}

impl OverrideTable {
    pub fn get(&self, name: &str) -> Option<&Override> {
        self.by_name.get(name)
    }

    /// Resolve the override registered under `name`, if any, against `default`.
    pub fn apply(&self, name: &str, default: Strategy<Value>) -> Strategy<Value> {
        match self.get(name) {
            Some(spec) => {
                log::trace!("Applying {:?} to {}", spec, name);
                resolve_override(spec, default)
            }
            None => default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataSource;
    use crate::strategy::just;

    fn draw_all(s: &Strategy<Value>, n: usize) -> Vec<Value> {
        let mut source = DataSource::new(12);
        (0..n).map(|_| s.draw(&mut source).unwrap()).collect()
    }

    #[test]
    fn test_replace_discards_default() {
        let s = resolve_override(&Override::replace(just(Value::I32(42))), just(Value::I32(0)));
        assert!(draw_all(&s, 100).iter().all(|v| *v == Value::I32(42)));
    }

    #[test]
    fn test_optional_draws_from_both() {
        let s = resolve_override(&optional(just(Value::I32(42))), just(Value::I32(0)));
        let values = draw_all(&s, 200);
        assert!(values.contains(&Value::I32(42)));
        assert!(values.contains(&Value::I32(0)));
    }

    #[test]
    fn test_transform_receives_default() {
        let spec = Override::transform(|default| default.map(|v| Value::I64(v.as_integer().unwrap_or(0) as i64 * 2)));
        let s = resolve_override(&spec, just(Value::I32(21)));
        assert!(draw_all(&s, 10).iter().all(|v| *v == Value::I64(42)));
    }

    #[test]
    fn test_full_field_name() {
        use crate::schema::{FieldDescriptor, FieldKind, ScalarKind, SchemaModule};
        let module = SchemaModule::new("pkg").with_message(
            MessageDescriptor::new("User").with_field(FieldDescriptor::new("id", 1, FieldKind::Scalar(ScalarKind::UInt64))),
        );
        let user = module.message("User").unwrap();
        assert_eq!(full_field_name(user, "id"), "pkg.User.id");
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "pkg.User has no field nickname")]
    fn test_full_field_name_rejects_unknown_field() {
        let module = crate::schema::SchemaModule::new("pkg").with_message(MessageDescriptor::new("User"));
        let user = module.message("User").unwrap();
        full_field_name(user, "nickname");
    }

    #[test]
    fn test_validate_rejects_malformed_keys() {
        for key in ["", "id", "pkg..id", ".pkg.User.id", "pkg.User."] {
            let overrides = FieldOverrides::new().with(key, just(Value::Bool(true)));
            let result = overrides.validate(|_| true, false);
            assert!(matches!(result, Err(SchemaError::InvalidOverride { .. })), "accepted {:?}", key);
        }
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let overrides = FieldOverrides::new()
            .with("pkg.User.id", just(Value::U64(1)))
            .with("pkg.User.id", just(Value::U64(2)));
        assert!(matches!(overrides.validate(|_| true, false), Err(SchemaError::InvalidOverride { .. })));
    }

    #[test]
    fn test_validate_unknown_keys() {
        let overrides = FieldOverrides::new().with("pkg.User.nope", just(Value::U64(1)));
        assert!(matches!(
            overrides.validate(|_| false, false),
            Err(SchemaError::UnknownOverride { key }) if key == "pkg.User.nope"
        ));
        let table = overrides.validate(|_| false, true).unwrap();
        assert!(table.get("pkg.User.nope").is_none());
    }
}
