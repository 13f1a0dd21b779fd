//! Strategy for a single field.
//!
//! The field's base strategy comes from its kind: the type mapper for
//! scalars, a uniform choice for enums, the message builder for message
//! references. For repeated and map fields any override registered under
//! the field's name is applied to that per-element strategy, and only then
//! is the collection wrapping put around it. For single-valued fields a
//! replacing or transforming override also takes over the presence policy:
//! the field is always set. An `optional` override keeps the default,
//! presence included, as one of its two branches.

use crate::compiler::index::TypeIndex;
use crate::compiler::overrides::{resolve_override, Override, OverrideTable};
use crate::compiler::types::{map_enum, map_scalar};
use crate::compiler::CompilerConfig;
use crate::error::SchemaError;
use crate::schema::{Cardinality, FieldDescriptor, FieldKind, MessageDescriptor};
use crate::strategy::{self, Strategy};
use crate::value::Value;

/// Callback that yields the (possibly deferred) strategy for a message type.
pub(crate) type ResolveMessage<'r, 'm> =
    dyn FnMut(&'m MessageDescriptor) -> Result<Strategy<Value>, SchemaError> + 'r;

/// Read-only state shared by every field built during one compilation.
#[derive(Clone, Copy)]
pub(crate) struct FieldContext<'c, 'm> {
    pub index: &'c TypeIndex<'m>,
    pub overrides: &'c OverrideTable,
    pub config: &'c CompilerConfig,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Presence {
    Always,
    /// Populated with the given probability, never past the depth limit.
    Sometimes(f64),
}

impl Presence {
    fn wrap(self, value: Strategy<Value>) -> Strategy<Option<Value>> {
        match self {
            Presence::Always => value.map(Some),
            Presence::Sometimes(p) => strategy::absent_or(value, p),
        }
    }
}

/// Drawing `None` leaves the field unset.
#[derive(Debug, Clone)]
pub(crate) struct FieldStrategy {
    pub value: Strategy<Option<Value>>,
}

/// Build the strategy for `field`, or `None` if the field is never populated.
pub(crate) fn build_field<'m>(
    field: &'m FieldDescriptor,
    resolve_message: &mut ResolveMessage<'_, 'm>,
    ctx: FieldContext<'_, 'm>,
) -> Result<Option<FieldStrategy>, SchemaError> {
    if field.is_deprecated() && ctx.overrides.get(field.full_name()).is_none() {
        log::trace!("Leaving deprecated field {} unset", field.full_name());
        return Ok(None);
    }

    let (element_kind, map_key) = match field.kind() {
        FieldKind::Map { key, value } => {
            if !key.is_valid_map_key() {
                return Err(SchemaError::unsupported(
                    field.full_name(),
                    format!("{} is not a valid map key type", key),
                ));
            }
            (value.as_ref(), Some(*key))
        }
        other => (other, None),
    };

    if field.oneof().is_some() && (map_key.is_some() || field.cardinality() == Cardinality::Repeated) {
        return Err(SchemaError::unsupported(
            field.full_name(),
            "oneof members cannot be repeated or map fields",
        ));
    }

    let base = base_strategy(field, element_kind, resolve_message, ctx)?;
    let sizes = ctx.config.collection_sizes();
    let p_present = ctx.config.presence_probability;

    let built = match (map_key, field.cardinality()) {
        (Some(key), _) => {
            let element = ctx.overrides.apply(field.full_name(), base);
            FieldStrategy {
                value: strategy::dictionaries(map_scalar(key), element, sizes).map(|entries| Some(Value::Map(entries))),
            }
        }
        (None, Cardinality::Repeated) => {
            let element = ctx.overrides.apply(field.full_name(), base);
            FieldStrategy {
                value: strategy::lists(element, sizes).map(|items| Some(Value::List(items))),
            }
        }
        (None, cardinality) => {
            let is_message = matches!(element_kind, FieldKind::Message(_));
            let presence = if field.oneof().is_some() {
                // The group decides whether the member is set
                Presence::Always
            } else if cardinality == Cardinality::Optional || is_message {
                Presence::Sometimes(p_present)
            } else {
                Presence::Always
            };
            // Overridden message fields still stop at the depth limit
            let overridden = if is_message { Presence::Sometimes(1.0) } else { Presence::Always };
            single_valued(field, base, presence, overridden, ctx.overrides)
        }
    };
    log::trace!("Built strategy for field {}", field.full_name());
    Ok(Some(built))
}

fn single_valued(
    field: &FieldDescriptor,
    base: Strategy<Value>,
    presence: Presence,
    overridden: Presence,
    overrides: &OverrideTable,
) -> FieldStrategy {
    let value = match overrides.get(field.full_name()) {
        None => presence.wrap(base),
        Some(Override::Optional(alternative)) => {
            log::trace!("Mixing override into {}", field.full_name());
            strategy::one_of(vec![overridden.wrap(alternative.clone()), presence.wrap(base)])
        }
        Some(spec) => {
            log::trace!("Applying {:?} to {}", spec, field.full_name());
            overridden.wrap(resolve_override(spec, base))
        }
    };
    FieldStrategy { value }
}

fn base_strategy<'m>(
    field: &FieldDescriptor,
    kind: &FieldKind,
    resolve_message: &mut ResolveMessage<'_, 'm>,
    ctx: FieldContext<'_, 'm>,
) -> Result<Strategy<Value>, SchemaError> {
    let unresolved = |target: &str| SchemaError::UnresolvedReference {
        field: field.full_name().to_string(),
        target: target.to_string(),
    };
    match kind {
        FieldKind::Scalar(scalar) => Ok(map_scalar(*scalar)),
        FieldKind::Enum(name) => {
            let enumeration = ctx.index.enumeration(name).ok_or_else(|| unresolved(name))?;
            Ok(ctx.overrides.apply(enumeration.full_name(), map_enum(enumeration)))
        }
        FieldKind::Message(name) => {
            let message = ctx.index.message(name).ok_or_else(|| unresolved(name))?;
            resolve_message(message)
        }
        FieldKind::Map { .. } => Err(SchemaError::unsupported(field.full_name(), "map values cannot be maps")),
    }
}
