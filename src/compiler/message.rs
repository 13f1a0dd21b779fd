//! Strategy for a whole message type.
//!
//! Fields are built in declaration order and composed into one strategy
//! that draws every applicable field and constructs an instance through the
//! descriptor's [`MessageFactory`]. Members of a oneof group are drawn as a
//! unit: at most one of them is set per instance.
//!
//! Message references go through the [`StrategyRegistry`], so a type
//! referenced from many places is built once, and a reference back to a
//! type still under construction becomes a deferred strategy instead of
//! unbounded recursion.

use std::collections::BTreeMap;

use crate::compiler::field::{build_field, FieldContext};
use crate::compiler::registry::StrategyRegistry;
use crate::data::{DataSource, Draw};
use crate::distributions::bounded_int;
use crate::error::SchemaError;
use crate::schema::{MessageDescriptor, MessageFactory};
use crate::strategy::Strategy;
use crate::value::Value;

enum Slot {
    /// Drawn `None` leaves the field unset.
    Field {
        name: String,
        value: Strategy<Option<Value>>,
    },
    Oneof {
        group: String,
        members: Vec<(String, Strategy<Option<Value>>)>,
    },
}

impl Slot {
    fn draw_into(&self, source: &mut DataSource, fields: &mut BTreeMap<String, Value>) -> Draw<()> {
        match self {
            Slot::Field { name, value } => {
                if let Some(drawn) = value.draw(source)? {
                    fields.insert(name.clone(), drawn);
                }
            }
            Slot::Oneof { members, .. } => {
                // Index `members.len()` means no member is set
                let n = members.len() as u64;
                let choice = if source.at_depth_limit() { n } else { bounded_int(source, n)? };
                if let Some((name, value)) = members.get(choice as usize) {
                    if let Some(drawn) = value.draw(source)? {
                        fields.insert(name.clone(), drawn);
                    }
                }
            }
        }
        Ok(())
    }
}

pub(crate) struct MessageBuilder<'c, 'm> {
    ctx: FieldContext<'c, 'm>,
    registry: StrategyRegistry,
}

impl<'c, 'm> MessageBuilder<'c, 'm> {
    pub fn new(ctx: FieldContext<'c, 'm>) -> MessageBuilder<'c, 'm> {
        MessageBuilder {
            ctx,
            registry: StrategyRegistry::new(),
        }
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    pub fn build_message(&mut self, message: &'m MessageDescriptor) -> Result<Strategy<Value>, SchemaError> {
        if let Some(existing) = self.registry.lookup(message.full_name()) {
            return Ok(existing);
        }
        self.registry.reserve(message.full_name());

        let ctx = self.ctx;
        let mut slots: Vec<Slot> = Vec::with_capacity(message.fields().len());
        for field in message.fields() {
            let built = build_field(field, &mut |target| self.build_message(target), ctx)?;
            let built = match built {
                Some(built) => built,
                None => continue,
            };
            match field.oneof() {
                None => slots.push(Slot::Field {
                    name: field.name().to_string(),
                    value: built.value,
                }),
                Some(group) => {
                    let member = (field.name().to_string(), built.value);
                    let existing = slots.iter_mut().find_map(|slot| match slot {
                        Slot::Oneof { group: g, members } if g == group => Some(members),
                        _ => None,
                    });
                    match existing {
                        Some(members) => members.push(member),
                        None => slots.push(Slot::Oneof {
                            group: group.to_string(),
                            members: vec![member],
                        }),
                    }
                }
            }
        }

        let strategy = compose(message.factory(), slots);
        self.registry.complete(message.full_name(), strategy.clone());
        log::debug!("Built strategy for message {}", message.full_name());
        Ok(strategy)
    }
}

fn compose(factory: MessageFactory, slots: Vec<Slot>) -> Strategy<Value> {
    Strategy::new(move |source| {
        source.start_span()?;
        let mut fields = BTreeMap::new();
        let drawn = slots.iter().try_for_each(|slot| slot.draw_into(source, &mut fields));
        source.stop_span();
        drawn?;
        Ok(Value::Message(factory.build(fields)))
    })
}
