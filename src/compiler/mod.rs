//! # Schema compiler
//!
//! Turns a finite list of [`SchemaModule`]s into one [`Strategy<Value>`] per
//! top-level message type. Compilation is a single synchronous pass: either
//! every message type gets a strategy or the first problem found is
//! returned as a [`SchemaError`] and nothing is.
//!
//! ```text
//! SchemaModule[] ──> TypeIndex ──> MessageBuilder ──> StrategyMap
//!                                   │    ▲
//!                    build_field ◄──┘    └── StrategyRegistry (memo + deferred)
//!                         │
//!                   map_scalar / map_enum, OverrideTable
//! ```

mod field;
mod index;
mod message;
mod overrides;
mod registry;
mod types;

pub use overrides::{full_field_name, optional, resolve_override, FieldOverrides, Override, TransformFn};
pub use types::{map_enum, map_scalar, TEXT_SIZES};

use std::collections::BTreeMap;
use std::ops::Index;

use crate::error::SchemaError;
use crate::schema::{MessageDescriptor, SchemaModule};
use crate::strategy::{SizeRange, Strategy};
use crate::value::Value;

use field::FieldContext;
use index::TypeIndex;
use message::MessageBuilder;

/// Generation policy shared by every field of a compilation.
#[derive(Debug, Clone)]
pub struct CompilerConfig {
    /// Smallest length of repeated and map fields
    pub min_collection_size: u64,
    /// Largest length of repeated and map fields
    pub max_collection_size: u64,
    /// Typical length of repeated and map fields
    pub average_collection_size: f64,
    /// Chance that a field with presence (optional, or a message) is set
    pub presence_probability: f64,
    /// Log and skip override keys that name nothing instead of failing
    pub ignore_unknown_overrides: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            min_collection_size: 0,
            max_collection_size: 8,
            average_collection_size: 2.0,
            presence_probability: 0.5,
            ignore_unknown_overrides: false,
        }
    }
}

impl CompilerConfig {
    pub fn collection_sizes(&self) -> SizeRange {
        SizeRange::new(self.min_collection_size, self.max_collection_size, self.average_collection_size)
    }

    fn check(&self) -> Result<(), SchemaError> {
        let invalid = |reason: String| Err(SchemaError::InvalidConfig { reason });
        if self.min_collection_size > self.max_collection_size {
            return invalid(format!(
                "min_collection_size {} exceeds max_collection_size {}",
                self.min_collection_size, self.max_collection_size
            ));
        }
        if !self.average_collection_size.is_finite() || self.average_collection_size < 0.0 {
            return invalid(format!("average_collection_size {} is not a size", self.average_collection_size));
        }
        if !(0.0..=1.0).contains(&self.presence_probability) {
            return invalid(format!(
                "presence_probability {} is not a probability",
                self.presence_probability
            ));
        }
        Ok(())
    }
}

/// Compiles schema modules into message strategies.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: CompilerConfig,
    overrides: FieldOverrides,
}

impl Compiler {
    pub fn new(config: CompilerConfig) -> Compiler {
        Compiler {
            config,
            overrides: FieldOverrides::new(),
        }
    }

    pub fn with_overrides(mut self, overrides: FieldOverrides) -> Compiler {
        self.overrides = overrides;
        self
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Build a strategy for every top-level message type of `modules`.
    pub fn compile(&self, modules: &[SchemaModule]) -> Result<StrategyMap, SchemaError> {
        self.config.check()?;
        let index = TypeIndex::build(modules)?;
        let table = self
            .overrides
            .validate(|key| index.is_overridable(key), self.config.ignore_unknown_overrides)?;
        let ctx = FieldContext {
            index: &index,
            overrides: &table,
            config: &self.config,
        };

        let mut builder = MessageBuilder::new(ctx);
        let mut strategies = BTreeMap::new();
        for module in modules {
            for message in module.messages() {
                let built = builder.build_message(message)?;
                strategies.insert(message.full_name().to_string(), built);
            }
        }
        log::debug!(
            "Compiled {} message strategies from {} modules ({} deferred references)",
            strategies.len(),
            modules.len(),
            builder.registry().deferred()
        );
        Ok(StrategyMap { strategies })
    }
}

/// One strategy per compiled message type, looked up by descriptor.
#[derive(Debug, Clone, Default)]
pub struct StrategyMap {
    strategies: BTreeMap<String, Strategy<Value>>,
}

impl StrategyMap {
    pub fn get(&self, message: &MessageDescriptor) -> Option<&Strategy<Value>> {
        self.get_by_name(message.full_name())
    }

    pub fn get_by_name(&self, full_name: &str) -> Option<&Strategy<Value>> {
        self.strategies.get(full_name)
    }

    /// Strategies in order of fully-qualified message name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Strategy<Value>)> {
        self.strategies.iter().map(|(name, strategy)| (name.as_str(), strategy))
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl Index<&MessageDescriptor> for StrategyMap {
    type Output = Strategy<Value>;

    fn index(&self, message: &MessageDescriptor) -> &Strategy<Value> {
        match self.get(message) {
            Some(strategy) => strategy,
            None => panic!("no strategy was compiled for {}", message.full_name()),
        }
    }
}
