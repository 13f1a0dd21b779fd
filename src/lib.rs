//! # Conjecture Protobuf
//!
//! Compiles protobuf schema descriptors into Conjecture strategies: for every
//! top-level message type of the given modules, a [`Strategy`] that draws
//! random, schema-valid [`DynamicMessage`] instances for property-based tests.
//!
//! ```
//! use conjecture_protobuf::{modules_to_strategies, FieldOverrides, SchemaModule, Value};
//! use conjecture_protobuf::schema::{FieldDescriptor, FieldKind, MessageDescriptor, ScalarKind};
//! use conjecture_protobuf::strategy::just;
//!
//! let module = SchemaModule::new("pkg").with_message(
//!     MessageDescriptor::new("User")
//!         .with_field(FieldDescriptor::new("id", 1, FieldKind::Scalar(ScalarKind::UInt64)))
//!         .with_field(FieldDescriptor::new("screen_name", 2, FieldKind::Scalar(ScalarKind::String))),
//! );
//! let overrides = FieldOverrides::new().with("pkg.User.id", just(Value::U64(42)));
//! let strategies = modules_to_strategies(&[module.clone()], overrides).unwrap();
//!
//! let user = strategies[module.message("User").unwrap()].example(0).unwrap();
//! assert_eq!(user.as_message().unwrap().get("id"), Some(&Value::U64(42)));
//! ```
//!
//! Field generation can be constrained per field (or per enum type) with
//! [`Override`]s; see [`compiler`] for the compilation model and
//! [`engine::ConjectureRunner`] for running a property over a strategy.

pub mod compiler;
pub mod data;
pub mod distributions;
pub mod engine;
pub mod error;
pub mod floats;
pub mod ints;
pub mod schema;
pub mod strategy;
pub mod strings;
pub mod value;

// Re-export core types for easy access
pub use compiler::{full_field_name, optional, Compiler, CompilerConfig, FieldOverrides, Override, StrategyMap};
pub use data::{DataSource, DrawError};
pub use engine::{ConjectureRunner, RunResult, RunnerConfig, RunnerStats};
pub use error::{SchemaError, SchemaResult};
pub use schema::SchemaModule;
pub use strategy::Strategy;
pub use value::{DynamicMessage, Value};

/// Compile every top-level message type of `modules` with the default
/// configuration, applying `overrides` keyed by fully-qualified field or
/// enum name.
pub fn modules_to_strategies(modules: &[SchemaModule], overrides: FieldOverrides) -> SchemaResult<StrategyMap> {
    Compiler::new(CompilerConfig::default()).with_overrides(overrides).compile(modules)
}
