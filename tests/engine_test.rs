//! # Engine Test Suite
//!
//! Runs compiled message strategies through the ConjectureRunner: passing
//! and failing properties, reproducible failures, invalid-draw accounting
//! and the unsatisfiable outcome.

use conjecture_protobuf::schema::{FieldDescriptor, FieldKind, MessageDescriptor, ScalarKind};
use conjecture_protobuf::strategy::{integers, Strategy};
use conjecture_protobuf::{
    modules_to_strategies, ConjectureRunner, FieldOverrides, Override, RunResult, RunnerConfig, SchemaModule, Value,
};

fn account_strategy(overrides: FieldOverrides) -> Strategy<Value> {
    let module = SchemaModule::new("bank").with_message(
        MessageDescriptor::new("Account")
            .with_field(FieldDescriptor::new("balance", 1, FieldKind::Scalar(ScalarKind::SInt64)))
            .with_field(FieldDescriptor::new("owner", 2, FieldKind::Scalar(ScalarKind::String)))
            .with_field(FieldDescriptor::new("history", 3, FieldKind::Scalar(ScalarKind::Int32)).repeated()),
    );
    let strategies = modules_to_strategies(&[module.clone()], overrides).unwrap();
    strategies[module.message("Account").unwrap()].clone()
}

fn minimal_config() -> RunnerConfig {
    RunnerConfig {
        max_examples: 20,
        seed: 42,
        ..RunnerConfig::default()
    }
}

fn balance(account: &Value) -> i128 {
    account.as_message().unwrap().get("balance").unwrap().as_integer().unwrap()
}

#[test]
fn test_passing_property() {
    let mut runner = ConjectureRunner::new(minimal_config());
    let result = runner.run(&account_strategy(FieldOverrides::new()), |account| {
        account.as_message().unwrap().has_field("owner")
    });
    assert_eq!(result, RunResult::Passed);
    assert_eq!(runner.stats.valid_examples, 20);
    assert_eq!(runner.stats.invalid_examples, 0);
    assert_eq!(runner.stats.interesting_examples, 0);
}

#[test]
fn test_failing_property_is_reproducible() {
    let strategy = account_strategy(FieldOverrides::new());
    let mut runner = ConjectureRunner::new(RunnerConfig::derandomized("test_failing_property_is_reproducible"));
    match runner.run(&strategy, |account| balance(account) >= 0) {
        RunResult::Failed { seed, example } => {
            assert!(balance(&example) < 0);
            assert_eq!(strategy.example(seed).unwrap(), example);
            assert_eq!(runner.stats.interesting_examples, 1);
        }
        other => panic!("expected a failure, got {:?}", other),
    }
}

#[test]
fn test_panicking_property_fails() {
    let mut runner = ConjectureRunner::new(minimal_config());
    let result = runner.run(&account_strategy(FieldOverrides::new()), |account| {
        let history = account.as_message().unwrap().get("history").unwrap().as_list().unwrap();
        assert!(history.len() < 2, "long history");
        true
    });
    assert!(matches!(result, RunResult::Failed { .. }));
}

#[test]
fn test_overridden_field_satisfies_property() {
    let overrides = FieldOverrides::new().with(
        "bank.Account.balance",
        integers(0, 1_000_000).map(|n| Value::I64(n as i64)),
    );
    let mut runner = ConjectureRunner::new(RunnerConfig::default());
    let result = runner.run(&account_strategy(overrides), |account| (0..=1_000_000).contains(&balance(account)));
    assert_eq!(result, RunResult::Passed);
    assert_eq!(runner.stats.valid_examples, 100);
}

#[test]
fn test_filter_failures_count_as_invalid() {
    let overrides = FieldOverrides::new().with(
        "bank.Account.balance",
        Override::transform(|default| default.filter(|v| v.as_integer().map_or(false, |n| n % 4 == 0))),
    );
    let mut runner = ConjectureRunner::new(minimal_config());
    let result = runner.run(&account_strategy(overrides), |account| balance(account) % 4 == 0);
    assert_eq!(result, RunResult::Passed);
    assert_eq!(runner.stats.valid_examples, 20);
    assert!(runner.stats.invalid_examples > 0);
    assert_eq!(runner.stats.overrun_examples, 0);
}

#[test]
fn test_unsatisfiable_when_every_draw_fails() {
    let overrides = FieldOverrides::new().with(
        "bank.Account.owner",
        Override::transform(|default| default.filter(|_| false)),
    );
    let config = RunnerConfig {
        max_invalid: 25,
        ..minimal_config()
    };
    let mut runner = ConjectureRunner::new(config);
    let result = runner.run(&account_strategy(overrides), |_| true);
    assert_eq!(result, RunResult::Unsatisfiable);
    assert_eq!(runner.stats.valid_examples, 0);
    assert_eq!(runner.stats.invalid_examples, 25);
}

#[test]
fn test_tiny_draw_budget_overruns() {
    let config = RunnerConfig {
        max_draws: 2,
        max_invalid: 10,
        ..minimal_config()
    };
    let mut runner = ConjectureRunner::new(config);
    let result = runner.run(&account_strategy(FieldOverrides::new()), |_| true);
    assert_eq!(result, RunResult::Unsatisfiable);
    assert_eq!(runner.stats.overrun_examples, 10);
}
