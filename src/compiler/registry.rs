//! Memoizing, cycle-safe store of message strategies for one compilation.
//!
//! Each message type gets one cell, reserved before its fields are built
//! and filled once its strategy is composed. Lookups of a filled cell share
//! the finished strategy; lookups of a reserved cell (a reference cycle)
//! get a deferred strategy that reads the cell when drawn.

use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::Arc;

use crate::strategy::{self, Strategy};
use crate::value::Value;

type Cell = Arc<OnceCell<Strategy<Value>>>;

#[derive(Debug, Default)]
pub(crate) struct StrategyRegistry {
    cells: HashMap<String, Cell>,
    deferred: usize,
}

impl StrategyRegistry {
    pub fn new() -> StrategyRegistry {
        StrategyRegistry::default()
    }

    /// The strategy for `full_name` if one is built or being built.
    pub fn lookup(&mut self, full_name: &str) -> Option<Strategy<Value>> {
        let cell = self.cells.get(full_name)?;
        if let Some(built) = cell.get() {
            return Some(built.clone());
        }
        log::debug!("Deferring reference to {} until it is built", full_name);
        self.deferred += 1;
        Some(strategy::deferred(full_name, Arc::clone(cell)))
    }

    pub fn reserve(&mut self, full_name: &str) {
        debug_assert!(!self.cells.contains_key(full_name));
        self.cells.insert(full_name.to_string(), Arc::new(OnceCell::new()));
    }

    pub fn complete(&mut self, full_name: &str, built: Strategy<Value>) {
        match self.cells.get(full_name) {
            Some(cell) => {
                let filled = cell.set(built).is_ok();
                debug_assert!(filled, "{} was completed twice", full_name);
            }
            None => debug_assert!(false, "{} was completed without being reserved", full_name),
        }
    }

    /// Number of message types whose strategies were built.
    #[cfg(test)]
    pub fn builds(&self) -> usize {
        self.cells.len()
    }

    /// Number of deferred references handed out to break cycles.
    pub fn deferred(&self) -> usize {
        self.deferred
    }
}
