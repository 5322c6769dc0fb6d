//! Core, non-public data structures for the container.

use std::cell::RefCell;
use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::key::Key;
use crate::resolver::{Instance, Provider};

thread_local! {
  // The keys currently being resolved on this thread. Re-entering one of them
  // means a factory depends on itself.
  static RESOLVING_STACK: RefCell<HashSet<Key>> = RefCell::new(HashSet::new());
}

/// An RAII guard that detects re-entrant resolution of the same key.
///
/// Construction adds the key to the thread-local resolution set and panics if
/// it was already there; dropping the guard removes it again.
pub(crate) struct ResolutionGuard {
  key: Key,
}

impl ResolutionGuard {
  pub(crate) fn new(key: &Key) -> Self {
    RESOLVING_STACK.with(|stack| {
      if !stack.borrow_mut().insert(key.clone()) {
        panic!("Circular dependency detected while resolving {}", key);
      }
    });
    Self { key: key.clone() }
  }
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    RESOLVING_STACK.with(|stack| {
      stack.borrow_mut().remove(&self.key);
    });
  }
}

/// How a container produces the value of one key.
pub(crate) enum Binding {
  Instance(Instance),
  Singleton {
    cell: OnceCell<Instance>,
    factory: Provider,
  },
  Transient {
    factory: Provider,
  },
}

impl Binding {
  pub(crate) fn instance(&self) -> Instance {
    match self {
      Binding::Instance(instance) => instance.clone(),
      Binding::Singleton { cell, factory } => cell.get_or_init(|| factory()).clone(),
      Binding::Transient { factory } => factory(),
    }
  }
}

/// Wraps a typed factory into a type-erased provider.
pub(crate) fn erase<T, F>(factory: F) -> Provider
where
  T: Send + Sync + 'static,
  F: Fn() -> T + Send + Sync + 'static,
{
  Arc::new(move || Arc::new(factory()) as Instance)
}
