//! The `Container` struct: a runtime store of bindings keyed by [`Key`].

use std::any::Any;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use tracing::trace;

use crate::core::{erase, Binding, ResolutionGuard};
use crate::key::Key;
use crate::resolver::{Instance, Provider, Resolver};

/// A thread-safe [`Resolver`] backed by registered bindings.
///
/// Bindings can be added at any time, from any thread. Registering a key
/// again replaces its binding. Singleton factories run at most once, even
/// when several threads resolve them at the same moment.
///
/// Resolving a key whose factory (directly or indirectly) resolves the same
/// key again on the same thread panics instead of overflowing the stack.
#[derive(Default)]
pub struct Container {
  bindings: DashMap<Key, Arc<Binding>>,
}

impl Container {
  /// Creates a new, empty `Container`.
  pub fn new() -> Self {
    Self::default()
  }

  // --- PRIVATE HELPERS ---

  fn insert(&self, key: Key, binding: Binding) {
    trace!(key = %key, "registered container binding");
    self.bindings.insert(key, Arc::new(binding));
  }

  fn binding(&self, key: &Key) -> Option<Arc<Binding>> {
    // Clone out of the map so factories never run under a shard lock.
    self.bindings.get(key).map(|entry| entry.value().clone())
  }

  // --- PUBLIC API ---

  // --- Instance Registration ---
  pub fn add_instance<T: Any + Send + Sync>(&self, instance: T) {
    self.add_instance_with_key(Key::of::<T>(), instance);
  }
  pub fn add_instance_with_key<T: Any + Send + Sync>(&self, key: Key, instance: T) {
    self.insert(key, Binding::Instance(Arc::new(instance)));
  }

  // --- Singleton Registration ---
  pub fn add_singleton<T: Any + Send + Sync>(
    &self,
    factory: impl Fn() -> T + Send + Sync + 'static,
  ) {
    self.add_singleton_with_key(Key::of::<T>(), factory);
  }
  pub fn add_singleton_with_key<T: Any + Send + Sync>(
    &self,
    key: Key,
    factory: impl Fn() -> T + Send + Sync + 'static,
  ) {
    self.insert(
      key,
      Binding::Singleton {
        cell: OnceCell::new(),
        factory: erase(factory),
      },
    );
  }

  // --- Transient Registration ---
  pub fn add_transient<T: Any + Send + Sync>(
    &self,
    factory: impl Fn() -> T + Send + Sync + 'static,
  ) {
    self.add_transient_with_key(Key::of::<T>(), factory);
  }
  pub fn add_transient_with_key<T: Any + Send + Sync>(
    &self,
    key: Key,
    factory: impl Fn() -> T + Send + Sync + 'static,
  ) {
    self.insert(
      key,
      Binding::Transient {
        factory: erase(factory),
      },
    );
  }

  /// Registers an already type-erased provider, called on every lookup.
  pub fn add_provider(&self, key: Key, provider: Provider) {
    self.insert(key, Binding::Transient { factory: provider });
  }

  pub fn contains(&self, key: &Key) -> bool {
    self.bindings.contains_key(key)
  }

  pub fn len(&self) -> usize {
    self.bindings.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bindings.is_empty()
  }
}

impl Resolver for Container {
  fn instance_for(&self, key: &Key) -> Option<Instance> {
    let binding = self.binding(key)?;
    let _guard = ResolutionGuard::new(key);
    Some(binding.instance())
  }

  fn provider_for(&self, key: &Key) -> Option<Provider> {
    let binding = self.binding(key)?;
    let key = key.clone();
    Some(Arc::new(move || {
      let _guard = ResolutionGuard::new(&key);
      binding.instance()
    }))
  }
}
