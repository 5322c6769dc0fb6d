//! Binding overrides layered in front of another resolver.
//!
//! A [`BindingOverrideChain`] answers a lookup from its own table when the
//! exact key was overridden, and otherwise hands the lookup to the resolver it
//! wraps. Overridden keys never reach the wrapped resolver, which makes the
//! chain suitable for replacing a few bindings in tests.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::core::erase;
use crate::error::{Error, Result};
use crate::key::Key;
use crate::qualifier::{QualifierKind, QualifierValueBuilder};
use crate::resolver::{Instance, Provider, Resolver};
use crate::type_ref::TypeRef;

/// The value registered for an overridden key.
#[derive(Clone)]
pub enum OverrideValue {
  Instance(Instance),
  Provider(Provider),
}

impl OverrideValue {
  pub fn instance(&self) -> Instance {
    match self {
      OverrideValue::Instance(instance) => instance.clone(),
      OverrideValue::Provider(provider) => provider(),
    }
  }

  pub fn provider(&self) -> Provider {
    match self {
      OverrideValue::Instance(instance) => {
        let instance = instance.clone();
        Arc::new(move || instance.clone())
      }
      OverrideValue::Provider(provider) => provider.clone(),
    }
  }
}

impl fmt::Debug for OverrideValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      OverrideValue::Instance(_) => f.write_str("OverrideValue::Instance"),
      OverrideValue::Provider(_) => f.write_str("OverrideValue::Provider"),
    }
  }
}

/// What a registration is made for. Every granularity resolves to a single
/// [`Key`] before it reaches the override table.
#[derive(Debug, Clone)]
pub enum BindingTarget {
  /// A raw type, unqualified.
  Type(TypeRef),
  /// A raw type qualified by a marker kind with every member at its default.
  Qualified(TypeRef, Arc<QualifierKind>),
  /// A fully constructed key.
  Key(Key),
}

impl BindingTarget {
  pub fn of<T: ?Sized>() -> Self {
    BindingTarget::Type(TypeRef::of::<T>())
  }

  pub fn qualified_by<T: ?Sized>(kind: Arc<QualifierKind>) -> Self {
    BindingTarget::Qualified(TypeRef::of::<T>(), kind)
  }

  pub fn into_key(self) -> Result<Key> {
    match self {
      BindingTarget::Type(ty) => Ok(Key::of_type(ty)),
      BindingTarget::Qualified(ty, kind) => {
        let qualifier = QualifierValueBuilder::defaults(kind)?;
        Ok(Key::qualified_type(ty, qualifier))
      }
      BindingTarget::Key(key) => Ok(key),
    }
  }
}

impl From<TypeRef> for BindingTarget {
  fn from(ty: TypeRef) -> Self {
    BindingTarget::Type(ty)
  }
}

impl From<Key> for BindingTarget {
  fn from(key: Key) -> Self {
    BindingTarget::Key(key)
  }
}

impl From<(TypeRef, Arc<QualifierKind>)> for BindingTarget {
  fn from((ty, kind): (TypeRef, Arc<QualifierKind>)) -> Self {
    BindingTarget::Qualified(ty, kind)
  }
}

/// The outcome of consulting the override table.
#[derive(Debug)]
pub enum Lookup<'a> {
  /// The key is overridden.
  Found(&'a OverrideValue),
  /// The key is not overridden; ask the wrapped resolver.
  Delegate,
}

/// An override table plus the resolver it sits in front of.
///
/// Immutable once built, so it can be shared across threads for lookups.
pub struct BindingOverrideChain {
  overrides: HashMap<Key, OverrideValue>,
  next: Arc<dyn Resolver>,
}

impl BindingOverrideChain {
  pub fn builder() -> BindingOverrideChainBuilder {
    BindingOverrideChainBuilder::default()
  }

  /// Consults the override table only.
  pub fn lookup(&self, key: &Key) -> Lookup<'_> {
    match self.overrides.get(key) {
      Some(value) => Lookup::Found(value),
      None => Lookup::Delegate,
    }
  }

  pub fn is_overridden(&self, key: &Key) -> bool {
    self.overrides.contains_key(key)
  }

  pub fn overridden_keys(&self) -> impl Iterator<Item = &Key> {
    self.overrides.keys()
  }

  pub fn len(&self) -> usize {
    self.overrides.len()
  }

  pub fn is_empty(&self) -> bool {
    self.overrides.is_empty()
  }

  pub fn delegate(&self) -> &Arc<dyn Resolver> {
    &self.next
  }
}

impl Resolver for BindingOverrideChain {
  fn instance_for(&self, key: &Key) -> Option<Instance> {
    match self.lookup(key) {
      Lookup::Found(value) => {
        trace!(key = %key, "override hit");
        Some(value.instance())
      }
      Lookup::Delegate => {
        trace!(key = %key, "override miss, delegating");
        self.next.instance_for(key)
      }
    }
  }

  fn provider_for(&self, key: &Key) -> Option<Provider> {
    match self.lookup(key) {
      Lookup::Found(value) => {
        trace!(key = %key, "override hit");
        Some(value.provider())
      }
      Lookup::Delegate => {
        trace!(key = %key, "override miss, delegating");
        self.next.provider_for(key)
      }
    }
  }
}

impl fmt::Debug for BindingOverrideChain {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("BindingOverrideChain")
      .field("overrides", &self.overrides)
      .finish_non_exhaustive()
  }
}

/// Collects overrides for a [`BindingOverrideChain`].
///
/// Each key may be overridden once. A second registration whose target
/// resolves to an already registered key fails immediately, whether it is an
/// instance or a provider and whatever granularity it was made at.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use fibre_inject::{BindingOverrideChain, BindingTarget, Container, Key, Resolver, ResolverExt};
///
/// let container = Arc::new(Container::new());
/// container.add_instance(String::from("production"));
///
/// let mut builder = BindingOverrideChain::builder();
/// builder.bind_instance(BindingTarget::of::<String>(), String::from("test"))?;
/// let chain = builder.build(container);
///
/// assert_eq!(*chain.get::<String>(&Key::of::<String>()).unwrap(), "test");
/// # Ok::<(), fibre_inject::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct BindingOverrideChainBuilder {
  overrides: HashMap<Key, OverrideValue>,
}

impl BindingOverrideChainBuilder {
  /// Registers `value` for the key `target` resolves to.
  pub fn bind(
    &mut self,
    target: impl Into<BindingTarget>,
    value: OverrideValue,
  ) -> Result<&mut Self> {
    let key = target.into().into_key()?;
    if self.overrides.contains_key(&key) {
      return Err(Error::invalid(format!(
        "an override for {} is already registered",
        key
      )));
    }
    trace!(key = %key, value = ?value, "registered override");
    self.overrides.insert(key, value);
    Ok(self)
  }

  pub fn bind_instance<T: Any + Send + Sync>(
    &mut self,
    target: impl Into<BindingTarget>,
    instance: T,
  ) -> Result<&mut Self> {
    self.bind(target, OverrideValue::Instance(Arc::new(instance)))
  }

  pub fn bind_provider<T: Any + Send + Sync>(
    &mut self,
    target: impl Into<BindingTarget>,
    factory: impl Fn() -> T + Send + Sync + 'static,
  ) -> Result<&mut Self> {
    self.bind(target, OverrideValue::Provider(erase(factory)))
  }

  pub fn len(&self) -> usize {
    self.overrides.len()
  }

  pub fn is_empty(&self) -> bool {
    self.overrides.is_empty()
  }

  /// Places the collected overrides in front of `next`.
  pub fn build(self, next: Arc<dyn Resolver>) -> BindingOverrideChain {
    debug!(overrides = self.overrides.len(), "built binding override chain");
    BindingOverrideChain {
      overrides: self.overrides,
      next,
    }
  }
}
