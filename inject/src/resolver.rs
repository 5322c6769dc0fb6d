//! The lookup surface consumers use to obtain instances.

use std::any::Any;
use std::sync::Arc;

use crate::key::Key;
use crate::type_ref::TypeRef;

/// A type-erased, shareable instance.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// A zero-argument factory producing instances.
pub type Provider = Arc<dyn Fn() -> Instance + Send + Sync>;

/// Looks up instances and providers by [`Key`].
///
/// Implementors supply the two `Key` lookups. The raw-type and parameterized
/// call shapes normalize to an unqualified `Key` and go through them, so a
/// binding made for a type is visible to the equivalent `Key` and vice versa.
pub trait Resolver: Send + Sync {
  fn instance_for(&self, key: &Key) -> Option<Instance>;

  fn provider_for(&self, key: &Key) -> Option<Provider>;

  // --- Call shapes ---

  fn instance_for_type(&self, ty: &TypeRef) -> Option<Instance> {
    self.instance_for(&Key::of_type(ty.clone()))
  }

  fn instance_for_parameterized(&self, raw: &str, argument: &TypeRef) -> Option<Instance> {
    self.instance_for(&Key::of_type(TypeRef::parameterized(raw, argument.clone())))
  }

  fn provider_for_type(&self, ty: &TypeRef) -> Option<Provider> {
    self.provider_for(&Key::of_type(ty.clone()))
  }

  fn provider_for_parameterized(&self, raw: &str, argument: &TypeRef) -> Option<Provider> {
    self.provider_for(&Key::of_type(TypeRef::parameterized(raw, argument.clone())))
  }
}

/// Typed lookup on top of any [`Resolver`].
pub trait ResolverExt: Resolver {
  /// Resolves `key` and downcasts the instance to `T`.
  fn get<T: Any + Send + Sync>(&self, key: &Key) -> Option<Arc<T>> {
    self.instance_for(key)?.downcast::<T>().ok()
  }
}

impl<R: Resolver + ?Sized> ResolverExt for R {}

impl<R: Resolver + ?Sized> Resolver for Arc<R> {
  fn instance_for(&self, key: &Key) -> Option<Instance> {
    (**self).instance_for(key)
  }

  fn provider_for(&self, key: &Key) -> Option<Provider> {
    (**self).provider_for(key)
  }
}
