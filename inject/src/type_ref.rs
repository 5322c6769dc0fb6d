//! Canonical identity for declared types.

use std::fmt;
use std::sync::Arc;

/// Identifies a declared type.
///
/// Parameterization is restricted to single-argument wrappers such as
/// `Lazy<T>` or `Provider<T>`; every other type is raw. Two `TypeRef`s are
/// equal when they name the same raw type and, if parameterized, the same
/// argument.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeRef {
  raw: Arc<str>,
  argument: Option<Arc<TypeRef>>,
}

impl TypeRef {
  /// A raw (non-parameterized) type.
  pub fn raw(name: impl Into<Arc<str>>) -> Self {
    Self {
      raw: name.into(),
      argument: None,
    }
  }

  /// A single-argument wrapper around `argument`, e.g. `Lazy<Clock>`.
  pub fn parameterized(raw: impl Into<Arc<str>>, argument: TypeRef) -> Self {
    Self {
      raw: raw.into(),
      argument: Some(Arc::new(argument)),
    }
  }

  /// The raw type named after a Rust type.
  pub fn of<T: ?Sized>() -> Self {
    Self::raw(std::any::type_name::<T>())
  }

  pub fn raw_name(&self) -> &str {
    &self.raw
  }

  pub fn argument(&self) -> Option<&TypeRef> {
    self.argument.as_deref()
  }

  pub fn is_parameterized(&self) -> bool {
    self.argument.is_some()
  }

  /// Drops the parameterization, keeping only the raw type.
  pub fn erased(&self) -> TypeRef {
    Self::raw(self.raw.clone())
  }
}

impl fmt::Debug for TypeRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(self, f)
  }
}

impl fmt::Display for TypeRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.argument {
      Some(argument) => write!(f, "{}<{}>", self.raw, argument),
      None => f.write_str(&self.raw),
    }
  }
}
