//! The lookup identity shared by bindings, dependencies and overrides.

use std::fmt;

use crate::qualifier::QualifierValue;
use crate::type_ref::TypeRef;

/// A type plus an optional qualifier.
///
/// An absent qualifier is distinct from every present one, including a
/// qualifier whose members all hold their defaults.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Key {
  ty: TypeRef,
  qualifier: Option<QualifierValue>,
}

impl Key {
  pub fn new(ty: TypeRef, qualifier: Option<QualifierValue>) -> Self {
    Self { ty, qualifier }
  }

  /// An unqualified key for `ty`.
  pub fn of_type(ty: TypeRef) -> Self {
    Self::new(ty, None)
  }

  /// A qualified key for `ty`.
  pub fn qualified_type(ty: TypeRef, qualifier: QualifierValue) -> Self {
    Self::new(ty, Some(qualifier))
  }

  /// An unqualified key named after a Rust type.
  pub fn of<T: ?Sized>() -> Self {
    Self::of_type(TypeRef::of::<T>())
  }

  /// A qualified key named after a Rust type.
  pub fn qualified<T: ?Sized>(qualifier: QualifierValue) -> Self {
    Self::qualified_type(TypeRef::of::<T>(), qualifier)
  }

  pub fn type_ref(&self) -> &TypeRef {
    &self.ty
  }

  pub fn qualifier(&self) -> Option<&QualifierValue> {
    self.qualifier.as_ref()
  }

  /// The same qualifier applied to another type.
  pub fn with_type(&self, ty: TypeRef) -> Key {
    Self::new(ty, self.qualifier.clone())
  }
}

impl fmt::Display for Key {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.qualifier {
      Some(qualifier) => write!(f, "{} {}", qualifier, self.ty),
      None => write!(f, "{}", self.ty),
    }
  }
}

impl fmt::Debug for Key {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Key[{}]", self)
  }
}

impl From<TypeRef> for Key {
  fn from(ty: TypeRef) -> Self {
    Key::of_type(ty)
  }
}
