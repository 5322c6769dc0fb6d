//! Marker kind descriptors.
//!
//! A kind describes the shape of a qualifier marker: its identifying name and
//! the ordered list of members it declares, each with a type and an optional
//! default. Descriptors are produced by whatever analysis reads the marker
//! declarations and are consumed by [`QualifierValueBuilder`].
//!
//! [`QualifierValueBuilder`]: crate::qualifier::QualifierValueBuilder

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::error::{Error, Result};
use crate::qualifier::value::MemberValue;

/// The declared type of a qualifier member.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemberType {
  Bool,
  Byte,
  Short,
  /// A UTF-16 code unit.
  Char,
  Int,
  Long,
  Float,
  Double,
  Str,
  /// An enum constant of the named enum kind.
  Enum(Arc<str>),
  /// A nested qualifier of the named marker kind.
  Qualifier(Arc<str>),
  /// A fixed-length array of a single element type. Arrays do not nest.
  Array(Box<MemberType>),
}

impl MemberType {
  pub fn array_of(element: MemberType) -> Self {
    MemberType::Array(Box::new(element))
  }

  pub fn is_array(&self) -> bool {
    matches!(self, MemberType::Array(_))
  }
}

impl fmt::Display for MemberType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      MemberType::Bool => f.write_str("boolean"),
      MemberType::Byte => f.write_str("byte"),
      MemberType::Short => f.write_str("short"),
      MemberType::Char => f.write_str("char"),
      MemberType::Int => f.write_str("int"),
      MemberType::Long => f.write_str("long"),
      MemberType::Float => f.write_str("float"),
      MemberType::Double => f.write_str("double"),
      MemberType::Str => f.write_str("string"),
      MemberType::Enum(kind) | MemberType::Qualifier(kind) => f.write_str(kind),
      MemberType::Array(element) => write!(f, "{}[]", element),
    }
  }
}

/// One declared member of a marker kind.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberDecl {
  name: Arc<str>,
  ty: MemberType,
  default: Option<MemberValue>,
}

impl MemberDecl {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn member_type(&self) -> &MemberType {
    &self.ty
  }

  /// The declared default. `None` means the member is required.
  pub fn default_value(&self) -> Option<&MemberValue> {
    self.default.as_ref()
  }

  pub fn is_required(&self) -> bool {
    self.default.is_none()
  }
}

/// The descriptor of a marker kind: its identity and declared members.
///
/// Two descriptors denote the same kind when their names are equal.
#[derive(Debug)]
pub struct QualifierKind {
  name: Arc<str>,
  display_name: Arc<str>,
  members: Vec<MemberDecl>,
  concrete: bool,
}

static ANY_KIND: Lazy<Arc<QualifierKind>> = Lazy::new(|| {
  Arc::new(QualifierKind {
    name: Arc::from("Annotation"),
    display_name: Arc::from("@Annotation"),
    members: Vec::new(),
    concrete: false,
  })
});

impl QualifierKind {
  /// Starts describing a marker kind identified by `name`.
  pub fn builder(name: impl Into<Arc<str>>) -> QualifierKindBuilder {
    QualifierKindBuilder {
      name: name.into(),
      display_name: None,
      members: Vec::new(),
    }
  }

  /// The generic "any marker" placeholder. It is not a concrete kind, so no
  /// qualifier value can be built for it.
  pub fn any() -> Arc<QualifierKind> {
    ANY_KIND.clone()
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn display_name(&self) -> &str {
    &self.display_name
  }

  pub fn members(&self) -> &[MemberDecl] {
    &self.members
  }

  pub fn member(&self, name: &str) -> Option<&MemberDecl> {
    self.members.iter().find(|decl| &*decl.name == name)
  }

  pub(crate) fn member_index(&self, name: &str) -> Option<usize> {
    self.members.iter().position(|decl| &*decl.name == name)
  }

  pub fn is_concrete(&self) -> bool {
    self.concrete
  }
}

impl PartialEq for QualifierKind {
  fn eq(&self, other: &Self) -> bool {
    self.name == other.name
  }
}

impl Eq for QualifierKind {}

/// Builds a [`QualifierKind`] descriptor, member by member, in declaration order.
#[derive(Debug)]
pub struct QualifierKindBuilder {
  name: Arc<str>,
  display_name: Option<Arc<str>>,
  members: Vec<MemberDecl>,
}

impl QualifierKindBuilder {
  /// Overrides the name used when rendering values of this kind.
  /// Defaults to `@` followed by the last `.`-separated segment of the name.
  pub fn display_name(mut self, display_name: impl Into<Arc<str>>) -> Self {
    self.display_name = Some(display_name.into());
    self
  }

  /// Declares a member without a default.
  pub fn required(mut self, name: impl Into<Arc<str>>, ty: MemberType) -> Self {
    self.members.push(MemberDecl {
      name: name.into(),
      ty,
      default: None,
    });
    self
  }

  /// Declares a member whose type is that of its default value.
  pub fn with_default(mut self, name: impl Into<Arc<str>>, default: impl Into<MemberValue>) -> Self {
    let default = default.into();
    self.members.push(MemberDecl {
      name: name.into(),
      ty: default.member_type(),
      default: Some(default),
    });
    self
  }

  pub fn build(self) -> Result<Arc<QualifierKind>> {
    if self.name.is_empty() {
      return Err(Error::invalid("marker kind name must not be empty"));
    }

    let mut seen = HashSet::new();
    for decl in &self.members {
      if !seen.insert(decl.name.clone()) {
        return Err(Error::invalid(format!(
          "member '{}' is declared twice on {}",
          decl.name, self.name
        )));
      }
      if let MemberType::Array(element) = &decl.ty {
        if element.is_array() {
          return Err(Error::invalid(format!(
            "member '{}' of {} has a nested array type",
            decl.name, self.name
          )));
        }
      }
    }

    let display_name = self.display_name.unwrap_or_else(|| {
      let simple = self.name.rsplit('.').next().unwrap_or(&self.name);
      Arc::from(format!("@{}", simple))
    });

    Ok(Arc::new(QualifierKind {
      name: self.name,
      display_name,
      members: self.members,
      concrete: true,
    }))
  }
}
