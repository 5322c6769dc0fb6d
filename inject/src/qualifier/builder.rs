//! Construction of qualifier values from a kind descriptor.

use std::sync::Arc;

use tracing::trace;

use crate::error::{Error, Result};
use crate::qualifier::kind::QualifierKind;
use crate::qualifier::value::{MemberValue, QualifierValue};

/// Stages explicit member values for one marker kind and builds the value.
///
/// Every member ends up with either its staged value or the kind's default.
/// A builder belongs to a single construction sequence and may be built
/// repeatedly; each build yields an equal value.
///
/// # Examples
///
/// ```
/// use fibre_inject::qualifier::{MemberType, QualifierKind, QualifierValueBuilder};
///
/// let named = QualifierKind::builder("com.example.Named")
///   .required("value", MemberType::Str)
///   .build()?;
///
/// let mut builder = QualifierValueBuilder::new(named)?;
/// builder.add_member("value", "primary")?;
/// let qualifier = builder.build()?;
///
/// assert_eq!(qualifier.to_string(), "@Named(value=\"primary\")");
/// # Ok::<(), fibre_inject::Error>(())
/// ```
#[derive(Debug)]
pub struct QualifierValueBuilder {
  kind: Arc<QualifierKind>,
  staged: Vec<Option<MemberValue>>,
}

impl QualifierValueBuilder {
  /// Creates a builder for `kind`. Fails when `kind` is not a concrete marker
  /// kind, such as the [`QualifierKind::any`] placeholder.
  pub fn new(kind: Arc<QualifierKind>) -> Result<Self> {
    if !kind.is_concrete() {
      return Err(Error::invalid(format!(
        "{} is not a concrete marker kind",
        kind.name()
      )));
    }
    let staged = vec![None; kind.members().len()];
    Ok(Self { kind, staged })
  }

  /// Builds a value of `kind` where every member takes its default.
  pub fn defaults(kind: Arc<QualifierKind>) -> Result<QualifierValue> {
    Self::new(kind)?.build()
  }

  pub fn kind(&self) -> &Arc<QualifierKind> {
    &self.kind
  }

  /// Stages an explicit value for the declared member `name`.
  ///
  /// Fails when the member is not declared, was already staged, or when the
  /// value's type differs from the declared type.
  pub fn add_member(&mut self, name: &str, value: impl Into<MemberValue>) -> Result<&mut Self> {
    let value = value.into();
    let index = self.kind.member_index(name).ok_or_else(|| {
      Error::invalid(format!(
        "{} declares no member named '{}'",
        self.kind.name(),
        name
      ))
    })?;

    if self.staged[index].is_some() {
      return Err(Error::invalid(format!(
        "member '{}' of {} was already given a value",
        name,
        self.kind.name()
      )));
    }

    let declared = self.kind.members()[index].member_type();
    let actual = value.member_type();
    if &actual != declared {
      return Err(Error::invalid(format!(
        "member '{}' of {} expects {}, got {}",
        name,
        self.kind.name(),
        declared,
        actual
      )));
    }

    trace!(kind = self.kind.name(), member = name, "staged qualifier member");
    self.staged[index] = Some(value);
    Ok(self)
  }

  /// Produces the value. Fails when a member has neither a staged value nor
  /// a default.
  pub fn build(&self) -> Result<QualifierValue> {
    let values = self
      .kind
      .members()
      .iter()
      .zip(&self.staged)
      .map(|(decl, staged)| {
        staged
          .as_ref()
          .or(decl.default_value())
          .cloned()
          .ok_or_else(|| Error::IncompleteValue {
            kind: self.kind.name().to_owned(),
            member: decl.name().to_owned(),
          })
      })
      .collect::<Result<Vec<_>>>()?;

    Ok(QualifierValue::from_parts(self.kind.clone(), values))
  }
}
