use std::fmt;

use thiserror::Error;

use crate::key::Key;

/// The main error type for the `fibre_inject` library.
#[derive(Debug, Clone, Error)]
pub enum Error {
  /// Builder or registration misuse: unknown or duplicate member, mismatched
  /// member type, duplicate override registration, non-concrete marker kind.
  #[error("Invalid argument: {0}")]
  InvalidArgument(String),

  #[error("Missing required value for member '{member}' of {kind}")]
  IncompleteValue { kind: String, member: String },

  #[error("Duplicate provider for {key}: declared by '{first}' and '{second}'")]
  DuplicateProvider {
    key: Key,
    first: String,
    second: String,
  },

  #[error("Unresolved dependency {key} required by {required_by}")]
  UnresolvedDependency { key: Key, required_by: Key },

  #[error("Dependency cycle through {key}")]
  DependencyCycle { key: Key },

  /// Every fault found by a whole-pass check (graph build or validation).
  #[error("{0}")]
  Validation(ValidationErrors),

  #[error("Failed to load configuration: {0}")]
  Config(String),
}

impl Error {
  pub(crate) fn invalid(message: impl Into<String>) -> Self {
    Error::InvalidArgument(message.into())
  }
}

/// A collection of faults reported together by one analysis pass.
///
/// Errors keep the order in which the pass discovered them.
#[derive(Debug, Clone, Default)]
pub struct ValidationErrors {
  errors: Vec<Error>,
}

impl ValidationErrors {
  pub(crate) fn push(&mut self, error: Error) {
    self.errors.push(error);
  }

  pub fn is_empty(&self) -> bool {
    self.errors.is_empty()
  }

  pub fn len(&self) -> usize {
    self.errors.len()
  }

  pub fn errors(&self) -> &[Error] {
    &self.errors
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Error> {
    self.errors.iter()
  }

  /// Converts into `Ok(())` when nothing was collected.
  pub(crate) fn into_result(self) -> Result<()> {
    if self.errors.is_empty() {
      Ok(())
    } else {
      Err(Error::Validation(self))
    }
  }
}

impl IntoIterator for ValidationErrors {
  type Item = Error;
  type IntoIter = std::vec::IntoIter<Error>;

  fn into_iter(self) -> Self::IntoIter {
    self.errors.into_iter()
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} binding error(s):", self.errors.len())?;
    for error in &self.errors {
      write!(f, "\n  - {}", error)?;
    }
    Ok(())
  }
}

/// A specialized `Result` type for `fibre_inject` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
