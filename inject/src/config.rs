//! Graph validation settings, loadable from YAML.
//!
//! ```yaml
//! complete: false
//! deferred_wrappers:
//!   - Lazy
//!   - Provider
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::type_ref::TypeRef;

fn default_complete() -> bool {
  true
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GraphConfig {
  /// When `false` the graph is a library fragment and `validate` does not
  /// report unresolved dependencies.
  #[serde(default = "default_complete")]
  pub complete: bool,

  /// Raw names of single-argument wrappers satisfied by the binding of their
  /// argument. Dependencies through them do not count towards cycles.
  #[serde(default)]
  pub deferred_wrappers: Vec<String>,
}

impl Default for GraphConfig {
  fn default() -> Self {
    Self {
      complete: default_complete(),
      deferred_wrappers: Vec::new(),
    }
  }
}

impl GraphConfig {
  pub fn from_yaml_str(source: &str) -> Result<Self> {
    serde_yaml::from_str(source).map_err(|e| Error::Config(e.to_string()))
  }

  pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)
      .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    Self::from_yaml_str(&source)
  }

  pub fn complete(mut self, complete: bool) -> Self {
    self.complete = complete;
    self
  }

  pub fn deferred_wrapper(mut self, raw_name: impl Into<String>) -> Self {
    self.deferred_wrappers.push(raw_name.into());
    self
  }

  pub(crate) fn deferred_set(&self) -> DeferredWrappers {
    DeferredWrappers {
      names: self.deferred_wrappers.iter().cloned().collect(),
    }
  }
}

pub(crate) struct DeferredWrappers {
  names: HashSet<String>,
}

impl DeferredWrappers {
  /// The wrapped argument when `ty` is a deferred wrapper.
  pub(crate) fn unwrap<'a>(&self, ty: &'a TypeRef) -> Option<&'a TypeRef> {
    ty.argument()
      .filter(|_| self.names.contains(ty.raw_name()))
  }
}
