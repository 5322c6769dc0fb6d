//! Qualifier values and their identity contract.
//!
//! Qualifier values must compare and hash exactly like native marker
//! annotation instances, because values built through a [`QualifierValueBuilder`]
//! and values read from declared usage are looked up in the same tables.
//! In particular floating point members are compared by their bit pattern:
//!
//! - `NaN` equals `NaN` (every NaN payload is canonicalized first),
//! - `0.0` and `-0.0` are different values,
//! - `INFINITY` equals only `INFINITY`.
//!
//! [`QualifierValueBuilder`]: crate::qualifier::QualifierValueBuilder

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::qualifier::kind::{MemberType, QualifierKind};

/// A constant of a declared enum kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumConstant {
  kind: Arc<str>,
  name: Arc<str>,
}

impl EnumConstant {
  pub fn new(kind: impl Into<Arc<str>>, name: impl Into<Arc<str>>) -> Self {
    Self {
      kind: kind.into(),
      name: name.into(),
    }
  }

  pub fn kind(&self) -> &str {
    &self.kind
  }

  pub fn name(&self) -> &str {
    &self.name
  }
}

/// A fixed-length array member. All elements share the array's element type.
#[derive(Debug, Clone)]
pub struct ArrayValue {
  element: MemberType,
  items: Vec<MemberValue>,
}

impl ArrayValue {
  /// Creates an array of `element` typed items.
  ///
  /// Fails when an item has a different type, or when `element` is itself an
  /// array type.
  pub fn new(element: MemberType, items: impl IntoIterator<Item = MemberValue>) -> Result<Self> {
    if element.is_array() {
      return Err(Error::invalid("array members cannot hold arrays"));
    }
    let items: Vec<MemberValue> = items.into_iter().collect();
    if let Some(stray) = items.iter().find(|item| item.member_type() != element) {
      return Err(Error::invalid(format!(
        "array of {} cannot hold a {} element",
        element,
        stray.member_type()
      )));
    }
    Ok(Self { element, items })
  }

  pub fn element_type(&self) -> &MemberType {
    &self.element
  }

  pub fn items(&self) -> &[MemberValue] {
    &self.items
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }
}

/// The value of one qualifier member.
#[derive(Debug, Clone)]
pub enum MemberValue {
  Bool(bool),
  Byte(i8),
  Short(i16),
  Char(u16),
  Int(i32),
  Long(i64),
  Float(f32),
  Double(f64),
  Str(Arc<str>),
  Enum(EnumConstant),
  Qualifier(QualifierValue),
  Array(ArrayValue),
}

// Canonical NaN bits, matching the native "float to int bits" conversion.
fn float_bits(value: f32) -> u32 {
  if value.is_nan() {
    0x7fc0_0000
  } else {
    value.to_bits()
  }
}

fn double_bits(value: f64) -> u64 {
  if value.is_nan() {
    0x7ff8_0000_0000_0000
  } else {
    value.to_bits()
  }
}

/// Polynomial-31 hash over UTF-16 code units.
pub(crate) fn string_hash(value: &str) -> i32 {
  value
    .encode_utf16()
    .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as i32))
}

fn fold_long(bits: u64) -> i32 {
  (bits ^ (bits >> 32)) as u32 as i32
}

impl MemberValue {
  /// The type this value satisfies.
  pub fn member_type(&self) -> MemberType {
    match self {
      MemberValue::Bool(_) => MemberType::Bool,
      MemberValue::Byte(_) => MemberType::Byte,
      MemberValue::Short(_) => MemberType::Short,
      MemberValue::Char(_) => MemberType::Char,
      MemberValue::Int(_) => MemberType::Int,
      MemberValue::Long(_) => MemberType::Long,
      MemberValue::Float(_) => MemberType::Float,
      MemberValue::Double(_) => MemberType::Double,
      MemberValue::Str(_) => MemberType::Str,
      MemberValue::Enum(constant) => MemberType::Enum(constant.kind.clone()),
      MemberValue::Qualifier(value) => MemberType::Qualifier(Arc::from(value.kind().name())),
      MemberValue::Array(array) => MemberType::array_of(array.element.clone()),
    }
  }

  /// The per-member hash used by [`QualifierValue::hash_code`].
  pub fn hash_code(&self) -> i32 {
    match self {
      MemberValue::Bool(true) => 1231,
      MemberValue::Bool(false) => 1237,
      MemberValue::Byte(v) => *v as i32,
      MemberValue::Short(v) => *v as i32,
      MemberValue::Char(v) => *v as i32,
      MemberValue::Int(v) => *v,
      MemberValue::Long(v) => fold_long(*v as u64),
      MemberValue::Float(v) => float_bits(*v) as i32,
      MemberValue::Double(v) => fold_long(double_bits(*v)),
      MemberValue::Str(v) => string_hash(v),
      MemberValue::Enum(constant) => string_hash(&constant.kind)
        .wrapping_mul(31)
        .wrapping_add(string_hash(&constant.name)),
      MemberValue::Qualifier(value) => value.hash_code(),
      MemberValue::Array(array) => array
        .items
        .iter()
        .fold(1i32, |hash, item| hash.wrapping_mul(31).wrapping_add(item.hash_code())),
    }
  }
}

impl PartialEq for MemberValue {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (MemberValue::Bool(a), MemberValue::Bool(b)) => a == b,
      (MemberValue::Byte(a), MemberValue::Byte(b)) => a == b,
      (MemberValue::Short(a), MemberValue::Short(b)) => a == b,
      (MemberValue::Char(a), MemberValue::Char(b)) => a == b,
      (MemberValue::Int(a), MemberValue::Int(b)) => a == b,
      (MemberValue::Long(a), MemberValue::Long(b)) => a == b,
      (MemberValue::Float(a), MemberValue::Float(b)) => float_bits(*a) == float_bits(*b),
      (MemberValue::Double(a), MemberValue::Double(b)) => double_bits(*a) == double_bits(*b),
      (MemberValue::Str(a), MemberValue::Str(b)) => a == b,
      (MemberValue::Enum(a), MemberValue::Enum(b)) => a == b,
      (MemberValue::Qualifier(a), MemberValue::Qualifier(b)) => a == b,
      (MemberValue::Array(a), MemberValue::Array(b)) => {
        a.element == b.element && a.items == b.items
      }
      _ => false,
    }
  }
}

impl Eq for MemberValue {}

impl Hash for MemberValue {
  fn hash<H: Hasher>(&self, state: &mut H) {
    state.write_i32(self.hash_code());
  }
}

impl fmt::Display for MemberValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      MemberValue::Bool(v) => write!(f, "{}", v),
      MemberValue::Byte(v) => write!(f, "{}", v),
      MemberValue::Short(v) => write!(f, "{}", v),
      MemberValue::Char(v) => match char::from_u32(*v as u32) {
        Some(c) => write!(f, "'{}'", c.escape_default()),
        None => write!(f, "'\\u{:04x}'", v),
      },
      MemberValue::Int(v) => write!(f, "{}", v),
      MemberValue::Long(v) => write!(f, "{}", v),
      MemberValue::Float(v) => fmt_floating(f, *v as f64, v.is_nan(), || format!("{:?}", v)),
      MemberValue::Double(v) => fmt_floating(f, *v, v.is_nan(), || format!("{:?}", v)),
      MemberValue::Str(v) => write!(f, "{:?}", v),
      MemberValue::Enum(constant) => f.write_str(&constant.name),
      MemberValue::Qualifier(value) => write!(f, "{}", value),
      MemberValue::Array(array) => {
        f.write_str("[")?;
        for (i, item) in array.items.iter().enumerate() {
          if i > 0 {
            f.write_str(", ")?;
          }
          write!(f, "{}", item)?;
        }
        f.write_str("]")
      }
    }
  }
}

fn fmt_floating(
  f: &mut fmt::Formatter<'_>,
  widened: f64,
  is_nan: bool,
  finite: impl FnOnce() -> String,
) -> fmt::Result {
  if is_nan {
    f.write_str("NaN")
  } else if widened == f64::INFINITY {
    f.write_str("Infinity")
  } else if widened == f64::NEG_INFINITY {
    f.write_str("-Infinity")
  } else {
    f.write_str(&finite())
  }
}

// --- Conversions ---

impl From<bool> for MemberValue {
  fn from(v: bool) -> Self {
    MemberValue::Bool(v)
  }
}
impl From<i8> for MemberValue {
  fn from(v: i8) -> Self {
    MemberValue::Byte(v)
  }
}
impl From<i16> for MemberValue {
  fn from(v: i16) -> Self {
    MemberValue::Short(v)
  }
}
impl From<u16> for MemberValue {
  fn from(v: u16) -> Self {
    MemberValue::Char(v)
  }
}
impl From<i32> for MemberValue {
  fn from(v: i32) -> Self {
    MemberValue::Int(v)
  }
}
impl From<i64> for MemberValue {
  fn from(v: i64) -> Self {
    MemberValue::Long(v)
  }
}
impl From<f32> for MemberValue {
  fn from(v: f32) -> Self {
    MemberValue::Float(v)
  }
}
impl From<f64> for MemberValue {
  fn from(v: f64) -> Self {
    MemberValue::Double(v)
  }
}
impl From<&str> for MemberValue {
  fn from(v: &str) -> Self {
    MemberValue::Str(Arc::from(v))
  }
}
impl From<String> for MemberValue {
  fn from(v: String) -> Self {
    MemberValue::Str(Arc::from(v))
  }
}
impl From<EnumConstant> for MemberValue {
  fn from(v: EnumConstant) -> Self {
    MemberValue::Enum(v)
  }
}
impl From<QualifierValue> for MemberValue {
  fn from(v: QualifierValue) -> Self {
    MemberValue::Qualifier(v)
  }
}
impl From<ArrayValue> for MemberValue {
  fn from(v: ArrayValue) -> Self {
    MemberValue::Array(v)
  }
}

/// An immutable marker instance: a kind plus a value for every declared member.
///
/// Values are only produced by [`QualifierValueBuilder::build`], so a value
/// never lacks a member. Cloning is cheap.
///
/// [`QualifierValueBuilder::build`]: crate::qualifier::QualifierValueBuilder::build
#[derive(Clone)]
pub struct QualifierValue {
  kind: Arc<QualifierKind>,
  // Aligned with `kind.members()`.
  values: Arc<[MemberValue]>,
}

impl QualifierValue {
  pub(crate) fn from_parts(kind: Arc<QualifierKind>, values: Vec<MemberValue>) -> Self {
    debug_assert_eq!(kind.members().len(), values.len());
    Self {
      kind,
      values: values.into(),
    }
  }

  pub fn kind(&self) -> &Arc<QualifierKind> {
    &self.kind
  }

  pub fn member(&self, name: &str) -> Option<&MemberValue> {
    self.kind.member_index(name).map(|i| &self.values[i])
  }

  /// Members in declaration order.
  pub fn members(&self) -> impl Iterator<Item = (&str, &MemberValue)> {
    self
      .kind
      .members()
      .iter()
      .map(|decl| decl.name())
      .zip(self.values.iter())
  }

  /// Compares against an arbitrary operand. Absent operands and operands that
  /// are not qualifier values are simply unequal.
  pub fn equals_any(&self, other: Option<&dyn Any>) -> bool {
    other
      .and_then(|other| other.downcast_ref::<QualifierValue>())
      .map_or(false, |other| self == other)
  }

  /// The native-compatible hash: the kind name's hash plus, for every member,
  /// `(127 * hash(name)) ^ hash(value)`. Members are summed, so the result
  /// does not depend on member order.
  pub fn hash_code(&self) -> i32 {
    self.members().fold(string_hash(self.kind.name()), |hash, (name, value)| {
      hash.wrapping_add(127i32.wrapping_mul(string_hash(name)) ^ value.hash_code())
    })
  }
}

impl PartialEq for QualifierValue {
  fn eq(&self, other: &Self) -> bool {
    if Arc::ptr_eq(&self.kind, &other.kind) {
      return self.values == other.values;
    }
    // Same kind described by two descriptors: match members by name.
    self.kind.name() == other.kind.name()
      && self.values.len() == other.values.len()
      && self
        .members()
        .all(|(name, value)| other.member(name) == Some(value))
  }
}

impl Eq for QualifierValue {}

impl Hash for QualifierValue {
  fn hash<H: Hasher>(&self, state: &mut H) {
    state.write_i32(self.hash_code());
  }
}

impl fmt::Display for QualifierValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}(", self.kind.display_name())?;
    for (i, (name, value)) in self.members().enumerate() {
      if i > 0 {
        f.write_str(", ")?;
      }
      write!(f, "{}={}", name, value)?;
    }
    f.write_str(")")
  }
}

impl fmt::Debug for QualifierValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(self, f)
  }
}
