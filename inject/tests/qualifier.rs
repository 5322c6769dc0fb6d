use fibre_inject::qualifier::{
  ArrayValue, EnumConstant, MemberType, MemberValue, QualifierKind, QualifierValue,
  QualifierValueBuilder,
};
use fibre_inject::Error;
use pretty_assertions::assert_eq;
use std::any::Any;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

// --- Test Fixtures ---

fn named() -> Arc<QualifierKind> {
  QualifierKind::builder("javax.inject.Named")
    .required("value", MemberType::Str)
    .build()
    .unwrap()
}

fn precision() -> Arc<QualifierKind> {
  QualifierKind::builder("com.example.Precision")
    .with_default("epsilon", -0.0f64)
    .with_default("ratio", 1.0f32)
    .with_default("strict", false)
    .build()
    .unwrap()
}

fn routed() -> Arc<QualifierKind> {
  QualifierKind::builder("com.example.Routed")
    .required("paths", MemberType::array_of(MemberType::Str))
    .with_default("retries", 3i32)
    .with_default("timeout", 30i64)
    .with_default("mode", EnumConstant::new("com.example.Mode", "FAST"))
    .build()
    .unwrap()
}

fn build(kind: Arc<QualifierKind>, members: Vec<(&str, MemberValue)>) -> QualifierValue {
  let mut builder = QualifierValueBuilder::new(kind).unwrap();
  for (name, value) in members {
    builder.add_member(name, value).unwrap();
  }
  builder.build().unwrap()
}

fn std_hash<T: Hash>(value: &T) -> u64 {
  let mut hasher = DefaultHasher::new();
  value.hash(&mut hasher);
  hasher.finish()
}

fn paths(items: &[&str]) -> MemberValue {
  ArrayValue::new(MemberType::Str, items.iter().map(|p| MemberValue::from(*p)))
    .unwrap()
    .into()
}

// --- Equality ---

#[test]
fn test_equality_is_reflexive_and_symmetric() {
  let a = build(named(), vec![("value", "primary".into())]);
  let b = build(named(), vec![("value", "primary".into())]);

  assert_eq!(a, a);
  assert_eq!(a, b);
  assert_eq!(b, a);
}

#[test]
fn test_equals_any_rejects_absent_and_foreign_operands() {
  let q = build(named(), vec![("value", "primary".into())]);
  let text = String::from("@Named(value=\"primary\")");

  assert!(q.equals_any(Some(&q as &dyn Any)));
  assert!(!q.equals_any(None));
  assert!(!q.equals_any(Some(&text as &dyn Any)));
}

#[test]
fn test_different_kinds_are_unequal_even_with_identical_members() {
  let other = QualifierKind::builder("com.example.Tagged")
    .required("value", MemberType::Str)
    .build()
    .unwrap();

  let a = build(named(), vec![("value", "x".into())]);
  let b = build(other, vec![("value", "x".into())]);
  assert_ne!(a, b);
}

#[test]
fn test_descriptors_of_the_same_kind_compare_structurally() {
  // Two analysis paths may describe the same marker independently.
  let a = build(named(), vec![("value", "x".into())]);
  let b = build(named(), vec![("value", "x".into())]);
  assert!(!Arc::ptr_eq(a.kind(), b.kind()));
  assert_eq!(a, b);
  assert_eq!(a.hash_code(), b.hash_code());
}

#[test]
fn test_nan_equals_nan() {
  let a = build(precision(), vec![("epsilon", f64::NAN.into())]);
  let b = build(precision(), vec![("epsilon", f64::NAN.into())]);
  assert_eq!(a, b);
  assert_eq!(a.hash_code(), b.hash_code());

  let c = build(precision(), vec![("ratio", f32::NAN.into())]);
  let d = build(precision(), vec![("ratio", f32::NAN.into())]);
  assert_eq!(c, d);
}

#[test]
fn test_positive_and_negative_zero_differ() {
  let positive = build(precision(), vec![("epsilon", 0.0f64.into())]);
  let negative = build(precision(), vec![("epsilon", (-0.0f64).into())]);
  assert_ne!(positive, negative);

  let positive = build(precision(), vec![("ratio", 0.0f32.into())]);
  let negative = build(precision(), vec![("ratio", (-0.0f32).into())]);
  assert_ne!(positive, negative);
}

#[test]
fn test_negative_zero_default_matches_explicit_negative_zero_only() {
  let defaulted = QualifierValueBuilder::defaults(precision()).unwrap();
  let explicit_negative = build(precision(), vec![("epsilon", (-0.0f64).into())]);
  let explicit_positive = build(precision(), vec![("epsilon", 0.0f64.into())]);

  assert_eq!(defaulted, explicit_negative);
  assert_eq!(defaulted.hash_code(), explicit_negative.hash_code());
  assert_ne!(defaulted, explicit_positive);
}

#[test]
fn test_infinities_compare_by_sign() {
  let pos = build(precision(), vec![("epsilon", f64::INFINITY.into())]);
  let pos_again = build(precision(), vec![("epsilon", f64::INFINITY.into())]);
  let neg = build(precision(), vec![("epsilon", f64::NEG_INFINITY.into())]);

  assert_eq!(pos, pos_again);
  assert_ne!(pos, neg);
}

#[test]
fn test_member_order_is_irrelevant_but_array_order_matters() {
  // Arrange
  let first = build(
    routed(),
    vec![("paths", paths(&["/a", "/b"])), ("retries", 5i32.into())],
  );
  let second = build(
    routed(),
    vec![("retries", 5i32.into()), ("paths", paths(&["/a", "/b"]))],
  );
  let reversed = build(
    routed(),
    vec![("retries", 5i32.into()), ("paths", paths(&["/b", "/a"]))],
  );

  // Assert
  assert_eq!(first, second);
  assert_eq!(first.hash_code(), second.hash_code());
  assert_eq!(std_hash(&first), std_hash(&second));
  assert_ne!(first, reversed);
}

#[test]
fn test_nested_qualifiers_compare_recursively() {
  let wrapper = QualifierKind::builder("com.example.Wrapped")
    .required("inner", MemberType::Qualifier(Arc::from("javax.inject.Named")))
    .build()
    .unwrap();

  let a = build(
    wrapper.clone(),
    vec![("inner", build(named(), vec![("value", "x".into())]).into())],
  );
  let b = build(
    wrapper.clone(),
    vec![("inner", build(named(), vec![("value", "x".into())]).into())],
  );
  let c = build(
    wrapper,
    vec![("inner", build(named(), vec![("value", "y".into())]).into())],
  );

  assert_eq!(a, b);
  assert_eq!(a.hash_code(), b.hash_code());
  assert_ne!(a, c);
}

// --- Hashing ---

#[test]
fn test_hash_code_follows_the_member_fold() {
  let q = build(named(), vec![("value", "x".into())]);

  let kind_hash = "javax.inject.Named"
    .encode_utf16()
    .fold(0i32, |h, u| h.wrapping_mul(31).wrapping_add(u as i32));
  let name_hash = 111972721i32; // "value"
  let value_hash = 'x' as i32;
  let expected = kind_hash.wrapping_add(127i32.wrapping_mul(name_hash) ^ value_hash);

  assert_eq!(q.hash_code(), expected);
}

// --- Rendering ---

#[test]
fn test_string_form_uses_declared_order() {
  let q = build(
    routed(),
    vec![("retries", 1i32.into()), ("paths", paths(&["/a", "/b"]))],
  );
  assert_eq!(
    q.to_string(),
    "@Routed(paths=[\"/a\", \"/b\"], retries=1, timeout=30, mode=FAST)"
  );
}

#[test]
fn test_string_form_of_special_floats() {
  let q = build(
    precision(),
    vec![("epsilon", f64::NAN.into()), ("ratio", f32::NEG_INFINITY.into())],
  );
  assert_eq!(
    q.to_string(),
    "@Precision(epsilon=NaN, ratio=-Infinity, strict=false)"
  );
}

#[test]
fn test_string_form_of_nested_values() {
  let wrapper = QualifierKind::builder("Wrapped")
    .display_name("@Wrap")
    .required("inner", MemberType::Qualifier(Arc::from("javax.inject.Named")))
    .build()
    .unwrap();
  let q = build(
    wrapper,
    vec![("inner", build(named(), vec![("value", "x".into())]).into())],
  );
  assert_eq!(q.to_string(), "@Wrap(inner=@Named(value=\"x\"))");
}

// --- Builder ---

#[test]
fn test_build_without_required_member_is_incomplete() {
  // Arrange
  let mut builder = QualifierValueBuilder::new(named()).unwrap();

  // Act
  let err = builder.build().unwrap_err();

  // Assert
  match err {
    Error::IncompleteValue { kind, member } => {
      assert_eq!(kind, "javax.inject.Named");
      assert_eq!(member, "value");
    }
    other => panic!("unexpected error: {:?}", other),
  }

  // Supplying the member completes the value.
  builder.add_member("value", "primary").unwrap();
  assert!(builder.build().is_ok());
}

#[test]
fn test_duplicate_member_is_rejected() {
  let mut builder = QualifierValueBuilder::new(named()).unwrap();
  builder.add_member("value", "first").unwrap();

  let err = builder.add_member("value", "second").unwrap_err();
  assert!(matches!(err, Error::InvalidArgument(_)));

  // The first value stays staged.
  let q = builder.build().unwrap();
  assert_eq!(q.member("value"), Some(&MemberValue::from("first")));
}

#[test]
fn test_unknown_member_is_rejected() {
  let mut builder = QualifierValueBuilder::new(named()).unwrap();
  let err = builder.add_member("valeu", "x").unwrap_err();
  assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn test_non_concrete_kind_is_rejected_at_construction() {
  let err = QualifierValueBuilder::new(QualifierKind::any()).unwrap_err();
  assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn test_all_defaults_differ_from_explicit_non_default() {
  let defaulted = QualifierValueBuilder::defaults(precision()).unwrap();
  let strict = build(precision(), vec![("strict", true.into())]);
  assert_ne!(defaulted, strict);
}
