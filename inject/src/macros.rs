//! Public macros for ergonomic key construction.

/// Builds a [`Key`](crate::Key) named after a Rust type.
///
/// # Examples
///
/// ```
/// use fibre_inject::key;
/// use fibre_inject::qualifier::{MemberType, QualifierKind, QualifierValueBuilder};
///
/// // An unqualified key
/// let plain = key!(String);
/// assert!(plain.qualifier().is_none());
///
/// // A qualified key
/// let named = QualifierKind::builder("Named")
///   .required("value", MemberType::Str)
///   .build()?;
/// let mut builder = QualifierValueBuilder::new(named)?;
/// builder.add_member("value", "greeting")?;
/// let qualified = key!(String, builder.build()?);
/// assert_ne!(plain, qualified);
/// # Ok::<(), fibre_inject::Error>(())
/// ```
#[macro_export]
macro_rules! key {
  // Arm for an unqualified key: key!(MyService)
  ($type:ty) => {
    $crate::Key::of::<$type>()
  };

  // Arm for a qualified key: key!(MyService, qualifier)
  ($type:ty, $qualifier:expr) => {
    $crate::Key::qualified::<$type>($qualifier)
  };
}
