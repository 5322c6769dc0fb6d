//! Qualifier markers: kind descriptors, structural values and their builder.

mod builder;
mod kind;
mod value;

pub use builder::QualifierValueBuilder;
pub use kind::{MemberDecl, MemberType, QualifierKind, QualifierKindBuilder};
pub use value::{ArrayValue, EnumConstant, MemberValue, QualifierValue};
