//! # Fibre Inject
//!
//! The identity and resolution engine of a build-time dependency injection
//! compiler.
//!
//! Analysis of source declarations happens elsewhere; it hands this crate the
//! declared bindings and injection targets, and this crate proves that every
//! one of them could be constructed.
//!
//! ## Core Concepts
//!
//! - **Key**: a [`TypeRef`] plus an optional [`QualifierValue`]. The only
//!   identity used for bindings, dependency edges and overrides.
//! - **Qualifier values**: structural marker values built by a
//!   [`QualifierValueBuilder`] from a [`QualifierKind`] descriptor. They
//!   compare and hash like native annotation instances, including the raw-bit
//!   rules for floating point members.
//! - **Dependency graph**: a [`DependencyGraph`] built from provider
//!   declarations and injectable constructors. Duplicate providers fail the
//!   build; [`DependencyGraph::validate`] reports unresolved dependencies and
//!   cycles.
//! - **Override chain**: a [`BindingOverrideChain`] replaces individual keys in
//!   front of any [`Resolver`], such as a [`Container`].
//!
//! ## Quick Start
//!
//! ```
//! use fibre_inject::{DependencyGraph, GraphConfig, InjectionTarget, Key, ProviderDecl, TypeRef};
//!
//! let clock = Key::of_type(TypeRef::raw("Clock"));
//! let heater = Key::of_type(TypeRef::raw("Heater"));
//! let coffee_maker = Key::of_type(TypeRef::raw("CoffeeMaker"));
//!
//! let graph = DependencyGraph::from_declarations(
//!   vec![
//!     ProviderDecl::new("DripModule.provideClock", clock.clone(), vec![]),
//!     ProviderDecl::new("DripModule.provideHeater", heater.clone(), vec![clock.clone()]),
//!   ],
//!   vec![InjectionTarget::new("CoffeeMaker", coffee_maker).constructor(vec![heater])],
//!   GraphConfig::default(),
//! )?;
//!
//! graph.validate()?;
//! # Ok::<(), fibre_inject::Error>(())
//! ```

mod config;
mod container;
mod core;
mod error;
mod graph;
mod key;
mod macros;
mod override_chain;
pub mod qualifier;
mod resolver;
mod type_ref;

pub use config::GraphConfig;
pub use container::Container;
pub use error::{Error, Result, ValidationErrors};
pub use graph::{DependencyGraph, GraphBuilder, InjectionTarget, ProviderDecl};
pub use key::Key;
pub use override_chain::{
  BindingOverrideChain, BindingOverrideChainBuilder, BindingTarget, Lookup, OverrideValue,
};
pub use qualifier::{QualifierKind, QualifierValue, QualifierValueBuilder};
pub use resolver::{Instance, Provider, Resolver, ResolverExt};
pub use type_ref::TypeRef;
