use fibre_inject::qualifier::{MemberType, QualifierKind, QualifierValueBuilder};
use fibre_inject::{
  BindingOverrideChain, BindingTarget, Container, DependencyGraph, Error, GraphConfig,
  InjectionTarget, Key, ProviderDecl, ResolverExt, TypeRef,
};
use std::sync::Arc;

fn main() -> Result<(), Error> {
  // --- Qualifiers ---
  let named = QualifierKind::builder("javax.inject.Named")
    .required("value", MemberType::Str)
    .build()?;
  let mut builder = QualifierValueBuilder::new(named)?;
  builder.add_member("value", "water")?;
  let water = builder.build()?;

  // --- Graph ---
  let heater = Key::of_type(TypeRef::raw("Heater"));
  let pump = Key::of_type(TypeRef::raw("Pump"));
  let temperature = Key::qualified_type(TypeRef::raw("Temperature"), water.clone());
  let coffee_maker = Key::of_type(TypeRef::raw("CoffeeMaker"));

  let graph = DependencyGraph::from_declarations(
    vec![
      ProviderDecl::new("DripModule.provideHeater", heater.clone(), vec![temperature.clone()]),
      ProviderDecl::new("DripModule.provideTemperature", temperature, vec![]),
    ],
    vec![
      InjectionTarget::new("Thermosiphon", pump.clone()).constructor(vec![heater.clone()]),
      InjectionTarget::new("CoffeeMaker", coffee_maker)
        .constructor(vec![heater, pump])
        .field(Key::of_type(TypeRef::raw("Logger"))),
    ],
    GraphConfig::default(),
  )?;

  match graph.validate() {
    Ok(()) => println!("graph is valid"),
    Err(e) => println!("{}", e),
  }

  // --- Overrides ---
  let container = Arc::new(Container::new());
  container.add_instance_with_key(Key::qualified::<f64>(water.clone()), 93.0f64);

  let mut overrides = BindingOverrideChain::builder();
  overrides.bind_instance(Key::qualified::<f64>(water.clone()), 80.0f64)?;
  let chain = overrides.build(container.clone());

  let key = Key::qualified::<f64>(water);
  println!("production temperature: {:?}", container.get::<f64>(&key));
  println!("test temperature: {:?}", chain.get::<f64>(&key));

  // A second override for the same key is rejected.
  let mut conflicting = BindingOverrideChain::builder();
  conflicting.bind_instance(BindingTarget::of::<f64>(), 1.0f64)?;
  if let Err(e) = conflicting.bind_provider(Key::of::<f64>(), || 2.0f64) {
    println!("{}", e);
  }

  Ok(())
}
