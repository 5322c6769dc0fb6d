use fibre_inject::qualifier::{MemberType, QualifierKind, QualifierValueBuilder};
use fibre_inject::{
  DependencyGraph, Error, GraphConfig, InjectionTarget, Key, ProviderDecl, TypeRef,
};
use pretty_assertions::assert_eq;

// --- Test Fixtures ---

fn key(name: &str) -> Key {
  Key::of_type(TypeRef::raw(name))
}

fn named_key(ty: &str, name: &str) -> Key {
  let kind = QualifierKind::builder("javax.inject.Named")
    .required("value", MemberType::Str)
    .build()
    .unwrap();
  let mut builder = QualifierValueBuilder::new(kind).unwrap();
  builder.add_member("value", name).unwrap();
  Key::qualified_type(TypeRef::raw(ty), builder.build().unwrap())
}

fn lazy(name: &str) -> Key {
  Key::of_type(TypeRef::parameterized("Lazy", TypeRef::raw(name)))
}

fn provides(origin: &str, produced: Key, deps: Vec<Key>) -> ProviderDecl {
  ProviderDecl::new(origin, produced, deps)
}

fn graph_of(providers: Vec<ProviderDecl>) -> DependencyGraph {
  DependencyGraph::from_declarations(providers, Vec::new(), GraphConfig::default()).unwrap()
}

fn validation_errors(result: fibre_inject::Result<()>) -> Vec<Error> {
  match result {
    Err(Error::Validation(errors)) => errors.into_iter().collect(),
    other => panic!("expected validation errors, got {:?}", other),
  }
}

// --- Construction ---

#[test]
fn test_valid_graph_builds_and_validates() {
  // Arrange
  let providers = vec![
    provides("DripModule.provideClock", key("Clock"), vec![]),
    provides("DripModule.provideHeater", key("Heater"), vec![key("Clock")]),
  ];
  let targets = vec![
    InjectionTarget::new("Pump", key("Pump")).constructor(vec![key("Heater")]),
    InjectionTarget::new("CoffeeMaker", key("CoffeeMaker"))
      .constructor(vec![key("Heater")])
      .field(key("Pump")),
  ];

  // Act
  let graph = DependencyGraph::from_declarations(providers, targets, GraphConfig::default()).unwrap();

  // Assert
  assert_eq!(graph.len(), 4);
  assert!(graph.contains(&key("CoffeeMaker")));
  assert_eq!(
    graph.dependencies_of(&key("CoffeeMaker")).unwrap(),
    vec![&key("Heater"), &key("Pump")]
  );
  assert_eq!(graph.origin_of(&key("Heater")), Some("DripModule.provideHeater"));
  assert!(graph.validate().is_ok());
}

#[test]
fn test_every_duplicate_provider_is_reported() {
  // Arrange
  let providers = vec![
    provides("A.provideClock", key("Clock"), vec![]),
    provides("B.provideClock", key("Clock"), vec![]),
    provides("A.provideHeater", key("Heater"), vec![]),
    provides("C.provideClock", key("Clock"), vec![]),
  ];
  let targets = vec![InjectionTarget::new("Heater", key("Heater")).constructor(vec![])];

  // Act
  let result = DependencyGraph::from_declarations(providers, targets, GraphConfig::default());

  // Assert
  let errors = match result {
    Err(Error::Validation(errors)) => errors,
    other => panic!("expected duplicate providers, got {:?}", other.map(|g| g.len())),
  };
  let reported: Vec<(String, String)> = errors
    .iter()
    .map(|error| match error {
      Error::DuplicateProvider { key, second, .. } => (key.to_string(), second.clone()),
      other => panic!("unexpected error: {}", other),
    })
    .collect();
  assert_eq!(
    reported,
    vec![
      ("Clock".to_string(), "B.provideClock".to_string()),
      ("Clock".to_string(), "C.provideClock".to_string()),
      ("Heater".to_string(), "Heater".to_string()),
    ]
  );
}

#[test]
fn test_qualified_keys_are_distinct_bindings() {
  let graph = graph_of(vec![
    provides("M.provideDefault", key("String"), vec![]),
    provides("M.provideName", named_key("String", "name"), vec![]),
    provides("M.provideOther", named_key("String", "other"), vec![]),
  ]);
  assert_eq!(graph.len(), 3);
  assert!(graph.contains(&named_key("String", "name")));
}

// --- Unresolved ---

#[test]
fn test_unresolved_dependency_is_reported_and_is_not_a_cycle() {
  let graph = graph_of(vec![
    provides("M.provideHeater", key("Heater"), vec![key("Clock")]),
    provides("M.providePump", key("Pump"), vec![key("Heater"), key("Clock")]),
  ]);

  assert_eq!(graph.find_unresolved(), vec![key("Clock")]);
  assert!(graph.find_cycles().is_empty());

  let errors = validation_errors(graph.validate());
  assert_eq!(errors.len(), 1);
  match &errors[0] {
    Error::UnresolvedDependency { key: missing, required_by } => {
      assert_eq!(missing, &key("Clock"));
      assert_eq!(required_by, &key("Heater"));
    }
    other => panic!("unexpected error: {}", other),
  }
}

#[test]
fn test_transitively_unresolved_dependency_is_found() {
  let graph = graph_of(vec![
    provides("M.a", key("A"), vec![key("B")]),
    provides("M.b", key("B"), vec![key("C")]),
    provides("M.c", key("C"), vec![named_key("D", "x")]),
  ]);
  assert_eq!(graph.find_unresolved(), vec![named_key("D", "x")]);
}

#[test]
fn test_qualifier_mismatch_is_unresolved() {
  let graph = graph_of(vec![
    provides("M.provideName", named_key("String", "name"), vec![]),
    provides("M.greeter", key("Greeter"), vec![named_key("String", "greeting")]),
  ]);
  assert_eq!(graph.find_unresolved(), vec![named_key("String", "greeting")]);
}

#[test]
fn test_members_injection_root_dependencies_are_checked() {
  // Arrange: an activity with only injected fields, no injectable constructor.
  let providers = vec![provides("M.clock", key("Clock"), vec![])];
  let targets = vec![InjectionTarget::new("MainActivity", key("MainActivity"))
    .field(key("Clock"))
    .method(vec![key("Analytics")])];

  // Act
  let graph = DependencyGraph::from_declarations(providers, targets, GraphConfig::default()).unwrap();

  // Assert
  assert!(!graph.contains(&key("MainActivity")));
  assert_eq!(graph.find_unresolved(), vec![key("Analytics")]);
}

#[test]
fn test_incomplete_graph_skips_unresolved_but_not_cycles() {
  let config = GraphConfig::default().complete(false);
  let graph = DependencyGraph::from_declarations(
    vec![
      provides("M.a", key("A"), vec![key("External")]),
      provides("M.b", key("B"), vec![key("B")]),
    ],
    Vec::new(),
    config,
  )
  .unwrap();

  // The search still answers on demand.
  assert_eq!(graph.find_unresolved(), vec![key("External")]);

  let errors = validation_errors(graph.validate());
  assert_eq!(errors.len(), 1);
  assert!(matches!(&errors[0], Error::DependencyCycle { key: k } if k == &key("B")));
}

// --- Cycles ---

#[test]
fn test_self_cycle_is_detected() {
  let graph = graph_of(vec![provides("M.x", key("X"), vec![key("X")])]);
  assert_eq!(graph.find_cycles(), vec![key("X")]);
}

#[test]
fn test_indirect_cycle_reports_both_keys_and_not_unrelated_ones() {
  let graph = graph_of(vec![
    provides("M.a", key("A"), vec![key("B")]),
    provides("M.b", key("B"), vec![key("A")]),
    provides("M.c", key("C"), vec![]),
  ]);

  assert_eq!(graph.find_cycles(), vec![key("A"), key("B")]);
  assert!(graph.find_unresolved().is_empty());
}

#[test]
fn test_key_in_two_cycles_is_reported_once() {
  let graph = graph_of(vec![
    provides("M.hub", key("Hub"), vec![key("Left"), key("Right")]),
    provides("M.left", key("Left"), vec![key("Hub")]),
    provides("M.right", key("Right"), vec![key("Hub")]),
    provides("M.leaf", key("Leaf"), vec![key("Hub")]),
  ]);
  assert_eq!(graph.find_cycles(), vec![key("Hub"), key("Left"), key("Right")]);
}

#[test]
fn test_acyclic_path_into_a_cycle_is_not_cyclic() {
  let graph = graph_of(vec![
    provides("M.entry", key("Entry"), vec![key("A")]),
    provides("M.a", key("A"), vec![key("B")]),
    provides("M.b", key("B"), vec![key("A")]),
  ]);
  assert_eq!(graph.find_cycles(), vec![key("A"), key("B")]);
}

#[test]
fn test_searches_are_repeatable() {
  let graph = graph_of(vec![
    provides("M.a", key("A"), vec![key("B"), key("Missing")]),
    provides("M.b", key("B"), vec![key("A")]),
  ]);

  let cycles = graph.find_cycles();
  let unresolved = graph.find_unresolved();
  assert_eq!(graph.find_cycles(), cycles);
  assert_eq!(graph.find_unresolved(), unresolved);
  assert_eq!(validation_errors(graph.validate()).len(), 3);
  assert_eq!(validation_errors(graph.validate()).len(), 3);
}

// --- Deferred wrappers ---

#[test]
fn test_deferred_wrapper_breaks_cycles_and_resolves_to_the_wrapped_key() {
  let config = GraphConfig::default().deferred_wrapper("Lazy");
  let graph = DependencyGraph::from_declarations(
    vec![
      provides("M.a", key("A"), vec![lazy("B")]),
      provides("M.b", key("B"), vec![key("A")]),
    ],
    Vec::new(),
    config,
  )
  .unwrap();

  assert!(graph.find_cycles().is_empty());
  assert!(graph.find_unresolved().is_empty());
  assert_eq!(graph.dependencies_of(&key("A")).unwrap(), vec![&key("B")]);
  assert!(graph.validate().is_ok());
}

#[test]
fn test_deferred_wrapper_of_missing_key_is_unresolved() {
  let config = GraphConfig::default().deferred_wrapper("Lazy");
  let graph = DependencyGraph::from_declarations(
    vec![provides("M.a", key("A"), vec![lazy("Nowhere")])],
    Vec::new(),
    config,
  )
  .unwrap();
  assert_eq!(graph.find_unresolved(), vec![key("Nowhere")]);
}

#[test]
fn test_wrappers_are_plain_types_unless_configured() {
  let graph = graph_of(vec![
    provides("M.a", key("A"), vec![lazy("B")]),
    provides("M.b", key("B"), vec![key("A")]),
  ]);
  assert_eq!(graph.find_unresolved(), vec![lazy("B")]);
  assert!(graph.find_cycles().is_empty());
}
